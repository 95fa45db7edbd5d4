//! init command - Write a project configuration file
//!
//! Records the website and provider settings so later commands can run
//! without flags.

use std::path::Path;

use clap::Args;
use serde::Serialize;
use sw_core::{Config, ConfigManager, Error, ProviderConfig, StaticWebsiteArgs};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Write a project configuration file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Root directory of the website
    #[arg(short = 'd', long, value_name = "DIR")]
    pub static_directory: std::path::PathBuf,

    /// Logical name of the bucket
    #[arg(long)]
    pub bucket_name: Option<String>,

    /// Glob pattern of files to deploy (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Logical name of the website component
    #[arg(long)]
    pub name: Option<String>,

    /// Stack to declare the resources into
    #[arg(long)]
    pub stack: Option<String>,

    /// AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// Custom S3 endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,

    /// Use the bucket name as-is instead of appending a random suffix
    #[arg(long)]
    pub no_autoname: bool,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    status: &'static str,
    path: String,
}

impl InitArgs {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            stack: self.stack.unwrap_or(defaults.stack),
            name: self.name.unwrap_or(defaults.name),
            provider: ProviderConfig {
                region: self.region,
                endpoint: self.endpoint,
                force_path_style: self.path_style,
                autoname: !self.no_autoname,
                ..Default::default()
            },
            website: Some(StaticWebsiteArgs {
                bucket_name: self.bucket_name,
                included_files: (!self.include.is_empty()).then_some(self.include),
                static_directory: self.static_directory,
            }),
            ..defaults
        }
    }
}

/// Execute the init command
pub fn execute(args: InitArgs, config_path: &Path, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = ConfigManager::with_path(config_path.to_path_buf());

    if manager.exists() && !args.force {
        let e = Error::Conflict(format!(
            "'{}' already exists (use --force to overwrite)",
            config_path.display()
        ));
        return formatter.fail("", &e);
    }

    let config = args.into_config();
    if let Err(e) = config.provider.validate() {
        return formatter.fail("", &e);
    }

    if let Err(e) = manager.save(&config) {
        return formatter.fail("Failed to write configuration", &e);
    }

    if formatter.is_json() {
        formatter.json(&InitOutput {
            status: "success",
            path: config_path.display().to_string(),
        });
    } else {
        formatter.success(&format!("Wrote '{}'", config_path.display()));
    }

    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(dir: &str) -> InitArgs {
        InitArgs {
            static_directory: PathBuf::from(dir),
            bucket_name: Some("docs".into()),
            include: vec![],
            name: None,
            stack: Some("prod".into()),
            region: Some("eu-central-1".into()),
            endpoint: None,
            path_style: false,
            no_autoname: true,
            force: false,
        }
    }

    fn quiet() -> OutputConfig {
        OutputConfig {
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("static-website.toml");

        assert_eq!(execute(args("public"), &path, quiet()), ExitCode::Success);

        let config = ConfigManager::with_path(path).load().unwrap();
        assert_eq!(config.stack, "prod");
        assert_eq!(config.name, "static-website");
        assert_eq!(config.provider.region.as_deref(), Some("eu-central-1"));
        assert!(!config.provider.autoname);
        let website = config.website.unwrap();
        assert_eq!(website.static_directory, PathBuf::from("public"));
        assert_eq!(website.bucket_name(), "docs");
        assert!(website.included_files.is_none());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("static-website.toml");
        std::fs::write(&path, "schema_version = 1\n").unwrap();

        assert_eq!(execute(args("public"), &path, quiet()), ExitCode::Conflict);

        let mut forced = args("public");
        forced.force = true;
        assert_eq!(execute(forced, &path, quiet()), ExitCode::Success);
    }

    #[test]
    fn test_init_rejects_bad_endpoint() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("static-website.toml");
        let mut bad = args("public");
        bad.endpoint = Some("not a url".into());

        assert_eq!(execute(bad, &path, quiet()), ExitCode::UsageError);
        assert!(!path.exists());
    }
}
