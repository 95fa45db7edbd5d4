//! Website arguments shared by the deployment commands
//!
//! Flags take precedence over the `[website]` table of the project
//! configuration file.

use std::path::{Path, PathBuf};

use clap::Args;
use sw_core::{Config, ConfigManager, Deployment, Error, Result, StaticWebsite, StaticWebsiteArgs};
use tracing::debug;

/// Website selection flags
#[derive(Args, Debug, Clone, Default)]
pub struct SiteArgs {
    /// Root directory of the website
    #[arg(short = 'd', long, value_name = "DIR")]
    pub static_directory: Option<PathBuf>,

    /// Logical name of the bucket
    #[arg(long)]
    pub bucket_name: Option<String>,

    /// Glob pattern of files to deploy, relative to the root directory (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Logical name of the website component
    #[arg(long)]
    pub name: Option<String>,

    /// Stack to declare the resources into
    #[arg(long)]
    pub stack: Option<String>,
}

/// A website ready to be declared
#[derive(Debug, Clone)]
pub struct Site {
    /// Stack name
    pub stack: String,
    /// Component name
    pub name: String,
    /// Component arguments
    pub args: StaticWebsiteArgs,
    /// Loaded project configuration
    pub config: Config,
}

impl SiteArgs {
    /// Merge the flags over a loaded configuration
    ///
    /// `base` is the directory relative static directories in the
    /// configuration file are resolved against.
    pub fn resolve(&self, config: Config, base: &Path) -> Result<Site> {
        let from_file = config.website.clone();

        let static_directory = match (&self.static_directory, &from_file) {
            (Some(dir), _) => dir.clone(),
            (None, Some(website)) if website.static_directory.is_relative() => {
                base.join(&website.static_directory)
            }
            (None, Some(website)) => website.static_directory.clone(),
            (None, None) => {
                return Err(Error::Config(
                    "No static directory: pass --static-directory or set website.static_directory"
                        .into(),
                ));
            }
        };

        let bucket_name = self
            .bucket_name
            .clone()
            .or_else(|| from_file.as_ref().and_then(|w| w.bucket_name.clone()));

        let included_files = if self.include.is_empty() {
            from_file.and_then(|w| w.included_files)
        } else {
            Some(self.include.clone())
        };

        Ok(Site {
            stack: self.stack.clone().unwrap_or_else(|| config.stack.clone()),
            name: self.name.clone().unwrap_or_else(|| config.name.clone()),
            args: StaticWebsiteArgs {
                bucket_name,
                included_files,
                static_directory,
            },
            config,
        })
    }
}

/// Load the configuration file and merge the flags over it
pub fn load(config_path: &Path, flags: &SiteArgs) -> Result<Site> {
    let config = ConfigManager::with_path(config_path.to_path_buf()).load()?;
    let base = config_path.parent().unwrap_or(Path::new(""));
    let site = flags.resolve(config, base)?;
    debug!(
        config = %config_path.display(),
        stack = %site.stack,
        static_directory = %site.args.static_directory.display(),
        "resolved website"
    );
    Ok(site)
}

impl Site {
    /// Declare the website into a fresh deployment
    ///
    /// A missing directory is not an error: it declares the bucket and its
    /// settings with no objects.
    pub fn declare(&self) -> Result<(StaticWebsite, Deployment)> {
        let mut deployment = Deployment::new(&self.stack);
        let website = StaticWebsite::new(&mut deployment, &self.name, Some(&self.args))?;
        Ok((website, deployment))
    }

    /// Warning to show when a declaration uploads no files
    pub fn empty_warning(&self, objects: usize) -> Option<String> {
        if objects > 0 {
            return None;
        }
        let dir = self.args.static_directory.display();
        Some(if self.args.static_directory.is_dir() {
            format!("No files matched under '{dir}'")
        } else {
            format!("Static directory '{dir}' does not exist; no files will be uploaded")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_website() -> Config {
        Config {
            website: Some(StaticWebsiteArgs {
                bucket_name: Some("from-file".into()),
                included_files: Some(vec!["*.html".into()]),
                static_directory: PathBuf::from("public"),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_static_directory_is_config_error() {
        let result = SiteArgs::default().resolve(Config::default(), Path::new(""));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_file_values_resolved_against_base() {
        let site = SiteArgs::default()
            .resolve(config_with_website(), Path::new("project"))
            .unwrap();
        assert_eq!(site.args.static_directory, PathBuf::from("project/public"));
        assert_eq!(site.args.bucket_name(), "from-file");
        assert_eq!(site.args.included_files, Some(vec!["*.html".to_string()]));
        assert_eq!(site.stack, "dev");
        assert_eq!(site.name, "static-website");
    }

    #[test]
    fn test_flags_override_file() {
        let flags = SiteArgs {
            static_directory: Some(PathBuf::from("dist")),
            bucket_name: Some("docs".into()),
            include: vec!["**/*.css".into()],
            name: Some("docs-site".into()),
            stack: Some("prod".into()),
        };
        let site = flags
            .resolve(config_with_website(), Path::new("project"))
            .unwrap();
        assert_eq!(site.args.static_directory, PathBuf::from("dist"));
        assert_eq!(site.args.bucket_name(), "docs");
        assert_eq!(site.args.included_files, Some(vec!["**/*.css".to_string()]));
        assert_eq!(site.stack, "prod");
        assert_eq!(site.name, "docs-site");
    }

    #[test]
    fn test_missing_directory_declares_bucket_only() {
        let temp = TempDir::new().unwrap();
        let flags = SiteArgs {
            static_directory: Some(temp.path().join("missing")),
            ..Default::default()
        };
        let site = flags.resolve(Config::default(), Path::new("")).unwrap();
        let (website, deployment) = site.declare().unwrap();

        // bucket and its three settings
        assert_eq!(deployment.len(), 4);
        assert!(website.url.is_some());
        let warning = site.empty_warning(0).unwrap();
        assert!(warning.contains("does not exist"));
    }

    #[test]
    fn test_empty_warning_only_without_objects() {
        let temp = TempDir::new().unwrap();
        let flags = SiteArgs {
            static_directory: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let site = flags.resolve(Config::default(), Path::new("")).unwrap();
        assert!(site.empty_warning(2).is_none());
        assert!(site.empty_warning(0).unwrap().starts_with("No files matched"));
    }

    #[test]
    fn test_declare_counts_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("index.html"), "<h1>hi</h1>").unwrap();
        std::fs::write(temp.path().join("app.js"), "let x;").unwrap();

        let flags = SiteArgs {
            static_directory: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let site = flags.resolve(Config::default(), Path::new("")).unwrap();
        let (website, deployment) = site.declare().unwrap();

        // bucket, three bucket settings, two objects
        assert_eq!(deployment.len(), 6);
        assert!(website.url.is_some());
    }
}
