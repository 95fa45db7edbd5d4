//! preview command - Show what a deployment would create
//!
//! Declares the website and renders the plan without contacting the
//! provider.

use std::path::Path;

use clap::Args;
use comfy_table::{Table, presets};
use humansize::{BINARY, format_size};
use serde::Serialize;
use sw_core::{Plan, PlannedStep, ResourceType};

use super::site::{self, SiteArgs};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Preview the resources of a deployment
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
    stack: String,
    component: String,
    resources: usize,
    objects: usize,
    total_size_bytes: u64,
    plan: Plan,
}

/// Execute the preview command
pub fn execute(args: PreviewArgs, config_path: &Path, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let site = match site::load(config_path, &args.site) {
        Ok(s) => s,
        Err(e) => return formatter.fail("", &e),
    };

    let plan = match site.declare() {
        Ok((_, deployment)) => deployment.preview(),
        Err(e) => return formatter.fail("Failed to declare website", &e),
    };

    let objects = plan.count(ResourceType::BucketObject);
    let total_size: u64 = plan.steps.iter().filter_map(|s| s.size_bytes).sum();

    if formatter.is_json() {
        let output = PreviewOutput {
            stack: plan.stack.clone(),
            component: site.name.clone(),
            resources: plan.steps.len(),
            objects,
            total_size_bytes: total_size,
            plan,
        };
        formatter.json(&output);
        return ExitCode::Success;
    }

    if let Some(warning) = site.empty_warning(objects) {
        formatter.warning(&warning);
    }

    if !formatter.is_quiet() {
        formatter.println(&render_table(&plan.steps, formatter.colors_enabled()).to_string());
    }

    formatter.success(&format!(
        "{} resources to create in stack '{}' ({objects} objects, {})",
        plan.steps.len(),
        plan.stack,
        format_size(total_size, BINARY)
    ));

    ExitCode::Success
}

fn render_table(steps: &[PlannedStep], colors: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_header(vec!["#", "Type", "Name", "Content-Type", "Size"]);
    if !colors {
        table.force_no_tty();
    }

    for (index, step) in steps.iter().enumerate() {
        let content_type = step
            .properties
            .get("contentType")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let size = step
            .size_bytes
            .map(|bytes| format_size(bytes, BINARY))
            .unwrap_or_default();

        table.add_row(vec![
            (index + 1).to_string(),
            step.resource_type.short_name().to_string(),
            step.name.clone(),
            content_type.to_string(),
            size,
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::{Deployment, StaticWebsite, StaticWebsiteArgs};
    use tempfile::TempDir;

    #[test]
    fn test_render_table_lists_every_step() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("index.html"), "<h1>hi</h1>").unwrap();

        let mut deployment = Deployment::new("dev");
        let args = StaticWebsiteArgs::new(temp.path());
        StaticWebsite::new(&mut deployment, "site", Some(&args)).unwrap();
        let plan = deployment.preview();

        let rendered = render_table(&plan.steps, false).to_string();
        assert!(rendered.contains("bucket"));
        assert!(rendered.contains("ownership-controls"));
        assert!(rendered.contains("public-access-block"));
        assert!(rendered.contains("website"));
        assert!(rendered.contains("index.html"));
        assert!(rendered.contains("text/html"));
        assert!(rendered.contains("11 B"));
    }

    #[test]
    fn test_missing_directory_previews_bucket_only() {
        let temp = TempDir::new().unwrap();
        let args = PreviewArgs {
            site: SiteArgs {
                static_directory: Some(temp.path().join("missing")),
                ..Default::default()
            },
        };
        let config = OutputConfig {
            quiet: true,
            ..Default::default()
        };
        let code = execute(args, &temp.path().join("static-website.toml"), config);
        assert_eq!(code, ExitCode::Success);
    }
}
