//! up command - Deploy the website
//!
//! Creates the bucket, its website settings and one object per file, then
//! prints the website URL.

use std::path::Path;

use clap::Args;
use serde::Serialize;
use sw_core::{AppliedResource, ApplySummary, ResourceType};
use sw_s3::S3Provider;
use tracing::debug;

use super::site::{self, SiteArgs};
use crate::exit_code::ExitCode;
use crate::output::{ApplyProgress, Formatter, OutputConfig};

/// Deploy the website
#[derive(Args, Debug)]
pub struct UpArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

#[derive(Debug, Serialize)]
struct UpOutput {
    status: &'static str,
    stack: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    objects: usize,
    started_at: jiff::Timestamp,
    finished_at: jiff::Timestamp,
    resources: Vec<AppliedResource>,
}

/// Execute the up command
pub async fn execute(args: UpArgs, config_path: &Path, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let site = match site::load(config_path, &args.site) {
        Ok(s) => s,
        Err(e) => return formatter.fail("", &e),
    };

    let (website, deployment) = match site.declare() {
        Ok(declared) => declared,
        Err(e) => return formatter.fail("Failed to declare website", &e),
    };
    let objects = deployment.plan().count(ResourceType::BucketObject);
    if let Some(warning) = site.empty_warning(objects) {
        formatter.warning(&warning);
    }

    let provider = match S3Provider::new(&site.config.provider).await {
        Ok(p) => p,
        Err(e) => return formatter.fail("Failed to create S3 client", &e),
    };

    debug!(region = provider.region(), resources = deployment.len(), "applying deployment");
    let progress = ApplyProgress::new(&output_config, deployment.len() as u64);
    let applied = tokio::select! {
        result = deployment.apply(&provider, |event| progress.observe(event)) => result,
        _ = tokio::signal::ctrl_c() => {
            progress.finish_and_clear();
            return formatter.error(
                "Interrupted; resources created so far were left in place",
                ExitCode::Interrupted,
            );
        }
    };
    progress.finish_and_clear();

    let summary = match applied {
        Ok(summary) => summary,
        Err(e) => return formatter.fail("Deployment failed", &e),
    };

    let url = match &website.url {
        Some(url) => url.get().await,
        None => None,
    };
    let bucket = match &website.bucket {
        Some(bucket) => bucket.get().await,
        None => None,
    };

    report(&formatter, summary, url, bucket);
    ExitCode::Success
}

fn report(formatter: &Formatter, summary: ApplySummary, url: Option<String>, bucket: Option<String>) {
    let objects = summary
        .resources
        .iter()
        .filter(|r| r.resource_type == ResourceType::BucketObject)
        .count();

    if formatter.is_json() {
        let output = UpOutput {
            status: "success",
            stack: summary.stack,
            url,
            bucket,
            objects,
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            resources: summary.resources,
        };
        formatter.json(&output);
        return;
    }

    let elapsed = summary.finished_at.duration_since(summary.started_at);
    formatter.success(&format!(
        "Created {} resources ({objects} objects) in stack '{}' in {elapsed:#}",
        summary.resources.len(),
        summary.stack
    ));
    if let Some(bucket) = bucket {
        formatter.field("Bucket", &bucket);
    }
    if let Some(url) = url {
        formatter.field("URL", &url);
    }
}
