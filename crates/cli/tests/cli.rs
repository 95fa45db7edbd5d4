//! Tests that run the swc binary without contacting S3

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_swc(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swc"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SWC_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute swc")
}

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");
    std::fs::create_dir_all(public.join("css")).unwrap();
    std::fs::write(public.join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(public.join("about.html"), "<h1>about</h1>").unwrap();
    std::fs::write(public.join("css/site.css"), "body {}").unwrap();
    dir
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn steps_of<'a>(plan: &'a serde_json::Value, type_token: &str) -> Vec<&'a serde_json::Value> {
    plan["plan"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["type"] == type_token)
        .collect()
}

#[test]
fn test_preview_json_declares_every_file() {
    let dir = site();
    let output = run_swc(&["preview", "--json", "-d", "public"], dir.path());
    let plan = json(&output);

    assert_eq!(plan["stack"], "dev");
    assert_eq!(plan["objects"], 3);
    assert_eq!(plan["resources"], 6);

    let buckets = steps_of(&plan, "aws:s3/bucketV2:BucketV2");
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["name"], "static-website");

    let objects = steps_of(&plan, "aws:s3/bucketObject:BucketObject");
    let keys: Vec<&str> = objects
        .iter()
        .map(|o| o["properties"]["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["about.html", "css/site.css", "index.html"]);

    for object in &objects {
        assert_eq!(object["properties"]["acl"], "public-read");
        assert_eq!(object["depends_on"].as_array().unwrap().len(), 3);
    }
    assert_eq!(objects[1]["properties"]["contentType"], "text/css");
}

#[test]
fn test_preview_include_patterns_and_bucket_name() {
    let dir = site();
    let output = run_swc(
        &[
            "preview",
            "--json",
            "-d",
            "public",
            "--bucket-name",
            "docs",
            "--include",
            "*.html",
        ],
        dir.path(),
    );
    let plan = json(&output);

    assert_eq!(plan["objects"], 2);
    let buckets = steps_of(&plan, "aws:s3/bucketV2:BucketV2");
    assert_eq!(buckets[0]["name"], "docs");
}

#[test]
fn test_init_then_preview_uses_config_file() {
    let dir = site();
    let init = run_swc(
        &["init", "-d", "public", "--stack", "prod", "--include", "css/**"],
        dir.path(),
    );
    assert!(init.status.success());
    assert!(dir.path().join("static-website.toml").exists());

    let plan = json(&run_swc(&["preview", "--json"], dir.path()));
    assert_eq!(plan["stack"], "prod");
    assert_eq!(plan["objects"], 1);

    let again = run_swc(&["init", "-d", "public"], dir.path());
    assert_eq!(again.status.code(), Some(6));
}

#[test]
fn test_missing_static_directory_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_swc(&["preview"], dir.path());
    assert_eq!(output.status.code(), Some(2));

}

#[test]
fn test_preview_of_missing_directory_plans_bucket_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_swc(&["preview", "--json", "-d", "nowhere"], dir.path());
    let plan = json(&output);

    assert_eq!(plan["objects"], 0);
    assert_eq!(plan["resources"], 4);

    let human = run_swc(&["preview", "--no-color", "-d", "nowhere"], dir.path());
    assert!(human.status.success());
    assert!(String::from_utf8_lossy(&human.stderr).contains("does not exist"));
}

#[test]
fn test_preview_human_output() {
    let dir = site();
    let output = run_swc(&["preview", "--no-color", "-d", "public"], dir.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("public-access-block"));
    assert!(stdout.contains("css/site.css"));
    assert!(stdout.contains("6 resources to create in stack 'dev'"));
}

#[test]
fn test_up_unreachable_endpoint_is_network_error() {
    let dir = site();
    std::fs::write(
        dir.path().join("static-website.toml"),
        r#"schema_version = 1

[provider]
region = "us-east-1"
endpoint = "http://127.0.0.1:9"
access_key = "test"
secret_key = "test"
force_path_style = true

[provider.retry]
max_attempts = 1
initial_backoff_ms = 10
max_backoff_ms = 10

[website]
static_directory = "public"
"#,
    )
    .unwrap();

    let output = run_swc(&["up", "--json"], dir.path());
    assert_eq!(output.status.code(), Some(3));
}
