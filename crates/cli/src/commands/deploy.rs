use anyhow::{Context, Result};
use s3_deploy_core::{DeploymentRequest, resolve_input};
use s3_deploy_deployer::SiteDeployer;
use s3_deploy_deployer::runner::ProcessRunner;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub async fn run(
    bucket: Option<String>,
    bucket_region: Option<String>,
    dist_folder: Option<PathBuf>,
) -> Result<()> {
    let bucket = resolve_input("bucket", bucket)?;
    let region = resolve_input("bucket-region", bucket_region)?;
    let dist_folder = resolve_input(
        "dist-folder",
        dist_folder.map(|p| p.to_string_lossy().into_owned()),
    )?;

    let request = DeploymentRequest::new(bucket, region, dist_folder)?;

    println!("🚀 Deploying static site to S3...\n");
    println!("📋 Deployment plan:");
    println!("   Bucket: {}", request.bucket);
    println!("   Region: {}", request.region);
    println!("   Source: {}", request.dist_folder.display());
    println!();

    let result = SiteDeployer::new(ProcessRunner).deploy(&request).await?;

    println!();
    println!("✅ Deployment complete!");
    println!("   Website URL: {}", result.website_url);

    set_action_output("website-url", &result.website_url)?;

    Ok(())
}

/// Publish an output value for the surrounding CI step. GitHub Actions
/// reads outputs from the file named by GITHUB_OUTPUT; outside a runner
/// the variable is unset and this is a no-op.
fn set_action_output(name: &str, value: &str) -> Result<()> {
    if let Ok(path) = std::env::var("GITHUB_OUTPUT") {
        append_output(Path::new(&path), name, value)
            .with_context(|| format!("Failed to write output '{}' to {}", name, path))?;
    }
    Ok(())
}

fn append_output(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", name, value)
}
