use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters for one deployment run.
///
/// Immutable once validated; every field is required. Construct with
/// [`DeploymentRequest::new`], which validates at the boundary so no
/// external command is attempted with malformed inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub bucket: String,
    pub region: String,
    pub dist_folder: PathBuf,
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub website_url: String,
}

impl DeploymentRequest {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        dist_folder: impl Into<PathBuf>,
    ) -> Result<Self> {
        let request = DeploymentRequest {
            bucket: bucket.into(),
            region: region.into(),
            dist_folder: dist_folder.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Check all three parameters. Runs before any external effect, so
    /// a validation failure leaves the environment untouched.
    pub fn validate(&self) -> Result<()> {
        validate_bucket_name(&self.bucket)?;
        validate_region(&self.region)?;
        validate_dist_folder(&self.dist_folder)?;
        Ok(())
    }
}

/// Validate an S3 bucket name against the general-purpose naming rules:
/// 3-63 characters, lowercase letters, digits, dots and hyphens, and it
/// must begin and end with a letter or digit.
fn validate_bucket_name(bucket: &str) -> Result<()> {
    if bucket.trim().is_empty() {
        return Err(Error::InvalidInput(
            "'bucket' is required and must not be empty".to_string(),
        ));
    }
    if bucket.len() < 3 || bucket.len() > 63 {
        return Err(Error::InvalidInput(format!(
            "bucket name '{}' must be between 3 and 63 characters",
            bucket
        )));
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(Error::InvalidInput(format!(
            "bucket name '{}' may only contain lowercase letters, digits, dots and hyphens",
            bucket
        )));
    }
    let first = bucket.chars().next().unwrap_or(' ');
    let last = bucket.chars().last().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(Error::InvalidInput(format!(
            "bucket name '{}' must begin and end with a letter or digit",
            bucket
        )));
    }
    Ok(())
}

/// Validate the shape of a region identifier (e.g. `us-east-1`).
///
/// This is deliberately a shape check, not a lookup against a region
/// table: the provider CLI rejects unknown regions with a clearer
/// message than a stale embedded list could.
fn validate_region(region: &str) -> Result<()> {
    if region.trim().is_empty() {
        return Err(Error::InvalidInput(
            "'bucket-region' is required and must not be empty".to_string(),
        ));
    }
    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(Error::InvalidInput(format!(
            "region '{}' may only contain lowercase letters, digits and hyphens",
            region
        )));
    }
    if !region.contains('-') || region.starts_with('-') || region.ends_with('-') {
        return Err(Error::InvalidInput(format!(
            "region '{}' is not a valid region identifier (expected e.g. 'us-east-1')",
            region
        )));
    }
    Ok(())
}

fn validate_dist_folder(dist_folder: &Path) -> Result<()> {
    if dist_folder.as_os_str().is_empty() {
        return Err(Error::InvalidInput(
            "'dist-folder' is required and must not be empty".to_string(),
        ));
    }
    let metadata = std::fs::metadata(dist_folder).map_err(|e| {
        Error::InvalidInput(format!(
            "dist folder '{}' is not readable: {}",
            dist_folder.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(Error::InvalidInput(format!(
            "dist folder '{}' is not a directory",
            dist_folder.display()
        )));
    }
    Ok(())
}
