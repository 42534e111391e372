use s3_deploy_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Bucket policy document in the provider's JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: String,
    pub principal: String,
    pub action: String,
    pub resource: String,
}

impl BucketPolicy {
    /// Policy granting anonymous read of every object in `bucket`.
    /// Exactly one statement, scoped to the bucket's object ARN pattern.
    pub fn public_read(bucket: &str) -> Self {
        BucketPolicy {
            version: "2012-10-17".to_string(),
            statement: vec![PolicyStatement {
                sid: "PublicReadGetObject".to_string(),
                effect: "Allow".to_string(),
                principal: "*".to_string(),
                action: "s3:GetObject".to_string(),
                resource: format!("arn:aws:s3:::{}/*", bucket),
            }],
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Artifact(format!("failed to serialize bucket policy: {}", e)))
    }
}

/// Transient on-disk home for a policy document while the provider's
/// policy-update command reads it. The file is exclusively owned by the
/// deploy run and removed when this value drops, on success and failure
/// alike.
pub struct PolicyFile {
    file: NamedTempFile,
}

impl PolicyFile {
    pub fn write(policy: &BucketPolicy) -> Result<Self> {
        let mut file = NamedTempFile::new()
            .map_err(|e| Error::Artifact(format!("failed to create policy file: {}", e)))?;
        file.write_all(policy.to_json()?.as_bytes())
            .map_err(|e| Error::Artifact(format!("failed to write policy file: {}", e)))?;
        file.flush()
            .map_err(|e| Error::Artifact(format!("failed to write policy file: {}", e)))?;
        Ok(PolicyFile { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URI form the provider CLI expects for local documents.
    pub fn uri(&self) -> String {
        format!("file://{}", self.file.path().display())
    }
}
