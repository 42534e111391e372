// Static-site deployment against an S3-compatible provider, driven
// entirely through its pre-authenticated command-line tool.

pub mod policy;
pub mod runner;

use policy::{BucketPolicy, PolicyFile};
use runner::{CommandRunner, render_command};
use s3_deploy_core::{DeploymentRequest, DeploymentResult, Error, Result};

const AWS: &str = "aws";

/// Public-access-block flags applied after the bucket policy. ACL-based
/// public access stays blocked; only policy-based access is relaxed so
/// the public-read policy takes effect. This exact combination is a
/// fixed contract: changing any flag changes the bucket's security
/// posture.
const PUBLIC_ACCESS_BLOCK: &str =
    "BlockPublicAcls=true,IgnorePublicAcls=true,BlockPublicPolicy=false,RestrictPublicBuckets=false";

/// Regional static-website endpoint for a bucket. Pure formatting, no
/// reachability check.
pub fn website_url(bucket: &str, region: &str) -> String {
    format!("http://{}.s3-website-{}.amazonaws.com", bucket, region)
}

/// Runs the deployment procedure: configure website hosting, apply a
/// public-read policy, relax the policy half of the public-access
/// block, mirror the dist folder, report the website URL.
///
/// Strictly sequential; the first failing step aborts the remainder and
/// its error text is surfaced unchanged. No step is retried.
pub struct SiteDeployer<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SiteDeployer<R> {
    pub fn new(runner: R) -> Self {
        SiteDeployer { runner }
    }

    pub async fn deploy(&self, request: &DeploymentRequest) -> Result<DeploymentResult> {
        request.validate()?;

        let s3_uri = format!("s3://{}", request.bucket);

        // Enable static website hosting, serving index.html for both
        // the index and error documents (single-page-app convention).
        self.invoke(&[
            "s3",
            "website",
            &s3_uri,
            "--index-document",
            "index.html",
            "--error-document",
            "index.html",
            "--region",
            &request.region,
        ])
        .await?;

        self.apply_public_read_policy(request).await?;

        self.invoke(&[
            "s3api",
            "put-public-access-block",
            "--bucket",
            &request.bucket,
            "--public-access-block-configuration",
            PUBLIC_ACCESS_BLOCK,
            "--region",
            &request.region,
        ])
        .await?;

        // Destructive mirror: stale published files must not linger, so
        // remote objects absent locally are deleted.
        let dist = request.dist_folder.to_string_lossy().into_owned();
        self.invoke(&[
            "s3",
            "sync",
            &dist,
            &s3_uri,
            "--region",
            &request.region,
            "--delete",
        ])
        .await?;

        Ok(DeploymentResult {
            website_url: website_url(&request.bucket, &request.region),
        })
    }

    /// Build the policy document in memory, park it in a transient file
    /// for the duration of the put-bucket-policy call, and remove it on
    /// every exit path (the file drops with this scope).
    async fn apply_public_read_policy(&self, request: &DeploymentRequest) -> Result<()> {
        let policy_file = PolicyFile::write(&BucketPolicy::public_read(&request.bucket))?;
        self.invoke(&[
            "s3api",
            "put-bucket-policy",
            "--bucket",
            &request.bucket,
            "--policy",
            &policy_file.uri(),
            "--region",
            &request.region,
        ])
        .await
    }

    async fn invoke(&self, args: &[&str]) -> Result<()> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let output = self.runner.run(AWS, &args).await?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: render_command(AWS, &args),
                stderr: output.stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use runner::CommandOutput;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Invocation {
        program: String,
        args: Vec<String>,
    }

    /// Records every invocation and fails the nth one (0-based) with a
    /// canned stderr if configured.
    struct FakeRunner {
        invocations: Mutex<Vec<Invocation>>,
        fail_at: Option<usize>,
        stderr: String,
    }

    impl FakeRunner {
        fn passing() -> Self {
            FakeRunner {
                invocations: Mutex::new(Vec::new()),
                fail_at: None,
                stderr: String::new(),
            }
        }

        fn failing_at(index: usize, stderr: &str) -> Self {
            FakeRunner {
                invocations: Mutex::new(Vec::new()),
                fail_at: Some(index),
                stderr: stderr.to_string(),
            }
        }

        fn recorded(&self) -> Vec<Invocation> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for &FakeRunner {
        async fn run(&self, program: &str, args: &[String]) -> s3_deploy_core::Result<CommandOutput> {
            let mut invocations = self.invocations.lock().unwrap();
            let index = invocations.len();
            invocations.push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });
            if self.fail_at == Some(index) {
                Ok(CommandOutput {
                    exit_code: 255,
                    stderr: self.stderr.clone(),
                })
            } else {
                Ok(CommandOutput {
                    exit_code: 0,
                    stderr: String::new(),
                })
            }
        }
    }

    fn request(dist: &std::path::Path) -> DeploymentRequest {
        DeploymentRequest::new("my-site", "us-east-1", dist).unwrap()
    }

    /// Pull the transient policy path out of a recorded
    /// put-bucket-policy invocation.
    fn policy_path(invocation: &Invocation) -> PathBuf {
        let uri = invocation
            .args
            .iter()
            .find(|a| a.starts_with("file://"))
            .expect("put-bucket-policy carries a file:// argument");
        PathBuf::from(uri.trim_start_matches("file://"))
    }

    #[tokio::test]
    async fn test_invocations_in_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::passing();
        let result = SiteDeployer::new(&runner)
            .deploy(&request(dir.path()))
            .await
            .unwrap();

        let recorded = runner.recorded();
        assert_eq!(recorded.len(), 4);
        assert!(recorded.iter().all(|i| i.program == "aws"));
        assert_eq!(recorded[0].args[..2], ["s3", "website"]);
        assert_eq!(recorded[1].args[..2], ["s3api", "put-bucket-policy"]);
        assert_eq!(recorded[2].args[..2], ["s3api", "put-public-access-block"]);
        assert_eq!(recorded[3].args[..2], ["s3", "sync"]);
        assert_eq!(
            result.website_url,
            "http://my-site.s3-website-us-east-1.amazonaws.com"
        );
    }

    #[tokio::test]
    async fn test_website_command_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::passing();
        SiteDeployer::new(&runner)
            .deploy(&request(dir.path()))
            .await
            .unwrap();

        let website = &runner.recorded()[0].args;
        assert!(website.contains(&"s3://my-site".to_string()));
        assert!(website.contains(&"--index-document".to_string()));
        assert!(website.contains(&"--error-document".to_string()));
        // index.html serves both roles
        assert_eq!(website.iter().filter(|a| *a == "index.html").count(), 2);
    }

    #[tokio::test]
    async fn test_public_access_block_contract() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::passing();
        SiteDeployer::new(&runner)
            .deploy(&request(dir.path()))
            .await
            .unwrap();

        let block = &runner.recorded()[2].args;
        assert!(block.contains(
            &"BlockPublicAcls=true,IgnorePublicAcls=true,BlockPublicPolicy=false,RestrictPublicBuckets=false"
                .to_string()
        ));
    }

    #[tokio::test]
    async fn test_sync_is_destructive_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::passing();
        SiteDeployer::new(&runner)
            .deploy(&request(dir.path()))
            .await
            .unwrap();

        let sync = &runner.recorded()[3].args;
        assert!(sync.contains(&"--delete".to_string()));
        assert!(sync.contains(&dir.path().to_string_lossy().into_owned()));
        assert!(sync.contains(&"s3://my-site".to_string()));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_steps() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::failing_at(1, "AccessDenied: not authorized\n");
        let result = SiteDeployer::new(&runner).deploy(&request(dir.path())).await;

        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("put-bucket-policy"));
        assert!(msg.contains("AccessDenied: not authorized"));
        // Nothing ran after the failing step.
        assert_eq!(runner.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_sync_never_precedes_policy() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::failing_at(1, "boom");
        let _ = SiteDeployer::new(&runner).deploy(&request(dir.path())).await;

        assert!(
            !runner
                .recorded()
                .iter()
                .any(|i| i.args.first().map(String::as_str) == Some("s3")
                    && i.args.get(1).map(String::as_str) == Some("sync"))
        );
    }

    #[tokio::test]
    async fn test_policy_file_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::passing();
        SiteDeployer::new(&runner)
            .deploy(&request(dir.path()))
            .await
            .unwrap();

        let path = policy_path(&runner.recorded()[1]);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_policy_file_removed_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::failing_at(1, "MalformedPolicy");
        let result = SiteDeployer::new(&runner).deploy(&request(dir.path())).await;

        assert!(result.is_err());
        let path = policy_path(&runner.recorded()[1]);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_invalid_input_runs_nothing() {
        let runner = FakeRunner::passing();
        let bad = DeploymentRequest {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            dist_folder: PathBuf::from("."),
        };
        let result = SiteDeployer::new(&runner).deploy(&bad).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(runner.recorded().is_empty());
    }

    #[test]
    fn test_website_url_format() {
        assert_eq!(
            website_url("my-site", "us-east-1"),
            "http://my-site.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(
            website_url("docs", "eu-central-1"),
            "http://docs.s3-website-eu-central-1.amazonaws.com"
        );
    }
}
