use async_trait::async_trait;
use s3_deploy_core::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Outcome of one external command invocation. Exit status and stderr
/// are the only channels used for failure detection; stdout is passed
/// through to the surrounding CI log untouched.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Narrow port over external process invocation so the deployer can be
/// exercised against a fake runner instead of a real provider CLI.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Production runner: spawns the provider CLI and waits for it to exit.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        // stdout is inherited so the provider CLI's progress (e.g. the
        // sync upload listing) lands in the surrounding CI log.
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed {
                command: render_command(program, args),
                stderr: format!(
                    "failed to start '{}' (is it installed and on PATH?): {}",
                    program, e
                ),
            })?;

        Ok(CommandOutput {
            // Terminated-by-signal has no code; report it as a plain failure.
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render a program and its arguments as a single line for error text.
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
