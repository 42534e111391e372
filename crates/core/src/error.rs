use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A required parameter is missing or malformed. Raised before any
    /// external command runs.
    InvalidInput(String),
    /// An external provider command exited non-zero (or could not be
    /// spawned at all). Carries the command line and its stderr text.
    CommandFailed { command: String, stderr: String },
    /// Failure to write or remove the transient policy document.
    Artifact(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::CommandFailed { command, stderr } => {
                if stderr.is_empty() {
                    write!(f, "Command failed: {}", command)
                } else {
                    write!(f, "Command failed: {}: {}", command, stderr.trim_end())
                }
            }
            Error::Artifact(msg) => write!(f, "Policy artifact error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
