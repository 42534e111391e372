use crate::error::{Error, Result};

/// Environment variable name a CI runner uses for a named action input:
/// `INPUT_` plus the input name uppercased with spaces replaced by
/// underscores. Dashes are kept, so `bucket-region` reads
/// `INPUT_BUCKET-REGION`.
pub fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Resolve a required input: an explicit CLI flag wins, otherwise fall
/// back to the `INPUT_*` environment variable so the binary can run as
/// a GitHub Actions step without flags.
pub fn resolve_input(name: &str, flag: Option<String>) -> Result<String> {
    if let Some(value) = flag {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    match std::env::var(input_env_var(name)) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::InvalidInput(format!(
            "'{}' is required: pass --{} or set {}",
            name,
            name,
            input_env_var(name)
        ))),
    }
}
