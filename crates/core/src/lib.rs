pub mod error;
pub mod inputs;
pub mod types;

pub use error::{Error, Result};
pub use inputs::{input_env_var, resolve_input};
pub use types::*;
