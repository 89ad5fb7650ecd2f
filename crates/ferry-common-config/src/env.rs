//! Environment variable handling.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const FERRY_CONFIG_PATH: &str = "FERRY_CONFIG_PATH";
    pub const FERRY_ENV: &str = "FERRY_ENV";

    // Overrides
    pub const FERRY_RETRY_MAX_ATTEMPTS: &str = "FERRY_RETRY_MAX_ATTEMPTS";
    pub const FERRY_RETRY_BACKOFF_MS: &str = "FERRY_RETRY_BACKOFF_MS";
    pub const FERRY_LOG_LEVEL: &str = "FERRY_LOG_LEVEL";
    pub const FERRY_LOG_FORMAT: &str = "FERRY_LOG_FORMAT";
}

/// Load `.env` files into the process environment.
///
/// Variables already set in the process are never overwritten, so the first
/// file to define a name wins: `.env.local`, then `.env.<FERRY_ENV>`, then
/// `.env`. Missing files are skipped.
pub fn load_dotenv() -> Result<(), EnvError> {
    load_optional(".env.local")?;
    if let Ok(name) = env::var(vars::FERRY_ENV) {
        load_optional(&format!(".env.{name}"))?;
    }
    load_optional(".env")
}

fn load_optional(file: &str) -> Result<(), EnvError> {
    match dotenvy::from_filename(file) {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Parse an optional raw value for `var` as an integer.
pub(crate) fn parse_int<T: FromStr>(
    var: &str,
    raw: Option<String>,
) -> Result<Option<T>, EnvError> {
    match raw {
        Some(v) => v.trim().parse().map(Some).map_err(|_| EnvError::InvalidValue {
            var: var.to_string(),
            message: format!("expected integer, got {v:?}"),
        }),
        None => Ok(None),
    }
}
