//! CLI error handling.

use std::io;
use std::path::PathBuf;

use ferry_common_config::ConfigError;
use ferry_common_http::HttpError;
use ferry_common_io::IoError;
use ferry_common_log::LogError;
use thiserror::Error;

use crate::output::CreateFileError;
use crate::Exit;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: HttpError,
    },

    #[error("{message}")]
    Validation { message: String },

    #[error("interrupted")]
    Interrupted,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Network { .. } => Exit::NetworkError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::Interrupted => Exit::Interrupted,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(
        message: impl Into<String>,
        source: io::Error,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: Some(path.into()),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Cancelled => Self::Interrupted,
            HttpError::UrlParse(_) | HttpError::InvalidHeader(_) | HttpError::Json(_) => {
                Self::validation(err.to_string())
            }
            HttpError::ClientBuild(_) => Self::Config {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
            HttpError::BodyRead(source) => Self::Io {
                message: format!("failed to read response body: {source}"),
                source,
                path: None,
            },
            HttpError::Handler(inner) => from_handler_error(inner),
            HttpError::Transport { .. } | HttpError::Status { .. } => Self::Network {
                message: err.to_string(),
                source: err,
            },
        }
    }
}

/// Classify a failure raised while streaming a successful body.
fn from_handler_error(inner: ferry_common_http::BoxError) -> CliError {
    let inner = match inner.downcast::<CreateFileError>() {
        Ok(create) => {
            let create = *create;
            let message = create.to_string();
            return CliError::io_with_path(message, create.source, create.path);
        }
        Err(other) => other,
    };

    let inner = match inner.downcast::<IoError>() {
        Ok(io_err) if io_err.is_cancelled() => return CliError::Interrupted,
        Ok(io_err) => {
            return CliError::Io {
                message: format!("failed to stream response body: {io_err}"),
                source: io::Error::from(*io_err),
                path: None,
            }
        }
        Err(other) => other,
    };

    match inner.downcast::<io::Error>() {
        Ok(io_err) => CliError::Io {
            message: format!("failed to stream response body: {io_err}"),
            source: *io_err,
            path: None,
        },
        Err(other) => {
            let err = HttpError::Handler(other);
            CliError::Network {
                message: err.to_string(),
                source: err,
            }
        }
    }
}
