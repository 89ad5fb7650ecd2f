//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use ferry_common_config::vars;
use ferry_common_http::{Method, Request, RequestBuilder};
use ferry_common_log::LogLevel;

use crate::error::CliError;

/// Ferry - forward one HTTP request and stream the response body
///
/// Transport failures are retried with exponential backoff. A 2xx body is
/// written to stdout (or `--output`); any other status fails with the body
/// in the error message.
#[derive(Debug, Parser)]
#[command(name = "ferry", author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help = "Increase verbosity level")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose", help = "Suppress non-error output")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        env = vars::FERRY_CONFIG_PATH,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Endpoint to call
    #[arg(value_hint = ValueHint::Url)]
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long = "request", default_value = "GET")]
    pub method: String,

    /// Query parameter, repeatable
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(long, value_name = "BODY")]
    pub json: Option<String>,

    /// Bearer token for the Authorization header
    #[arg(long, value_name = "TOKEN")]
    pub bearer: Option<String>,

    /// Write the response body to a file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME:VALUE, got {s:?}")),
    }
}

impl Cli {
    /// The effective log level given the configured one.
    pub fn log_level(&self, configured: LogLevel) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else {
            configured.more_verbose(self.verbose)
        }
    }

    /// Assemble the outbound request from the arguments.
    pub fn build_request(&self) -> Result<Request, CliError> {
        let method = Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|_| CliError::validation(format!("invalid method: {}", self.method)))?;

        let mut builder = RequestBuilder::new(method, self.url.as_str());
        for (key, value) in &self.params {
            builder = builder.query(key.as_str(), value.as_str());
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &self.json {
            let value: serde_json::Value = serde_json::from_str(body)
                .map_err(|e| CliError::validation(format!("--json is not valid JSON: {e}")))?;
            builder = builder.json(&value);
        }

        Ok(builder.build()?)
    }
}
