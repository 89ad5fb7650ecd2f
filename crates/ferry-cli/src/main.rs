//! Ferry CLI - forward one HTTP request with retries
//!
//! Main entry point for the `ferry` binary.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ferry_common_async::CancellationToken;
use ferry_common_config::{
    load_dotenv, ConfigLoader, FerryConfig, HttpSection, RetrySection,
};
use ferry_common_http::{CopyTo, Forwarder, HttpClient, HttpConfig, RetryPolicy};
use ferry_common_log::{LogConfig, LogFormat, LogLevel};
use tracing::{debug, error, info, warn};

mod cli;
mod error;
mod output;

use cli::Cli;
use error::CliError;
use output::OutputFile;

/// Application exit codes
///
/// Code 2 is left to clap for usage errors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    ConfigError = 6,
    IoError = 3,
    NetworkError = 4,
    ValidationError = 5,
    Interrupted = 130,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet.
            eprintln!("ferry: {e}");
            return e.exit_code().into();
        }
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("ferry: {e}");
        return e.exit_code().into();
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create Tokio runtime: {e}");
            return Exit::IoError.into();
        }
    };

    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
        run(cli, config, cancel).await
    });

    match result {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!("{e}");
            e.exit_code().into()
        }
    }
}

fn load_config(cli: &Cli) -> Result<FerryConfig, CliError> {
    load_dotenv().map_err(|e| CliError::config(e.to_string()))?;

    let loader = match &cli.config {
        Some(path) => ConfigLoader::from_file(path),
        None => ConfigLoader::default(),
    };
    Ok(loader.load()?)
}

fn init_logging(cli: &Cli, config: &FerryConfig) -> Result<(), CliError> {
    let configured = LogLevel::parse(&config.log.level).unwrap_or_default();
    let log_config = LogConfig::from_env()
        .with_level(cli.log_level(configured))
        .with_format(LogFormat::parse(&config.log.format));

    ferry_common_log::init(log_config)?;
    Ok(())
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupt received, cancelling");
        cancel.cancel();
    }
}

async fn run(cli: Cli, config: FerryConfig, cancel: CancellationToken) -> Result<(), CliError> {
    let request = cli.build_request()?;
    let client = HttpClient::with_config(http_config(&config.http))?;
    let forwarder = Forwarder::with_policy(client, retry_policy(&config.retry));

    info!(method = %request.method(), url = %request.url(), "forwarding request");

    let copied = match &cli.output {
        Some(path) => {
            let mut handler = OutputFile::new(path, cancel.clone());
            forwarder.forward(&request, Some(&mut handler), &cancel).await?;
            handler.copied()
        }
        None => {
            let mut handler = CopyTo::new(tokio::io::stdout()).with_cancel(cancel.clone());
            forwarder.forward(&request, Some(&mut handler), &cancel).await?;
            handler.copied()
        }
    };

    debug!(bytes = copied, "response body written");
    Ok(())
}

fn http_config(section: &HttpSection) -> HttpConfig {
    let defaults = HttpConfig::default();
    HttpConfig {
        connect_timeout: Duration::from_millis(section.connect_timeout_ms),
        request_timeout: Duration::from_millis(section.request_timeout_ms),
        user_agent: section.user_agent.clone().unwrap_or(defaults.user_agent),
        pool_max_idle_per_host: section.pool_max_idle_per_host,
        gzip: section.gzip,
    }
}

fn retry_policy(section: &RetrySection) -> RetryPolicy {
    RetryPolicy::new(
        section.max_attempts,
        Duration::from_millis(section.initial_backoff_ms),
    )
}
