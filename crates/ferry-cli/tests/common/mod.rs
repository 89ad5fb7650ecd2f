//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("ferry.yaml");

        Self {
            temp_dir,
            config_path,
        }
    }

    /// Write a config file and point the command at it
    pub fn with_config(self, config: &str) -> Self {
        std::fs::write(&self.config_path, config).expect("Failed to write config");
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command isolated from the caller's environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ferry").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("FERRY_ENV")
            .env_remove("FERRY_LOG_LEVEL")
            .env_remove("FERRY_LOG_FILE")
            .env_remove("FERRY_RETRY_MAX_ATTEMPTS")
            .env("FERRY_LOG_FORMAT", "compact")
            .env("FERRY_RETRY_BACKOFF_MS", "1")
            .env("NO_COLOR", "1");
        if self.config_path.exists() {
            cmd.env("FERRY_CONFIG_PATH", &self.config_path);
        } else {
            cmd.env_remove("FERRY_CONFIG_PATH");
        }
        cmd
    }
}
