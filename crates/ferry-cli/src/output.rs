//! Response body sink for `--output`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use ferry_common_async::CancellationToken;
use ferry_common_http::{Body, BodyHandler, BoxError, CopyTo, HeaderMap};
use thiserror::Error;
use tokio::fs::File;
use tracing::debug;

/// The output file could not be created.
#[derive(Debug, Error)]
#[error("failed to create {}: {source}", path.display())]
pub struct CreateFileError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Writes a successful body to a file, creating it on the first `handle`.
///
/// An existing file is only truncated once a 2xx response is being copied.
pub struct OutputFile {
    path: PathBuf,
    cancel: CancellationToken,
    copied: u64,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, cancel: CancellationToken) -> Self {
        Self {
            path: path.into(),
            cancel,
            copied: 0,
        }
    }

    /// Bytes written so far.
    pub fn copied(&self) -> u64 {
        self.copied
    }
}

#[async_trait]
impl BodyHandler for OutputFile {
    async fn handle(&mut self, headers: &HeaderMap, body: &mut Body) -> Result<(), BoxError> {
        let file = File::create(&self.path)
            .await
            .map_err(|source| CreateFileError {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), "writing response body");

        let mut copy = CopyTo::new(file).with_cancel(self.cancel.clone());
        let result = copy.handle(headers, body).await;
        self.copied = copy.copied();
        result
    }
}
