//! Consumers for successful response bodies.

use crate::error::BoxError;
use crate::response::Body;
use async_trait::async_trait;
use ferry_common_async::CancellationToken;
use ferry_common_io::{read_to, write_all, CHUNK_SIZE};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Receives the headers and live body of a 2xx response.
///
/// The handler decides how much of the body to consume. Whatever it returns
/// becomes the outcome of the forwarding call.
#[async_trait]
pub trait BodyHandler: Send {
    async fn handle(&mut self, headers: &HeaderMap, body: &mut Body) -> Result<(), BoxError>;
}

/// A body larger than the configured limit.
#[derive(Debug, thiserror::Error)]
#[error("response body exceeds {limit} bytes")]
pub struct BodyTooLarge {
    pub limit: usize,
}

/// Buffers the whole body in memory.
#[derive(Debug, Default)]
pub struct CollectBody {
    limit: Option<usize>,
    cancel: CancellationToken,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl CollectBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`BodyTooLarge`] instead of buffering more than `limit` bytes.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.bytes)
    }

    /// The `Content-Type` of the collected response.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

#[async_trait]
impl BodyHandler for CollectBody {
    async fn handle(&mut self, headers: &HeaderMap, body: &mut Body) -> Result<(), BoxError> {
        self.content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match self.limit {
            Some(limit) => {
                // One spare byte tells a body of exactly `limit` from a longer one.
                let budget = limit.saturating_add(1);
                let mut window = [0u8; CHUNK_SIZE];
                self.bytes.clear();
                while self.bytes.len() < budget {
                    let want = CHUNK_SIZE.min(budget - self.bytes.len());
                    let n = read_to(&self.cancel, body, &mut window[..want]).await?;
                    self.bytes.extend_from_slice(&window[..n]);
                    if n < want {
                        break;
                    }
                }
                if self.bytes.len() > limit {
                    self.bytes.clear();
                    return Err(BodyTooLarge { limit }.into());
                }
            }
            None => {
                self.bytes.clear();
                body.read_to_end(&mut self.bytes).await?;
            }
        }

        Ok(())
    }
}

/// Streams the body into a writer one chunk at a time.
#[derive(Debug)]
pub struct CopyTo<W> {
    writer: W,
    cancel: CancellationToken,
    copied: u64,
}

impl<W> CopyTo<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            cancel: CancellationToken::never(),
            copied: 0,
        }
    }

    /// Abort the copy between chunks once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Bytes written so far.
    pub fn copied(&self) -> u64 {
        self.copied
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> BodyHandler for CopyTo<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn handle(&mut self, _headers: &HeaderMap, body: &mut Body) -> Result<(), BoxError> {
        let mut buf = vec![0u8; CHUNK_SIZE];

        loop {
            let n = read_to(&self.cancel, body, &mut buf).await?;
            write_all(&self.cancel, &mut self.writer, &buf[..n]).await?;
            self.copied += n as u64;
            trace!(chunk = n, total = self.copied, "copied body chunk");
            if n < buf.len() {
                break;
            }
        }

        self.writer.flush().await?;
        Ok(())
    }
}
