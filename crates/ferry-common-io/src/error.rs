//! Chunked I/O errors.

use std::io;
use thiserror::Error;

/// Errors raised by the chunked copy primitives.
#[derive(Debug, Error)]
pub enum IoError {
    /// A bounded read of a labelled part failed.
    #[error("read {part}: {source}")]
    Read {
        part: String,
        #[source]
        source: io::Error,
    },

    /// A strict read returned fewer bytes than the buffer holds.
    #[error("unexpected EOF for {part}: expected to read {expected} bytes, but got {actual}")]
    ShortRead {
        part: String,
        expected: usize,
        actual: usize,
    },

    /// The cancellation signal was observed mid-transfer.
    #[error("transfer canceled after {transferred} bytes")]
    Cancelled { transferred: usize },

    /// Underlying reader or writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IoError {
    /// Whether this error came from a fired cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The label of the part being read, for `Read` and `ShortRead`.
    pub fn part(&self) -> Option<&str> {
        match self {
            Self::Read { part, .. } | Self::ShortRead { part, .. } => Some(part),
            _ => None,
        }
    }
}

impl From<IoError> for io::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => e,
            IoError::Read { source, .. } => source,
            IoError::ShortRead { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            IoError::Cancelled { .. } => io::Error::new(io::ErrorKind::Interrupted, err),
        }
    }
}
