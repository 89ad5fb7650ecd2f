//! Chunked I/O primitives.
//!
//! Moves fixed-size buffers between an async reader or writer and memory in
//! windows of at most [`CHUNK_SIZE`] bytes. The cancellable variants poll a
//! [`CancellationToken`] once per window, so cancellation latency is bounded
//! by a single chunk transfer.
//!
//! [`CancellationToken`]: ferry_common_async::CancellationToken

pub mod chunk;
pub mod error;

pub use chunk::{read_data, read_once, read_to, write_all, CHUNK_SIZE};
pub use error::IoError;
