//! Bounded reads and complete writes over async streams.

use crate::error::IoError;
use ferry_common_async::CancellationToken;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Largest window moved by a single read or write call.
pub const CHUNK_SIZE: usize = 8192;

/// Issue exactly one read into `buf`.
///
/// `part` labels the logical field being read and is carried by any error.
/// Reaching end of stream before any byte lands in a non-empty `buf` is a
/// [`IoError::Read`] with [`io::ErrorKind::UnexpectedEof`]. With `check_len`,
/// a read shorter than `buf` fails with [`IoError::ShortRead`].
pub async fn read_once<R>(
    reader: &mut R,
    part: &str,
    buf: &mut [u8],
    check_len: bool,
) -> Result<usize, IoError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if buf.is_empty() {
        return Ok(0);
    }

    let n = match reader.read(buf).await {
        Ok(0) => {
            return Err(IoError::Read {
                part: part.to_string(),
                source: io::Error::from(io::ErrorKind::UnexpectedEof),
            })
        }
        Ok(n) => n,
        Err(source) => {
            return Err(IoError::Read {
                part: part.to_string(),
                source,
            })
        }
    };

    if check_len && n != buf.len() {
        return Err(IoError::ShortRead {
            part: part.to_string(),
            expected: buf.len(),
            actual: n,
        });
    }

    Ok(n)
}

/// Read exactly `total` bytes into a freshly allocated buffer.
///
/// Short reads are tolerated; the buffer is filled window by window until
/// complete. Any failed sub-read aborts the whole operation.
pub async fn read_data<R>(reader: &mut R, name: &str, total: usize) -> Result<Vec<u8>, IoError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; total];
    let mut start = 0;

    while start < total {
        let end = total.min(start + CHUNK_SIZE);
        let n = read_once(reader, name, &mut buf[start..end], false).await?;
        start += n;
        trace!(part = name, read = n, remaining = total - start, "read chunk");
    }

    Ok(buf)
}

/// Fill `buf` from `reader`, stopping early at end of stream.
///
/// `cancel` is checked before every window. End of stream is not an error:
/// the number of bytes written so far is returned. A full buffer returns
/// `buf.len()`.
pub async fn read_to<R>(
    cancel: &CancellationToken,
    reader: &mut R,
    buf: &mut [u8],
) -> Result<usize, IoError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let total = buf.len();
    let mut start = 0;

    while start < total {
        if cancel.is_cancelled() {
            return Err(IoError::Cancelled { transferred: start });
        }

        let end = total.min(start + CHUNK_SIZE);
        let n = reader.read(&mut buf[start..end]).await?;
        if n == 0 {
            trace!(read = start, capacity = total, "reader reached EOF");
            return Ok(start);
        }
        start += n;
    }

    Ok(total)
}

/// Write all of `data`, retrying the remainder after short writes.
///
/// `cancel` is checked before every write call. A writer that accepts zero
/// bytes fails with [`io::ErrorKind::WriteZero`].
pub async fn write_all<W>(
    cancel: &CancellationToken,
    writer: &mut W,
    data: &[u8],
) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut offset = 0;

    while offset < data.len() {
        if cancel.is_cancelled() {
            return Err(IoError::Cancelled { transferred: offset });
        }

        let n = writer.write(&data[offset..]).await?;
        if n == 0 {
            return Err(io::Error::from(io::ErrorKind::WriteZero).into());
        }
        offset += n;
        trace!(written = n, remaining = data.len() - offset, "wrote chunk");
    }

    Ok(())
}
