//! Raw payload streaming
//!
//! File bytes do not travel in control frames. The sender copies the file to
//! the stream in fixed-size chunks and appends the terminator marker; the
//! receiver copies chunks to disk until it sees the marker. The marker is
//! matched as a plain substring of the payload, so a file whose content
//! contains the marker bytes is truncated at the first occurrence. That is a
//! wire-format constraint of the existing protocol, kept for compatibility;
//! changing it means a new protocol version, not a fix here.

use std::fmt;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

/// In-band end-of-payload marker
pub const TERMINATOR: &[u8] = b"finish";

/// Read/write granularity for payload streaming (8 KiB)
///
/// Implementation-local: peers do not need to agree on it.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Default timeout between successive payload chunks
pub const DEFAULT_PROGRESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors produced while receiving a payload
#[derive(Debug)]
pub enum PayloadError {
    /// Stream ended before the terminator marker appeared
    Incomplete {
        /// Bytes already written to the destination
        received: u64,
    },
    /// No payload bytes arrived within the progress timeout
    ProgressTimeout,
    /// Underlying I/O error (network or destination file)
    Io(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { received } => {
                write!(f, "stream ended before terminator ({} bytes received)", received)
            }
            Self::ProgressTimeout => write!(f, "timed out waiting for payload data"),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PayloadError {}

impl From<io::Error> for PayloadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Stream a file's bytes to the wire, followed by the terminator marker
///
/// Returns the number of payload bytes sent, excluding the marker.
///
/// # Errors
///
/// Returns an error if reading the source or writing the stream fails.
pub async fn send_payload<F, W>(source: &mut F, stream: &mut W) -> io::Result<u64>
where
    F: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = source.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        stream.write_all(&buffer[..n]).await?;
        total += n as u64;
    }

    stream.write_all(TERMINATOR).await?;
    stream.flush().await?;

    Ok(total)
}

/// Receive payload bytes from the wire into a destination writer
///
/// Reads chunks until the terminator marker is found, writing everything
/// before the marker to `dest`. Bytes after the marker within the same chunk
/// are discarded; no further stream data is consumed for this payload.
/// Returns the number of payload bytes written.
///
/// The marker is only recognized within a single read; if the stream ends
/// first the transfer is incomplete.
///
/// # Errors
///
/// Fails with `Incomplete` if the stream ends before the marker,
/// `ProgressTimeout` if no data arrives within `progress_timeout`, or `Io`
/// for network/disk errors.
pub async fn receive_payload<R, F>(
    stream: &mut R,
    dest: &mut F,
    progress_timeout: Duration,
) -> Result<u64, PayloadError>
where
    R: AsyncReadExt + Unpin,
    F: AsyncWriteExt + Unpin,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = match timeout(progress_timeout, stream.read(&mut buffer)).await {
            Ok(result) => result?,
            Err(_) => return Err(PayloadError::ProgressTimeout),
        };

        if n == 0 {
            return Err(PayloadError::Incomplete { received: total });
        }

        match find_terminator(&buffer[..n]) {
            Some(index) => {
                if index > 0 {
                    dest.write_all(&buffer[..index]).await?;
                    total += index as u64;
                }
                dest.flush().await?;
                return Ok(total);
            }
            None => {
                dest.write_all(&buffer[..n]).await?;
                total += n as u64;
            }
        }
    }
}

/// Find the first occurrence of the terminator marker in a chunk
fn find_terminator(chunk: &[u8]) -> Option<usize> {
    chunk
        .windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    async fn roundtrip(content: &[u8]) -> (u64, u64, Vec<u8>) {
        let mut wire = Vec::new();
        let sent = send_payload(&mut Cursor::new(content), &mut Cursor::new(&mut wire))
            .await
            .unwrap();

        let mut received = Vec::new();
        let got = receive_payload(
            &mut Cursor::new(wire),
            &mut Cursor::new(&mut received),
            DEFAULT_PROGRESS_TIMEOUT,
        )
        .await
        .unwrap();

        (sent, got, received)
    }

    #[tokio::test]
    async fn test_roundtrip_small_payload() {
        let content = b"hello, ferry";
        let (sent, got, received) = roundtrip(content).await;

        assert_eq!(sent, content.len() as u64);
        assert_eq!(got, content.len() as u64);
        assert_eq!(received, content);
    }

    #[tokio::test]
    async fn test_roundtrip_multi_chunk_payload() {
        // Spans several read chunks
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let (sent, got, received) = roundtrip(&content).await;

        assert_eq!(sent, content.len() as u64);
        assert_eq!(got, content.len() as u64);
        assert_eq!(received, content);
    }

    #[tokio::test]
    async fn test_zero_byte_payload() {
        let (sent, got, received) = roundtrip(b"").await;

        assert_eq!(sent, 0);
        assert_eq!(got, 0);
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn test_sender_appends_terminator() {
        let mut wire = Vec::new();
        send_payload(&mut Cursor::new(b"abc".as_slice()), &mut Cursor::new(&mut wire))
            .await
            .unwrap();

        assert_eq!(wire, b"abcfinish");
    }

    #[tokio::test]
    async fn test_embedded_terminator_truncates() {
        // Known protocol defect: content containing the marker is cut short
        let content = b"before-finish-after";
        let (sent, got, received) = roundtrip(content).await;

        assert_eq!(sent, content.len() as u64);
        assert_eq!(got, 7);
        assert_eq!(received, b"before-");
    }

    #[tokio::test]
    async fn test_eof_before_terminator_is_incomplete() {
        // Wire ends without the marker
        let wire = b"partial data".to_vec();
        let mut received = Vec::new();

        let result = receive_payload(
            &mut Cursor::new(wire),
            &mut Cursor::new(&mut received),
            DEFAULT_PROGRESS_TIMEOUT,
        )
        .await;

        match result {
            Err(PayloadError::Incomplete { received: n }) => assert_eq!(n, 12),
            other => panic!("expected Incomplete, got {:?}", other),
        }
        // Bytes seen so far were still written out
        assert_eq!(received, b"partial data");
    }

    #[tokio::test]
    async fn test_progress_timeout() {
        let (_client, mut server) = tokio::io::duplex(64);
        let mut received = Vec::new();

        let result = receive_payload(
            &mut server,
            &mut Cursor::new(&mut received),
            Duration::from_millis(50),
        )
        .await;

        assert!(matches!(result, Err(PayloadError::ProgressTimeout)));
    }

    #[tokio::test]
    async fn test_trailing_bytes_after_marker_discarded() {
        let wire = b"datafinishgarbage".to_vec();
        let mut received = Vec::new();

        let got = receive_payload(
            &mut Cursor::new(wire),
            &mut Cursor::new(&mut received),
            DEFAULT_PROGRESS_TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(got, 4);
        assert_eq!(received, b"data");
    }
}
