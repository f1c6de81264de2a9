//! Frame reader for parsing control messages from a stream

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::time::timeout;

use super::error::FrameError;

/// Default timeout for completing a frame once the first byte is received
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(60);

/// Default idle timeout waiting for the first byte of a frame
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads length-prefixed text frames from an async reader
pub struct FrameReader<R> {
    reader: R,
}

impl<R> FrameReader<R> {
    /// Create a new frame reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the frame reader and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncReadExt + Unpin> FrameReader<R> {
    /// Read the next frame from the stream
    ///
    /// Returns `Ok(None)` if the peer closed the connection cleanly, i.e.
    /// before the first byte of a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream ends mid-frame, the text is not valid
    /// UTF-8, or an I/O error occurs.
    ///
    /// # Note
    ///
    /// This method has no timeout - it will wait indefinitely for data.
    /// Session loops should prefer
    /// [`read_frame_with_full_timeout`](Self::read_frame_with_full_timeout).
    pub async fn read_frame(&mut self) -> Result<Option<String>, FrameError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        self.read_frame_after_first_byte(first_byte).await
    }

    /// Read the next frame, bounding how long a started frame may take
    ///
    /// Waits indefinitely for the first byte (allowing idle connections),
    /// then requires the rest of the frame within `frame_timeout`.
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    pub async fn read_frame_with_timeout(
        &mut self,
        frame_timeout: Duration,
    ) -> Result<Option<String>, FrameError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        match timeout(frame_timeout, self.read_frame_after_first_byte(first_byte)).await {
            Ok(result) => result,
            Err(_) => Err(FrameError::FrameTimeout),
        }
    }

    /// Read the next frame, bounding both the idle wait and the frame itself
    ///
    /// * `idle_timeout` - maximum time to wait for the first byte
    /// * `frame_timeout` - maximum time to complete the frame afterwards
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    ///
    /// # Errors
    ///
    /// In addition to the malformed-frame errors of
    /// [`read_frame`](Self::read_frame), fails with `IdleTimeout` or
    /// `FrameTimeout` when the respective bound expires.
    pub async fn read_frame_with_full_timeout(
        &mut self,
        idle_timeout: Duration,
        frame_timeout: Duration,
    ) -> Result<Option<String>, FrameError> {
        let first_byte = match timeout(idle_timeout, self.read_byte_allow_eof()).await {
            Ok(Ok(Some(b))) => b,
            Ok(Ok(None)) => return Ok(None), // Clean disconnect
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(FrameError::IdleTimeout),
        };

        match timeout(frame_timeout, self.read_frame_after_first_byte(first_byte)).await {
            Ok(result) => result,
            Err(_) => Err(FrameError::FrameTimeout),
        }
    }

    /// Read one byte, mapping clean EOF to `None`
    async fn read_byte_allow_eof(&mut self) -> Result<Option<u8>, FrameError> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte).await {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => Err(e.into()),
        }
    }

    /// Complete a frame whose first length byte has already been read
    async fn read_frame_after_first_byte(
        &mut self,
        first_byte: u8,
    ) -> Result<Option<String>, FrameError> {
        let mut second = [0u8; 1];
        self.reader.read_exact(&mut second).await?;

        let length = u16::from_be_bytes([first_byte, second[0]]) as usize;

        let mut text = vec![0u8; length];
        self.reader.read_exact(&mut text).await?;

        match String::from_utf8(text) {
            Ok(s) => Ok(Some(s)),
            Err(_) => Err(FrameError::InvalidUtf8),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::framing::FrameWriter;

    #[tokio::test]
    async fn test_read_frame() {
        let mut data = vec![0x00, 0x05];
        data.extend_from_slice(b"READY");

        let mut reader = FrameReader::new(Cursor::new(data));
        assert_eq!(reader.read_frame().await.unwrap(), Some("READY".to_string()));
    }

    #[tokio::test]
    async fn test_read_empty_frame() {
        let mut reader = FrameReader::new(Cursor::new(vec![0x00, 0x00]));
        assert_eq!(reader.read_frame().await.unwrap(), Some(String::new()));
    }

    #[tokio::test]
    async fn test_clean_close_is_none() {
        let mut reader = FrameReader::new(Cursor::new(Vec::new()));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_truncated_length_prefix() {
        let mut reader = FrameReader::new(Cursor::new(vec![0x00]));
        assert!(matches!(
            reader.read_frame().await,
            Err(FrameError::Truncated)
        ));
    }

    #[tokio::test]
    async fn test_truncated_text() {
        // Declares 10 bytes but only 3 are available
        let mut data = vec![0x00, 0x0A];
        data.extend_from_slice(b"abc");

        let mut reader = FrameReader::new(Cursor::new(data));
        assert!(matches!(
            reader.read_frame().await,
            Err(FrameError::Truncated)
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let data = vec![0x00, 0x02, 0xFF, 0xFE];

        let mut reader = FrameReader::new(Cursor::new(data));
        assert!(matches!(
            reader.read_frame().await,
            Err(FrameError::InvalidUtf8)
        ));
    }

    #[tokio::test]
    async fn test_multiple_frames_in_sequence() {
        let mut buffer = Vec::new();
        {
            let mut writer = FrameWriter::new(Cursor::new(&mut buffer));
            writer.write_frame("2").await.unwrap();
            writer.write_frame("notes.txt").await.unwrap();
            writer.write_frame("READY").await.unwrap();
        }

        let mut reader = FrameReader::new(Cursor::new(buffer));
        assert_eq!(reader.read_frame().await.unwrap().as_deref(), Some("2"));
        assert_eq!(
            reader.read_frame().await.unwrap().as_deref(),
            Some("notes.txt")
        );
        assert_eq!(reader.read_frame().await.unwrap().as_deref(), Some("READY"));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_idle_timeout() {
        let (_client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server);

        let result = reader
            .read_frame_with_full_timeout(Duration::from_millis(50), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(FrameError::IdleTimeout)));
    }

    #[tokio::test]
    async fn test_frame_timeout_after_partial_frame() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server);

        // Send only the length prefix, then stall
        tokio::io::AsyncWriteExt::write_all(&mut client, &[0x00, 0x05])
            .await
            .unwrap();

        let result = reader
            .read_frame_with_full_timeout(Duration::from_secs(1), Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(FrameError::FrameTimeout)));
    }
}
