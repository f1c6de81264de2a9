//! Frame writer for sending control messages to a stream

use tokio::io::AsyncWriteExt;

use super::MAX_TEXT_LENGTH;
use super::error::FrameError;

/// Writes length-prefixed text frames to an async writer
pub struct FrameWriter<W> {
    writer: W,
}

impl<W> FrameWriter<W> {
    /// Create a new frame writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the frame writer and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWriteExt + Unpin> FrameWriter<W> {
    /// Write one text frame to the stream and flush it
    ///
    /// The frame is assembled into a single buffer before writing, so two
    /// `write_frame` calls on the same channel never interleave bytes.
    ///
    /// # Errors
    ///
    /// Returns `TooLong` if `text` exceeds the 2-byte length prefix, or an
    /// I/O error from the underlying writer.
    pub async fn write_frame(&mut self, text: &str) -> Result<(), FrameError> {
        let bytes = text.as_bytes();
        if bytes.len() > MAX_TEXT_LENGTH {
            return Err(FrameError::TooLong(bytes.len()));
        }

        let mut frame = Vec::with_capacity(2 + bytes.len());
        frame.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        frame.extend_from_slice(bytes);

        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
