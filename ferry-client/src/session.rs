//! Client-side protocol driver
//!
//! [`Session`] owns the framed channel to the server and exposes one method
//! per protocol step. The interactive loop in `main` collects user decisions
//! between steps; nothing here reads stdin, so tests can drive a session
//! over an in-memory pipe.

use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use ferry_common::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameReader, FrameWriter,
};
use ferry_common::payload::{DEFAULT_PROGRESS_TIMEOUT, receive_payload, send_payload};
use ferry_common::protocol::{
    CONFIRM_OVERWRITE, Command, DECLINE_OVERWRITE, STATUS_EXISTS, STATUS_READY,
};

use crate::constants::ERR_SERVER_CLOSED;

/// A server response to an upload or download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    /// Server is ready for the payload
    Ready,
    /// Upload target exists; the server wants an overwrite decision
    Exists,
    /// A status frame, usually `ERROR: `-prefixed
    Status(String),
}

/// One connected session with the server
pub struct Session<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    idle_timeout: Duration,
    frame_timeout: Duration,
}

impl<R, W> Session<R, W>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        }
    }

    /// Override the control-frame read timeouts
    #[must_use]
    pub fn with_timeouts(mut self, idle_timeout: Duration, frame_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self.frame_timeout = frame_timeout;
        self
    }

    /// Ask the server for a stored file
    ///
    /// Sends the download command and the file name, then reports the
    /// server's answer. On [`ServerReply::Ready`] the caller must follow
    /// with [`receive_file`](Self::receive_file).
    pub async fn request_download(&mut self, remote_name: &str) -> io::Result<ServerReply> {
        self.send(Command::Download.as_str()).await?;
        self.send(remote_name).await?;
        self.read_reply().await
    }

    /// Receive the payload of a granted download into `target`
    ///
    /// A failed transfer deletes the partial file so a truncated download
    /// is never mistaken for a complete one.
    pub async fn receive_file(&mut self, target: &Path) -> io::Result<u64> {
        let mut file = File::create(target).await?;

        match receive_payload(self.reader.get_mut(), &mut file, DEFAULT_PROGRESS_TIMEOUT).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(target).await;
                Err(io::Error::other(e.to_string()))
            }
        }
    }

    /// Offer a file to the server under `file_name`
    ///
    /// On [`ServerReply::Exists`] the caller decides between
    /// [`confirm_overwrite`](Self::confirm_overwrite) and
    /// [`decline_overwrite`](Self::decline_overwrite); on
    /// [`ServerReply::Ready`] it follows with [`send_file`](Self::send_file).
    pub async fn request_upload(&mut self, file_name: &str) -> io::Result<ServerReply> {
        self.send(Command::Upload.as_str()).await?;
        self.send(file_name).await?;
        self.read_reply().await
    }

    /// Tell the server to overwrite the existing file
    pub async fn confirm_overwrite(&mut self) -> io::Result<ServerReply> {
        self.send(CONFIRM_OVERWRITE).await?;
        self.read_reply().await
    }

    /// Tell the server to keep its copy; returns the cancellation notice
    pub async fn decline_overwrite(&mut self) -> io::Result<String> {
        self.send(DECLINE_OVERWRITE).await?;
        self.expect_frame().await
    }

    /// Stream `source` to the server and return (bytes sent, final status)
    pub async fn send_file(&mut self, source: &Path) -> io::Result<(u64, String)> {
        let mut file = File::open(source).await?;
        let bytes = send_payload(&mut file, self.writer.get_mut()).await?;
        let status = self.expect_frame().await?;
        Ok((bytes, status))
    }

    /// Fetch the server's file listing as a single block of text
    pub async fn list(&mut self) -> io::Result<String> {
        self.send(Command::List.as_str()).await?;
        self.expect_frame().await
    }

    /// Announce the disconnect and close the write side
    ///
    /// The server sends no reply; it just drops the session.
    pub async fn disconnect(&mut self) -> io::Result<()> {
        self.send(Command::Disconnect.as_str()).await?;
        self.writer.get_mut().shutdown().await
    }

    async fn send(&mut self, text: &str) -> io::Result<()> {
        self.writer
            .write_frame(text)
            .await
            .map_err(io::Error::from)
    }

    /// Read the next control frame, bounded by the session timeouts
    ///
    /// A stalled server surfaces as a timeout error rather than blocking
    /// the interactive loop forever.
    async fn expect_frame(&mut self) -> io::Result<String> {
        match self
            .reader
            .read_frame_with_full_timeout(self.idle_timeout, self.frame_timeout)
            .await
        {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                ERR_SERVER_CLOSED,
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_reply(&mut self) -> io::Result<ServerReply> {
        let frame = self.expect_frame().await?;
        Ok(match frame.as_str() {
            STATUS_READY => ServerReply::Ready,
            STATUS_EXISTS => ServerReply::Exists,
            _ => ServerReply::Status(frame),
        })
    }
}

/// Sanitize a file name for use on the wire and the local disk
///
/// Anything outside `[A-Za-z0-9._-]` becomes an underscore, so a name the
/// server echoes back can always be used as a local path segment.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
