//! Command handlers for the per-connection dispatcher

mod download;
mod list;
mod upload;

pub use download::handle_download;
pub use list::handle_list;
pub use upload::handle_upload;

use std::io;
use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use ferry_common::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameReader, FrameWriter,
};
use ferry_common::protocol::error_status;

/// Context passed to all handlers with the session's channel and config
pub struct HandlerContext<'a, R, W> {
    pub reader: &'a mut FrameReader<R>,
    pub writer: &'a mut FrameWriter<W>,
    /// Canonical storage root; all file paths resolve beneath it
    pub storage_root: &'a Path,
    pub peer_addr: SocketAddr,
    pub debug: bool,
}

impl<'a, R, W> HandlerContext<'a, R, W>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    /// Send one control frame to the peer
    pub async fn send_frame(&mut self, text: &str) -> io::Result<()> {
        self.writer
            .write_frame(text)
            .await
            .map_err(io::Error::from)
    }

    /// Send an `ERROR: `-prefixed status frame
    pub async fn send_error(&mut self, detail: &str) -> io::Result<()> {
        self.send_frame(&error_status(detail)).await
    }

    /// Read the next control frame, treating peer close as a failure
    ///
    /// Handlers call this mid-exchange, where a close means the peer
    /// abandoned the operation.
    pub async fn expect_frame(&mut self) -> io::Result<String> {
        match self
            .reader
            .read_frame_with_full_timeout(DEFAULT_IDLE_TIMEOUT, DEFAULT_FRAME_TIMEOUT)
            .await
        {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "peer closed the connection mid-exchange",
            )),
            Err(e) => Err(e.into()),
        }
    }
}
