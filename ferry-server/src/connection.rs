//! Per-connection session loop
//!
//! Each accepted socket gets one task running [`handle_connection`], which
//! reads command frames and dispatches to the handlers until the peer
//! disconnects, a command fails, or shutdown is signalled.

use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use ferry_common::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameReader, FrameWriter,
};
use ferry_common::protocol::Command;

use crate::handlers::{HandlerContext, handle_download, handle_list, handle_upload};

/// Per-connection configuration handed to the session task
pub struct ConnectionParams {
    pub peer_addr: SocketAddr,
    pub storage_root: &'static Path,
    pub debug: bool,
    /// Flips to `true` when the server is shutting down
    pub shutdown: watch::Receiver<bool>,
}

/// Drive one client session to completion
///
/// Generic over the stream so tests can use in-memory duplex pipes. All
/// exits are clean from the server's point of view: errors are logged
/// (when `--debug` is set) and the write side is shut down.
pub async fn handle_connection<S>(stream: S, mut params: ConnectionParams)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = FrameReader::new(BufReader::new(read_half));
    let mut writer = FrameWriter::new(write_half);

    if params.debug {
        println!("Session started for {}", params.peer_addr);
    }

    loop {
        let frame = tokio::select! {
            result = reader.read_frame_with_full_timeout(DEFAULT_IDLE_TIMEOUT, DEFAULT_FRAME_TIMEOUT) => result,
            _ = params.shutdown.changed() => {
                if params.debug {
                    println!("Closing session for {} (shutdown)", params.peer_addr);
                }
                break;
            }
        };

        let token = match frame {
            Ok(Some(token)) => token,
            Ok(None) => {
                if params.debug {
                    println!("Peer {} disconnected", params.peer_addr);
                }
                break;
            }
            Err(e) => {
                if params.debug {
                    eprintln!("Session error from {}: {}", params.peer_addr, e);
                }
                break;
            }
        };

        let mut ctx = HandlerContext {
            reader: &mut reader,
            writer: &mut writer,
            storage_root: params.storage_root,
            peer_addr: params.peer_addr,
            debug: params.debug,
        };

        let result = match Command::parse(token.trim()) {
            Some(Command::Download) => handle_download(&mut ctx).await,
            Some(Command::Upload) => handle_upload(&mut ctx).await,
            Some(Command::List) => handle_list(&mut ctx).await,
            Some(Command::Disconnect) => {
                if params.debug {
                    println!("Peer {} requested disconnect", params.peer_addr);
                }
                break;
            }
            None => {
                // Unknown token: report it and keep the session alive
                ctx.send_error(&format!(
                    "Invalid request: '{}'. Valid requests: 1 (Download), 2 (Upload), 3 (List), 4 (Exit)",
                    token
                ))
                .await
            }
        };

        if let Err(e) = result {
            if params.debug {
                eprintln!("Command failed for {}: {}", params.peer_addr, e);
            }
            break;
        }
    }

    // Flush any buffered status frame before dropping the socket
    let _ = writer.get_mut().shutdown().await;
}
