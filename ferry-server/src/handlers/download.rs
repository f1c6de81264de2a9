//! Download handler: stream a stored file to the peer

use std::io;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use ferry_common::payload::send_payload;
use ferry_common::protocol::STATUS_READY;

use crate::constants::{ERR_FILE_NOT_FOUND, ERR_INVALID_FILE_PATH};
use crate::files::resolve_request_path;
use crate::handlers::HandlerContext;

/// Send one stored file to the peer
///
/// Exchange: filename frame in, `READY` out, payload out. Missing files
/// and sandbox rejections get an error status instead of `READY` and the
/// session continues. No status frame follows the payload.
pub async fn handle_download<R, W>(ctx: &mut HandlerContext<'_, R, W>) -> io::Result<()>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    let raw_name = ctx.expect_frame().await?;

    let source = match resolve_request_path(ctx.storage_root, &raw_name) {
        Ok(path) => path,
        Err(_) => {
            if ctx.debug {
                eprintln!(
                    "Rejected download name {:?} from {}",
                    raw_name, ctx.peer_addr
                );
            }
            return ctx.send_error(ERR_INVALID_FILE_PATH).await;
        }
    };

    let is_file = tokio::fs::metadata(&source)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return ctx
            .send_error(&format!("{}{}", ERR_FILE_NOT_FOUND, raw_name))
            .await;
    }

    // Open before READY so an unreadable file still gets an error status
    let mut file = match File::open(&source).await {
        Ok(file) => file,
        Err(e) => {
            return ctx
                .send_error(&format!("Download failed - {}", e))
                .await;
        }
    };

    ctx.send_frame(STATUS_READY).await?;

    let bytes = send_payload(&mut file, ctx.writer.get_mut()).await?;
    if ctx.debug {
        println!(
            "Sent {:?} ({} bytes) to {}",
            raw_name, bytes, ctx.peer_addr
        );
    }

    Ok(())
}
