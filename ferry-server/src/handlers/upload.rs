//! Upload handler: receive a file from the peer into the storage root

use std::io;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use ferry_common::payload::{DEFAULT_PROGRESS_TIMEOUT, receive_payload};
use ferry_common::protocol::{CONFIRM_OVERWRITE, STATUS_EXISTS, STATUS_READY, success_status};

use crate::constants::{ERR_INVALID_FILE_NAME, MSG_UPLOAD_CANCELLED};
use crate::files::resolve_request_path;
use crate::handlers::HandlerContext;

/// Receive one file from the peer
///
/// Exchange: filename frame in, optional overwrite negotiation, `READY`
/// out, payload in, final status frame out. Sandbox rejections and a
/// declined overwrite keep the session alive; payload failures end it.
pub async fn handle_upload<R, W>(ctx: &mut HandlerContext<'_, R, W>) -> io::Result<()>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    let raw_name = ctx.expect_frame().await?;

    let target = match resolve_request_path(ctx.storage_root, &raw_name) {
        Ok(path) => path,
        Err(_) => {
            if ctx.debug {
                eprintln!(
                    "Rejected upload name {:?} from {}",
                    raw_name, ctx.peer_addr
                );
            }
            return ctx.send_error(ERR_INVALID_FILE_NAME).await;
        }
    };

    // Mirrors a plain exists() check: unknown is treated as absent and
    // surfaces later when the create fails
    let exists = tokio::fs::try_exists(&target).await.unwrap_or(false);
    if exists {
        ctx.send_frame(STATUS_EXISTS).await?;

        let answer = ctx.expect_frame().await?;
        if !answer.trim().eq_ignore_ascii_case(CONFIRM_OVERWRITE) {
            if ctx.debug {
                println!(
                    "Upload of {:?} declined by {}",
                    raw_name, ctx.peer_addr
                );
            }
            return ctx.send_frame(MSG_UPLOAD_CANCELLED).await;
        }
    }

    ctx.send_frame(STATUS_READY).await?;

    let mut file = match File::create(&target).await {
        Ok(file) => file,
        Err(e) => {
            // The peer is already streaming; report and drop the session
            let _ = ctx.send_error(&format!("Upload failed - {}", e)).await;
            return Err(e);
        }
    };

    match receive_payload(ctx.reader.get_mut(), &mut file, DEFAULT_PROGRESS_TIMEOUT).await {
        Ok(bytes) => {
            if ctx.debug {
                println!(
                    "Stored {:?} ({} bytes) from {}",
                    raw_name, bytes, ctx.peer_addr
                );
            }
            ctx.send_frame(&success_status(&format!(
                "File uploaded successfully ({} bytes)",
                bytes
            )))
            .await
        }
        Err(e) => {
            // Partial file stays on disk for inspection
            let _ = ctx.send_error(&format!("Upload failed - {}", e)).await;
            Err(io::Error::other(e.to_string()))
        }
    }
}
