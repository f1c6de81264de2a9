//! Listing handler: report the storage root's files in one frame

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::files::{format_listing, list_storage_root, root_label};
use crate::handlers::HandlerContext;

/// Send the storage root listing as a single text frame
pub async fn handle_list<R, W>(ctx: &mut HandlerContext<'_, R, W>) -> io::Result<()>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    let names = match list_storage_root(ctx.storage_root).await {
        Ok(names) => names,
        Err(e) => {
            return ctx.send_error(&format!("List failed - {}", e)).await;
        }
    };

    if ctx.debug {
        println!("Listed {} file(s) for {}", names.len(), ctx.peer_addr);
    }

    let listing = format_listing(&root_label(ctx.storage_root), &names);
    ctx.send_frame(&listing).await
}
