//! Ferry Common Library
//!
//! Shared protocol code for the Ferry file transfer utility: the framed
//! control channel, the raw payload streamer, and the command/status
//! vocabulary both binaries speak.

pub mod framing;
pub mod payload;
pub mod protocol;

/// Default port for Ferry connections
pub const DEFAULT_PORT: u16 = 7600;

/// Default listen backlog for the server socket
pub const DEFAULT_BACKLOG: i32 = 50;
