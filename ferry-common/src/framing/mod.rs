//! Length-prefixed control frames
//!
//! Every control message (command codes, file names, status strings, file
//! listings) travels as one frame: a 2-byte big-endian length followed by
//! that many bytes of UTF-8 text. Raw file payloads never use this channel;
//! they are streamed separately (see [`crate::payload`]).

mod error;
mod reader;
mod writer;

pub use error::FrameError;
pub use reader::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameReader,
};
pub use writer::FrameWriter;

/// Maximum text length a single frame can carry (the length prefix is u16)
pub const MAX_TEXT_LENGTH: usize = u16::MAX as usize;
