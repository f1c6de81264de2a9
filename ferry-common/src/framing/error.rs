//! Error type for frame reading and writing

use std::fmt;
use std::io;

/// Errors produced by the framed control channel
///
/// A clean peer close is not an error: the reader reports it as `Ok(None)`.
#[derive(Debug)]
pub enum FrameError {
    /// Stream ended in the middle of a frame (length prefix or text)
    Truncated,
    /// Frame text was not valid UTF-8
    InvalidUtf8,
    /// Outbound text exceeds what the 2-byte length prefix can describe
    TooLong(usize),
    /// No data arrived within the idle timeout
    IdleTimeout,
    /// A started frame did not complete within the frame timeout
    FrameTimeout,
    /// Underlying I/O error
    Io(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "stream ended mid-frame"),
            Self::InvalidUtf8 => write!(f, "frame text is not valid UTF-8"),
            Self::TooLong(len) => {
                write!(f, "text of {} bytes exceeds maximum frame length", len)
            }
            Self::IdleTimeout => write!(f, "timed out waiting for a frame"),
            Self::FrameTimeout => write!(f, "timed out completing a frame"),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(e.to_string())
        }
    }
}

impl From<FrameError> for io::Error {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Truncated | FrameError::InvalidUtf8 => {
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            }
            FrameError::TooLong(_) => io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
            FrameError::IdleTimeout | FrameError::FrameTimeout => {
                io::Error::new(io::ErrorKind::TimedOut, e.to_string())
            }
            FrameError::Io(msg) => io::Error::other(msg),
        }
    }
}
