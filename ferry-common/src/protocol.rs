//! Command codes and status-string conventions
//!
//! Commands travel as single-token text frames; both peers must be built
//! with the same mapping. Statuses are human-readable strings whose prefix
//! (`SUCCESS: ` / `ERROR: `) is the only machine-parsed part.

use std::fmt;

/// Status frame sent when an upload target already exists
pub const STATUS_EXISTS: &str = "EXISTS";

/// Status frame sent when the server is ready for payload bytes
pub const STATUS_READY: &str = "READY";

/// Affirmative overwrite answer (matched case-insensitively by the server)
pub const CONFIRM_OVERWRITE: &str = "YES";

/// Negative overwrite answer
pub const DECLINE_OVERWRITE: &str = "NO";

/// Prefix carried by success status frames
pub const SUCCESS_PREFIX: &str = "SUCCESS: ";

/// Prefix carried by error status frames
pub const ERROR_PREFIX: &str = "ERROR: ";

/// A client command, carried on the wire as a short string token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Download,
    Upload,
    List,
    Disconnect,
}

impl Command {
    /// The wire token for this command
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "1",
            Self::Upload => "2",
            Self::List => "3",
            Self::Disconnect => "4",
        }
    }

    /// Parse a wire token into a command
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::Download),
            "2" => Some(Self::Upload),
            "3" => Some(Self::List),
            "4" => Some(Self::Disconnect),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a success status frame
#[must_use]
pub fn success_status(detail: &str) -> String {
    format!("{}{}", SUCCESS_PREFIX, detail)
}

/// Format an error status frame
#[must_use]
pub fn error_status(detail: &str) -> String {
    format!("{}{}", ERROR_PREFIX, detail)
}

/// Whether a status frame reports success
#[must_use]
pub fn is_success(status: &str) -> bool {
    status.starts_with(SUCCESS_PREFIX)
}

/// Whether a status frame reports an error
#[must_use]
pub fn is_error(status: &str) -> bool {
    status.starts_with(ERROR_PREFIX)
}
