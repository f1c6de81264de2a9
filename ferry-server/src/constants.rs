//! Server message and configuration constants

use std::time::Duration;

/// Default storage root directory, relative to the working directory
pub const DEFAULT_STORAGE_ROOT: &str = "Data";

/// How long shutdown waits for in-flight sessions to drain
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Poll interval while waiting for sessions to drain
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

// Operator-facing messages
pub const MSG_BANNER: &str = "Ferry server v";
pub const MSG_LISTENING: &str = "Listening on ";
pub const MSG_STORAGE_ROOT: &str = "Storage root: ";
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, stopping server...";
pub const MSG_SHUTDOWN_COMPLETE: &str = "Server stopped";
pub const WARN_SHUTDOWN_FORCED: &str = "Grace period expired with sessions still active, exiting";

// Error message prefixes
pub const ERR_ACCEPT: &str = "Failed to accept connection: ";
pub const ERR_SESSION_LIMIT: &str = "Session limit reached for ";
pub const ERR_CREATE_STORAGE_ROOT: &str = "Failed to create storage root ";
pub const ERR_CANONICALIZE_STORAGE_ROOT: &str = "Failed to canonicalize storage root: ";
pub const ERR_BIND: &str = "Failed to bind ";

// Signal handler installation failures (startup only)
pub const ERR_SIGNAL_SIGTERM: &str = "failed to install SIGTERM handler";
pub const ERR_SIGNAL_SIGINT: &str = "failed to install SIGINT handler";
pub const ERR_SIGNAL_CTRLC: &str = "failed to install Ctrl+C handler";

// Status details sent to the peer
pub const ERR_INVALID_FILE_NAME: &str = "Invalid file name";
pub const ERR_INVALID_FILE_PATH: &str = "Invalid file path";
pub const ERR_FILE_NOT_FOUND: &str = "File not found - ";
pub const MSG_UPLOAD_CANCELLED: &str = "Upload cancelled by user";
