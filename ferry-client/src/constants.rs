//! Client message constants

/// Default directory for downloaded files, relative to the working directory
pub const DEFAULT_DOWNLOAD_DIR: &str = "Client";

pub const MSG_CONNECTED: &str = "Connected to ";
pub const MSG_GOODBYE: &str = "Disconnected. Goodbye!";
pub const MSG_DOWNLOAD_CANCELLED: &str = "Download cancelled.";
pub const MSG_UPLOAD_DECLINED: &str = "Keeping the server's copy.";

pub const PROMPT_MENU: &str = "\n1. Download file\n2. Upload file\n3. List files\n4. Exit\nChoose an option: ";
pub const PROMPT_REMOTE_NAME: &str = "File to download: ";
pub const PROMPT_LOCAL_PATH: &str = "File to upload: ";
pub const PROMPT_OVERWRITE_LOCAL: &str = "already exists locally. Overwrite? (y/n): ";
pub const PROMPT_OVERWRITE_REMOTE: &str = "already exists on the server. Overwrite? (y/n): ";

pub const ERR_CONNECT: &str = "Failed to connect to ";
pub const ERR_CREATE_DOWNLOAD_DIR: &str = "Failed to create download directory ";
pub const ERR_LOCAL_FILE: &str = "Cannot read local file ";
pub const ERR_SERVER_CLOSED: &str = "Server closed the connection";
