//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;
use ferry_common::DEFAULT_PORT;

use crate::constants::DEFAULT_DOWNLOAD_DIR;

/// Ferry file transfer client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server host name or IP address
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory for downloaded files (created if missing)
    #[arg(short, long, default_value = DEFAULT_DOWNLOAD_DIR)]
    pub downloads: PathBuf,

    /// Enable debug logging (shows wire-level activity)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
