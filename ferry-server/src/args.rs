//! Command-line argument parsing

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use ferry_common::{DEFAULT_BACKLOG, DEFAULT_PORT};

use ferry_server::constants::DEFAULT_STORAGE_ROOT;

/// Ferry file server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to bind to (IPv4 or IPv6)
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Storage root directory (created if missing)
    #[arg(short, long, default_value = DEFAULT_STORAGE_ROOT)]
    pub root: PathBuf,

    /// Listen backlog for pending connections
    #[arg(long, default_value_t = DEFAULT_BACKLOG, value_parser = clap::value_parser!(i32).range(1..))]
    pub backlog: i32,

    /// Maximum concurrent sessions per client IP (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_sessions_per_ip: usize,

    /// Enable debug logging (shows per-session activity)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
