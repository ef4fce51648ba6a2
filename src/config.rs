use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// BookInfo RPC server
#[derive(Parser, Debug, Clone)]
#[command(name = "bookinfo-server", version, about = "Serve book records over tarpc")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "ADDRESS", default_value = "[::1]:8899")]
    pub address: SocketAddr,

    /// Maximum connections served at once
    #[arg(
        long,
        env = "BOOKINFO_MAX_CONNECTIONS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections: u32,

    /// Maximum concurrent channels from a single peer IP
    #[arg(
        long,
        env = "BOOKINFO_MAX_CHANNELS_PER_IP",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_channels_per_ip: u32,

    /// Largest accepted frame, in bytes
    #[arg(long, env = "BOOKINFO_MAX_FRAME_LENGTH", default_value_t = 16 * 1024 * 1024)]
    pub max_frame_length: usize,

    /// Emit logs as JSON
    #[arg(long, env = "BOOKINFO_JSON_LOGS")]
    pub json_logs: bool,
}

/// Demonstration client for the BookInfo server
#[derive(Parser, Debug, Clone)]
#[command(name = "client", version, about = "Exercise a BookInfo server")]
pub struct ClientArgs {
    /// Server address
    #[arg(long, env = "ADDRESS", default_value = "[::1]:8899")]
    pub address: SocketAddr,

    /// Headerless CSV of books to upload after the walkthrough
    #[arg(long, env = "BOOKINFO_CSV")]
    pub csv: Option<PathBuf>,

    /// Per-request deadline in seconds
    #[arg(long, default_value_t = 1)]
    pub timeout_secs: u64,

    /// Emit logs as JSON
    #[arg(long, env = "BOOKINFO_JSON_LOGS")]
    pub json_logs: bool,
}
