//! Command-line argument parsing

use std::net::IpAddr;

use clap::Parser;
use p2pshare_common::DEFAULT_PORT;
use p2pshare_server::logging::LogFormat;

/// p2pshare relay server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to bind to (IPv4 or IPv6)
    #[arg(short, long, env = "P2PSHARE_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "P2PSHARE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Public base URL used in shared links (e.g. https://share.example.com)
    #[arg(long, env = "P2PSHARE_HOST")]
    pub host: Option<String>,

    /// Max concurrent transfers per IP address (0 = unlimited)
    #[arg(long, env = "P2PSHARE_MAX_TRANSFERS_PER_IP", default_value_t = 0)]
    pub max_transfers_per_ip: usize,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    /// Base URL for links; falls back to localhost on the listening port
    pub fn public_url(&self) -> String {
        match &self.host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}
