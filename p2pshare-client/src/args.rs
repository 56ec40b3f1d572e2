//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;
use p2pshare_common::DEFAULT_PUBLIC_URL;

/// Send a file through a p2pshare relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File to send
    pub file: PathBuf,

    /// Relay base URL
    #[arg(short, long, env = "P2PSHARE_SERVER", default_value = DEFAULT_PUBLIC_URL)]
    pub server: String,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
