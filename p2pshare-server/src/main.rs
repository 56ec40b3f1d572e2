//! p2pshare relay server

mod args;

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use args::Args;
use p2pshare_server::constants::*;
use p2pshare_server::logging::init_logging;
use p2pshare_server::{AppState, ServerConfig, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.debug, args.log_format).context(ERR_LOGGING_INIT)?;
    info!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    if args.host.is_none() {
        warn!("{}", WARN_PUBLIC_URL_DEFAULT);
    }

    let config = ServerConfig {
        public_url: args.public_url(),
        max_transfers_per_ip: args.max_transfers_per_ip,
    };

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{ERR_BIND}{addr}"))?;
    info!(public_url = %config.public_url, "{}{}", MSG_LISTENING, addr);

    serve(listener, AppState::new(config), setup_shutdown_signal())
        .await
        .context(ERR_SERVE)?;

    Ok(())
}

/// Resolve on SIGTERM/SIGINT (Ctrl-C elsewhere)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect(ERR_SIGNAL_SIGTERM);
        let mut sigint = signal(SignalKind::interrupt()).expect(ERR_SIGNAL_SIGINT);

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect(ERR_SIGNAL_CTRLC);
    }

    info!("{}", MSG_SHUTDOWN_RECEIVED);
}
