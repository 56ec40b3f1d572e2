//! p2pshare sender

mod args;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use args::Args;
use p2pshare_client::logging::init_logging;
use p2pshare_client::{cancel_session, request_session, send_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug).context("Failed to initialize logging")?;

    let client = reqwest::Client::new();
    let session = request_session(&client, &args.server)
        .await
        .with_context(|| format!("Failed to create a session on {}", args.server))?;

    println!("{}", session.download_url);

    tokio::select! {
        reply = send_file(&client, &args.server, &session.id, &args.file) => {
            let reply = reply.with_context(|| format!("Failed to send {}", args.file.display()))?;
            println!("{reply}");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!(session = %session.id, "interrupted, cancelling session");
            cancel_session(&client, &args.server, &session.id)
                .await
                .context("Failed to cancel the session")?;
        }
    }

    Ok(())
}
