//! `GET /id`: allocate a session and return its shareable link

use axum::extract::State;
use tracing::info;

use p2pshare_common::download_page_link;

use crate::server::AppState;

/// Create a pending session
///
/// The body is the download-page link followed by a newline, so shell
/// users can `curl` it directly.
pub async fn handle_create_session(State(state): State<AppState>) -> String {
    let id = state.registry.create_session();
    let link = download_page_link(&state.config.public_url, &id);
    info!(session = %id, active = state.registry.active_count(), "session created");
    format!("{link}\n")
}
