//! `GET /download`: landing page for receivers

use axum::extract::{Query, State};
use axum::response::Html;

use p2pshare_common::{SessionId, receive_link};

use crate::error::RelayError;
use crate::pages::download_page;
use crate::server::{AppState, SessionQuery};

/// Render the download page for a pending session
///
/// Viewing the page does not claim the session; only `/recv` does.
pub async fn handle_download_page(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Html<String>, RelayError> {
    let id = query
        .id()
        .and_then(|raw| SessionId::parse(raw).ok())
        .filter(|id| state.registry.contains(id.as_str()))
        .ok_or(RelayError::ReceiverNotFound)?;

    let link = receive_link(&state.config.public_url, &id);
    Ok(Html(download_page(&link)))
}
