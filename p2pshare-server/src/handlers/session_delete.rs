//! `GET|POST /delete`: drop a session and release whoever waits on it

use axum::extract::{Query, State};
use tracing::{debug, info};

use p2pshare_common::DELETE_OK_BODY;

use crate::server::{AppState, SessionQuery};

/// Remove a session if present
///
/// Always answers `OK`: deleting an unknown or already consumed session is
/// not an error, and neither is a missing `id`.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> &'static str {
    match query.id() {
        Some(id) if state.registry.remove(id) => info!(session = id, "session deleted"),
        Some(id) => debug!(session = id, "delete for unknown session"),
        None => debug!("delete without id"),
    }
    DELETE_OK_BODY
}
