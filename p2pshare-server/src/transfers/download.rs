//! Receive handler: the downloader's side of a session

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use tracing::{debug, info, warn};

use p2pshare_common::SessionId;

use super::helpers::content_disposition;
use crate::error::RelayError;
use crate::server::{AppState, SessionQuery};
use crate::sessions::{TunnelError, envelope};

const CONTENT_TRANSFER_ENCODING: HeaderName = HeaderName::from_static("content-transfer-encoding");

/// Handle `GET /recv?id=…`
///
/// Blocks until an uploader pairs with this request, then streams the upload.
/// If the client disconnects while waiting, axum drops this future and the
/// registry's guard removes the session.
pub async fn handle_receive(
    State(state): State<AppState>,
    ConnectInfo(peer_addr): ConnectInfo<SocketAddr>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, RelayError> {
    let id = query.id().ok_or(RelayError::MissingId)?;
    if SessionId::parse(id).is_err() || !state.registry.contains(id) {
        debug!(session = id, %peer_addr, "receive for unknown session");
        return Err(RelayError::ReceiverNotFound);
    }

    let guard = state
        .tracker
        .try_acquire(peer_addr.ip())
        .ok_or_else(|| {
            warn!(session = id, %peer_addr, "transfer limit reached");
            RelayError::TooManyTransfers
        })?;

    let (peer, receiver) = envelope();
    debug!(session = id, %peer_addr, "receiver waiting for uploader");
    state.registry.deposit(id, peer).await.map_err(|e| match e {
        TunnelError::NotFound => RelayError::ReceiverNotFound,
        TunnelError::ReceiverPresent => RelayError::ReceiverPresent,
    })?;

    let (head, body) = receiver
        .into_delivery()
        .await
        .map_err(|_| RelayError::UploaderAbandoned)?;
    info!(session = id, %peer_addr, filename = %head.filename, "streaming to receiver");

    // The tracker slot stays held until the response body is dropped
    let body = body.map(move |chunk| {
        let _held = &guard;
        chunk
    });

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&head.filename),
            ),
            (CONTENT_TRANSFER_ENCODING, HeaderValue::from_static("binary")),
        ],
        Body::from_stream(body),
    )
        .into_response())
}
