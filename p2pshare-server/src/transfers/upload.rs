//! Upload handler: the uploader's side of a session

use std::net::SocketAddr;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{ConnectInfo, Multipart, Query, State};
use tracing::{debug, info, warn};

use p2pshare_common::{SessionId, UPLOAD_SUCCESS_BODY};

use super::helpers::{CopyError, base_filename, copy_to_sink};
use crate::constants::{ERR_NO_FILE_PART, ERR_NO_FILENAME};
use crate::error::RelayError;
use crate::server::{AppState, SessionQuery};
use crate::sessions::{DeliveryHead, Peer, TransferOutcome};

/// Handle `POST /upload?id=…`
///
/// Blocks until a downloader is waiting on the session, then relays the file
/// part straight into the downloader's response. The response to the
/// uploader is sent only after the copy finished or failed.
pub async fn handle_upload(
    State(state): State<AppState>,
    ConnectInfo(peer_addr): ConnectInfo<SocketAddr>,
    Query(query): Query<SessionQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, RelayError> {
    let id = query.id().ok_or(RelayError::MissingId)?;
    if SessionId::parse(id).is_err() || !state.registry.contains(id) {
        debug!(session = id, %peer_addr, "upload for unknown session");
        return Err(RelayError::SenderNotFound);
    }

    let _guard = state
        .tracker
        .try_acquire(peer_addr.ip())
        .ok_or_else(|| {
            warn!(session = id, %peer_addr, "transfer limit reached");
            RelayError::TooManyTransfers
        })?;

    let mut multipart = multipart.map_err(|e| RelayError::MalformedUpload(e.body_text()))?;
    let field = first_part(&mut multipart).await?;
    let filename = field
        .file_name()
        .map(base_filename)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RelayError::MalformedUpload(ERR_NO_FILENAME.to_string()))?;

    debug!(session = id, %peer_addr, filename = %filename, "uploader waiting for receiver");
    let Peer { mut sink, done } = state
        .registry
        .claim(id)
        .await
        .map_err(|_| RelayError::SenderNotFound)?;
    info!(session = id, %peer_addr, filename = %filename, "uploader paired with receiver");

    let result = match sink.send_head(DeliveryHead {
        filename: filename.clone(),
    }) {
        Ok(()) => copy_to_sink(field, &mut sink).await,
        Err(closed) => Err(CopyError::from(closed)),
    };

    // Close the body before signalling, so the receiver sees every byte first
    drop(sink);

    match result {
        Ok(bytes) => {
            done.fire(TransferOutcome::Completed);
            info!(session = id, filename = %filename, bytes, "transfer complete");
            Ok(UPLOAD_SUCCESS_BODY)
        }
        Err(e) => {
            let reason = e.to_string();
            done.fire(TransferOutcome::Failed(reason.clone()));
            warn!(session = id, filename = %filename, error = %reason, "transfer failed");
            Err(RelayError::Transfer(reason))
        }
    }
}

/// The first part of the body carries the file
async fn first_part(multipart: &mut Multipart) -> Result<Field<'_>, RelayError> {
    multipart
        .next_field()
        .await
        .map_err(|e| RelayError::MalformedUpload(e.body_text()))?
        .ok_or_else(|| RelayError::MalformedUpload(ERR_NO_FILE_PART.to_string()))
}
