//! Session requests and streamed uploads against a relay

use std::io;
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use futures_util::stream;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use p2pshare_common::{
    LinkError, ROUTE_CREATE_SESSION, SEND_CHUNK_SIZE, SessionId, UPLOAD_FIELD_NAME, delete_link,
    session_id_from_link, upload_link,
};

/// Chunks read ahead of the request body
const READ_AHEAD_CHUNKS: usize = 4;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay returned an unusable link: {0}")]
    Link(#[from] LinkError),
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error("relay rejected the upload ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

/// A freshly created session
#[derive(Debug, Clone)]
pub struct SessionLink {
    pub id: SessionId,
    /// Link to hand to the receiver
    pub download_url: String,
}

/// Ask the relay for a new session
pub async fn request_session(client: &Client, server: &str) -> Result<SessionLink, SendError> {
    let url = format!("{}{}", server.trim_end_matches('/'), ROUTE_CREATE_SESSION);
    let response = client.get(url).send().await?.error_for_status()?;
    let download_url = response.text().await?.trim().to_string();
    let id = session_id_from_link(&download_url)?;
    debug!(session = %id, "session created");
    Ok(SessionLink { id, download_url })
}

/// Stream `path` into the session and return the relay's reply
///
/// Resolves only once a receiver has taken the whole file, or the relay
/// gave up. The file is read in `SEND_CHUNK_SIZE` blocks by a separate task
/// while the request consumes them, so memory use does not grow with the
/// file size.
pub async fn send_file(
    client: &Client,
    server: &str,
    id: &SessionId,
    path: &Path,
) -> Result<String, SendError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SendError::NoFileName(path.to_path_buf()))?;

    let open_error = |source| SendError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).await.map_err(open_error)?;
    let length = file.metadata().await.map_err(open_error)?.len();

    let body = reqwest::Body::wrap_stream(read_chunks(file));
    let part = Part::stream_with_length(body, length).file_name(file_name.clone());
    let form = Form::new().part(UPLOAD_FIELD_NAME, part);

    info!(session = %id, file = %file_name, bytes = length, "waiting for receiver");
    let response = client
        .post(upload_link(server, id))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SendError::Rejected { status, body });
    }
    info!(session = %id, "upload finished");
    Ok(body)
}

/// Discard a session, releasing a receiver that may be waiting on it
pub async fn cancel_session(client: &Client, server: &str, id: &SessionId) -> Result<(), SendError> {
    client
        .get(delete_link(server, id))
        .send()
        .await?
        .error_for_status()?;
    debug!(session = %id, "session cancelled");
    Ok(())
}

/// Read `file` on its own task and yield its contents chunk by chunk
fn read_chunks(
    mut file: File,
) -> impl futures_util::Stream<Item = io::Result<Bytes>> + Send + 'static {
    let (tx, rx) = mpsc::channel(READ_AHEAD_CHUNKS);

    tokio::spawn(async move {
        loop {
            let mut chunk = BytesMut::with_capacity(SEND_CHUNK_SIZE);
            match file.read_buf(&mut chunk).await {
                Ok(0) => break,
                Ok(_) => {
                    // Request was dropped
                    if tx.send(Ok(chunk.freeze())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
    });

    stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
}
