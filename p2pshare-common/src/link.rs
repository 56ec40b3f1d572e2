//! Shareable link construction and parsing
//!
//! Every session route carries the identifier in the `id` query parameter.
//! Base URLs are accepted with or without a trailing slash.

use thiserror::Error;
use url::Url;

use crate::session_id::{SessionId, SessionIdError};
use crate::{QUERY_PARAM_ID, ROUTE_DELETE, ROUTE_DOWNLOAD_PAGE, ROUTE_RECEIVE, ROUTE_UPLOAD};

/// Error extracting a session identifier from a link
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("link has no `id` query parameter")]
    MissingId,
    #[error("link carries a malformed session id: {0}")]
    InvalidId(#[from] SessionIdError),
}

fn session_link(base: &str, route: &str, id: &SessionId) -> String {
    format!(
        "{}{route}?{QUERY_PARAM_ID}={id}",
        base.trim_end_matches('/')
    )
}

/// Link to the HTML download page for a session
pub fn download_page_link(base: &str, id: &SessionId) -> String {
    session_link(base, ROUTE_DOWNLOAD_PAGE, id)
}

/// Link the downloader fetches to receive the streamed file
pub fn receive_link(base: &str, id: &SessionId) -> String {
    session_link(base, ROUTE_RECEIVE, id)
}

/// Link the uploader posts its multipart body to
pub fn upload_link(base: &str, id: &SessionId) -> String {
    session_link(base, ROUTE_UPLOAD, id)
}

/// Link that discards a pending session
pub fn delete_link(base: &str, id: &SessionId) -> String {
    session_link(base, ROUTE_DELETE, id)
}

/// Extract and validate the session identifier from any session link
///
/// # Errors
///
/// Returns `LinkError` if the link is not a URL, has no `id` parameter, or
/// the parameter is not a well-formed session identifier.
pub fn session_id_from_link(link: &str) -> Result<SessionId, LinkError> {
    let url = Url::parse(link.trim())?;
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == QUERY_PARAM_ID)
        .map(|(_, value)| value.into_owned())
        .ok_or(LinkError::MissingId)?;
    Ok(SessionId::parse(&raw)?)
}
