//! Request-level errors and their HTTP responses
//!
//! Every failure is local to one session. Downloader-facing not-found is
//! rendered as HTML because a browser opened the link; uploader-facing
//! errors are plain text for scripts and the upload page.

use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::constants::{
    ERR_ID_MISSING, ERR_RECEIVER_PRESENT, ERR_SENDER_NOT_FOUND, ERR_TOO_MANY_TRANSFERS,
    ERR_UPLOADER_ABANDONED, HTML_NOT_FOUND,
};

#[derive(Debug, Error)]
pub enum RelayError {
    /// The `id` query parameter is absent or empty
    #[error("session id missing")]
    MissingId,
    /// Downloader asked for a session that is not pending
    #[error("receiver session not found")]
    ReceiverNotFound,
    /// Uploader posted to a session that is not pending
    #[error("sender session not found")]
    SenderNotFound,
    /// A second downloader tried to wait on the same session
    #[error("session already has a waiting receiver")]
    ReceiverPresent,
    /// The client IP is at its concurrent transfer limit
    #[error("transfer limit reached")]
    TooManyTransfers,
    /// Upload body is not multipart, or has no usable file part
    #[error("malformed upload: {0}")]
    MalformedUpload(String),
    /// Copy between uploader and downloader stopped early
    #[error("transfer failed: {0}")]
    Transfer(String),
    /// Paired uploader went away before sending headers
    #[error("uploader abandoned the transfer")]
    UploaderAbandoned,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingId | Self::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            Self::ReceiverNotFound | Self::SenderNotFound => StatusCode::NOT_FOUND,
            Self::ReceiverPresent => StatusCode::CONFLICT,
            Self::TooManyTransfers => StatusCode::TOO_MANY_REQUESTS,
            Self::Transfer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UploaderAbandoned => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::ReceiverNotFound => (status, Html(HTML_NOT_FOUND)).into_response(),
            Self::MissingId => plain(status, ERR_ID_MISSING.to_string()),
            Self::SenderNotFound => plain(status, ERR_SENDER_NOT_FOUND.to_string()),
            Self::ReceiverPresent => plain(status, ERR_RECEIVER_PRESENT.to_string()),
            Self::TooManyTransfers => plain(status, ERR_TOO_MANY_TRANSFERS.to_string()),
            Self::UploaderAbandoned => plain(status, ERR_UPLOADER_ABANDONED.to_string()),
            Self::MalformedUpload(_) | Self::Transfer(_) => plain(status, self.to_string()),
        }
    }
}

fn plain(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::MissingId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::ReceiverNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(RelayError::SenderNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(RelayError::ReceiverPresent.status(), StatusCode::CONFLICT);
        assert_eq!(
            RelayError::TooManyTransfers.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RelayError::MalformedUpload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::Transfer("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_receiver_not_found_is_html() {
        let response = RelayError::ReceiverNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[test]
    fn test_sender_not_found_is_plain_text() {
        let response = RelayError::SenderNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
