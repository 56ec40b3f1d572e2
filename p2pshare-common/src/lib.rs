//! p2pshare Common Library
//!
//! Shared constants, session identifiers, and link helpers for the p2pshare
//! relay and its command-line sender.

pub mod link;
pub mod session_id;

pub use link::{
    LinkError, delete_link, download_page_link, receive_link, session_id_from_link, upload_link,
};
pub use session_id::{SESSION_ID_HEX_LENGTH, SessionId, SessionIdError};

/// Default port the relay listens on
pub const DEFAULT_PORT: u16 = 9000;

/// Default externally advertised base URL when none is configured
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:9000";

/// Route that creates a new session and returns its download-page link
pub const ROUTE_CREATE_SESSION: &str = "/id";

/// Route serving the HTML page that points the downloader at [`ROUTE_RECEIVE`]
pub const ROUTE_DOWNLOAD_PAGE: &str = "/download";

/// Route the downloader connects to in order to receive the streamed file
pub const ROUTE_RECEIVE: &str = "/recv";

/// Route the uploader posts its multipart body to
pub const ROUTE_UPLOAD: &str = "/upload";

/// Route that discards a pending session
pub const ROUTE_DELETE: &str = "/delete";

/// Query parameter carrying the session identifier on every session route
pub const QUERY_PARAM_ID: &str = "id";

/// Multipart field name used by the upload page and the sender client
pub const UPLOAD_FIELD_NAME: &str = "senderfile";

/// Body returned to the uploader after every byte reached the downloader
pub const UPLOAD_SUCCESS_BODY: &str = "success";

/// Body returned by the delete route
pub const DELETE_OK_BODY: &str = "OK";

/// Largest slice of upload data moved through the relay in one step (32KB)
pub const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// Block size the sender reads from disk per chunk (64KB)
pub const SEND_CHUNK_SIZE: usize = 64 * 1024;
