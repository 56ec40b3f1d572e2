//! Server-wide message strings

/// Startup banner (followed by the version)
pub const MSG_BANNER: &str = "p2pshare relay v";

/// Logged once the listener is bound
pub const MSG_LISTENING: &str = "Listening on ";

/// Logged when a shutdown signal arrives
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, draining connections";

/// Logged when no public URL is configured
pub const WARN_PUBLIC_URL_DEFAULT: &str =
    "P2PSHARE_HOST not set; advertising links on localhost";

/// Body for downloader-facing not-found responses
pub const HTML_NOT_FOUND: &str =
    "<h1>File expired or not found. Ask for a new download link</h1>";

/// Body for uploader-facing not-found responses
pub const ERR_SENDER_NOT_FOUND: &str = "sender not found";

/// Body when the `id` query parameter is absent
pub const ERR_ID_MISSING: &str = "sender id missing in the query params";

pub const ERR_RECEIVER_PRESENT: &str = "a receiver is already waiting on this link";
pub const ERR_TOO_MANY_TRANSFERS: &str = "too many concurrent transfers from this address";
pub const ERR_NO_FILE_PART: &str = "upload has no file part";
pub const ERR_NO_FILENAME: &str = "file part has no filename";
pub const ERR_UPLOADER_ABANDONED: &str = "uploader abandoned the transfer";

pub const ERR_BIND: &str = "Failed to bind ";
pub const ERR_LOGGING_INIT: &str = "Failed to initialize logging";
pub const ERR_SERVE: &str = "Server terminated with an error";
pub const ERR_SIGNAL_SIGTERM: &str = "Failed to install SIGTERM handler";
pub const ERR_SIGNAL_SIGINT: &str = "Failed to install SIGINT handler";
pub const ERR_SIGNAL_CTRLC: &str = "Failed to install Ctrl-C handler";
