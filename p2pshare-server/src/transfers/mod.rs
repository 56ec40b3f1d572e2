//! Transfer handlers for the rendezvous routes
//!
//! **Receive flow (`/recv`):**
//! 1. Resolve the session; unknown ids fail immediately with 404
//! 2. Deposit a peer envelope wrapping this response and wait for an uploader
//! 3. Wait for the uploader's headers, then stream its bytes as they arrive
//!
//! **Upload flow (`/upload`):**
//! 1. Resolve the session; unknown ids fail immediately with 404
//! 2. Read the multipart headers of the file part and check its filename
//! 3. Claim the downloader's envelope, waiting for a downloader if needed
//! 4. Set attachment headers, copy the body through a bounded buffer
//! 5. Fire the completion signal and report the outcome to the uploader

mod download;
mod helpers;
mod upload;

pub use download::handle_receive;
pub use helpers::{CopyError, base_filename, content_disposition, copy_to_sink};
pub use upload::handle_upload;
