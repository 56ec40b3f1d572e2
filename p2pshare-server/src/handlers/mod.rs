//! Handlers for the session bookkeeping routes
//!
//! The streaming routes (`/recv`, `/upload`) live in `transfers`.

mod download_page;
mod session_create;
mod session_delete;
mod upload_page;

#[cfg(test)]
pub mod testing;

pub use download_page::handle_download_page;
pub use session_create::handle_create_session;
pub use session_delete::handle_delete_session;
pub use upload_page::handle_upload_page;
