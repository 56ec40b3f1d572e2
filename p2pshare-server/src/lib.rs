//! p2pshare relay
//!
//! Pairs one uploader with one downloader per session and streams the file
//! between them without storing it.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod pages;
pub mod server;
pub mod sessions;
pub mod transfer_tracker;
pub mod transfers;

pub use error::RelayError;
pub use server::{AppState, ServerConfig, router, serve};
pub use sessions::SessionRegistry;
