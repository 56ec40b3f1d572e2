//! p2pshare sender
//!
//! Obtains a session from a relay and streams a local file into it.

pub mod logging;
mod sender;

pub use sender::{SendError, SessionLink, cancel_session, request_session, send_file};
