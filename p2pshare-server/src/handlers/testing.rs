//! Shared helpers for handler tests

use axum::body::to_bytes;
use axum::response::Response;

use crate::server::{AppState, ServerConfig, SessionQuery};

pub const TEST_PUBLIC_URL: &str = "http://relay.test";

pub fn test_state() -> AppState {
    AppState::new(ServerConfig {
        public_url: TEST_PUBLIC_URL.to_string(),
        max_transfers_per_ip: 0,
    })
}

pub fn query(id: Option<&str>) -> SessionQuery {
    SessionQuery {
        id: id.map(str::to_string),
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
