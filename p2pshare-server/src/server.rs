//! HTTP surface: shared state, router, and the serve loop

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

use p2pshare_common::{
    ROUTE_CREATE_SESSION, ROUTE_DELETE, ROUTE_DOWNLOAD_PAGE, ROUTE_RECEIVE, ROUTE_UPLOAD,
};

use crate::handlers::{
    handle_create_session, handle_delete_session, handle_download_page, handle_upload_page,
};
use crate::sessions::SessionRegistry;
use crate::transfer_tracker::TransferTracker;
use crate::transfers::{handle_receive, handle_upload};

/// Configuration handed to the relay by the bootstrap layer
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Externally advertised base URL used to build shareable links
    pub public_url: String,
    /// Concurrent receive/upload requests allowed per IP (0 = unlimited)
    pub max_transfers_per_ip: usize,
}

/// State shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub tracker: Arc<TransferTracker>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            tracker: Arc::new(TransferTracker::new(config.max_transfers_per_ip)),
            config: Arc::new(config),
        }
    }
}

/// `?id=` query accepted by every session route
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub id: Option<String>,
}

impl SessionQuery {
    /// The identifier, if present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Build the relay's router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_upload_page))
        .route(ROUTE_CREATE_SESSION, get(handle_create_session))
        .route(ROUTE_DOWNLOAD_PAGE, get(handle_download_page))
        .route(ROUTE_RECEIVE, get(handle_receive))
        .route(ROUTE_UPLOAD, post(handle_upload))
        .route(
            ROUTE_DELETE,
            get(handle_delete_session).post(handle_delete_session),
        )
        // Uploads are unbounded streams
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Serve the relay on `listener` until `shutdown` resolves
///
/// Each connection runs as its own task; handlers see the peer address.
/// Once `shutdown` resolves every pending session is closed, so requests
/// blocked on a rendezvous end and the drain can finish. Transfers already
/// streaming run to completion.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let registry = state.registry.clone();
    let shutdown = async move {
        shutdown.await;
        let closed = registry.close_all();
        info!(closed, "closed pending sessions");
    };

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
