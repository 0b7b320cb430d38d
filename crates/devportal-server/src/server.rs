//! API server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use devportal_catalog::{Catalog, CatalogError, DEFAULT_CATEGORIES, DEFAULT_DEBOUNCE};
use devportal_content::{ContentConfig, ContentStore};

use crate::api::{categories_handler, content_handler, library_handler, module_handler};
use crate::live::{handle_live, CatalogHub};
use crate::watcher::{CatalogWatcher, WatchEvent};

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Catalog data file
    pub catalog: PathBuf,

    /// Known category labels, in sidebar order
    pub categories: Vec<String>,

    pub items_per_page: usize,

    /// Quiet period before live search text is applied
    pub search_debounce: Duration,

    pub content: ContentConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Reload the catalog when its file changes
    pub watch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("catalog.toml"),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            items_per_page: 6,
            search_debounce: DEFAULT_DEBOUNCE,
            content: ContentConfig::default(),
            port: 4000,
            host: "127.0.0.1".to_string(),
            watch: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Server error: {0}")]
    Serve(String),
}

/// Shared server state.
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog: Catalog,
    pub content: ContentStore,
    pub hub: CatalogHub,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        let content = ContentStore::new(config.content.clone());
        Self {
            config,
            catalog,
            content,
            hub: CatalogHub::new(),
        }
    }
}

pub type AppState = Arc<RwLock<ServerState>>;

/// Routes of the JSON API.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/library", get(library_handler))
        .route("/api/library/live", get(live_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/module/{category}/{slug}", get(module_handler))
        .route("/api/content/{slug}", get(content_handler))
        .with_state(state)
        .layer(cors)
}

/// DevPortal API server.
pub struct DevPortalServer {
    config: ServerConfig,
}

impl DevPortalServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Load the catalog and serve until interrupted.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let catalog = Catalog::load(&self.config.catalog, self.config.categories.as_slice())?;
        tracing::info!(
            "Loaded {} modules from {}",
            catalog.len(),
            self.config.catalog.display()
        );

        let state = Arc::new(RwLock::new(ServerState::new(self.config.clone(), catalog)));

        if self.config.watch {
            let (watcher, mut rx) = CatalogWatcher::new(&self.config.catalog)
                .map_err(|e| ServerError::WatchError(e.to_string()))?;

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event).await;
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(state);

        tracing::info!("Serving API at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Handle catalog watch events.
pub(crate) async fn handle_watch_event(state: &AppState, event: WatchEvent) {
    match event {
        WatchEvent::CatalogChanged(path) => {
            let categories = state.read().await.config.categories.clone();

            match Catalog::load(&path, categories.as_slice()) {
                Ok(catalog) => {
                    tracing::info!("Catalog reloaded: {} modules", catalog.len());
                    let mut state = state.write().await;
                    state.catalog = catalog.clone();
                    state.hub.send(catalog);
                }
                Err(e) => {
                    tracing::warn!("Keeping previous catalog: {}", e);
                }
            }
        }

        WatchEvent::CatalogRemoved(path) => {
            tracing::warn!(
                "Catalog {} removed, keeping previous catalog",
                path.display()
            );
        }
    }
}

/// Handler for the live search WebSocket endpoint.
async fn live_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_live(socket, state))
}
