//! HTTP API for the DevPortal library and module content.
//!
//! Serves filtered library pages and compiled module pages as JSON, runs
//! live-search sessions over WebSocket, and hot-reloads the catalog file.

pub mod api;
pub mod error;
pub mod live;
pub mod server;
pub mod watcher;

pub use api::{LibraryQuery, LibraryView};
pub use error::ApiError;
pub use live::{CatalogHub, ClientMessage, LiveSession, ServerMessage};
pub use server::{router, AppState, DevPortalServer, ServerConfig, ServerError, ServerState};
pub use watcher::{CatalogWatcher, WatchEvent};
