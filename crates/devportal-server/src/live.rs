//! Live library search over WebSocket.
//!
//! Each connection owns a [`LiveSession`]. Search text is echoed back at once
//! and reaches the filter engine only after the debounce quiet period; every
//! other intent recomputes immediately. Catalog reloads arrive through the
//! [`CatalogHub`] and are swapped in without a page reset.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use devportal_catalog::{Catalog, Debouncer, LibrarySession, SortOption};

use crate::api::{parse_status, LibraryView};
use crate::server::AppState;

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Raw search box text
    Search { text: String },

    ToggleCategory { label: String },

    /// `null`, empty or `all` clears the status filter
    SetStatus {
        #[serde(default)]
        status: Option<String>,
    },

    SetSort { sort: String },

    GoToPage { page: usize },

    NextPage,

    PreviousPage,

    ClearFilters,
}

/// Messages sent to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected,

    /// Echo of the raw search text
    Input { text: String },

    /// Full library state after a recompute
    Results(LibraryView),

    Error { message: String },
}

/// Hub broadcasting reloaded catalogs to every live session.
#[derive(Debug, Clone)]
pub struct CatalogHub {
    sender: broadcast::Sender<Catalog>,
}

impl CatalogHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn send(&self, catalog: Catalog) {
        // No live sessions is fine
        let _ = self.sender.send(catalog);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Catalog> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CatalogHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Library state of one live connection.
pub struct LiveSession {
    session: LibrarySession,
    debouncer: Debouncer<String>,
}

impl LiveSession {
    /// Debounced queries come out of the returned receiver and go back in
    /// through [`LiveSession::apply_query`].
    pub fn new(
        catalog: Catalog,
        items_per_page: usize,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (debouncer, queries) = Debouncer::new(debounce);
        let session = LibrarySession::new(catalog, items_per_page);
        (Self { session, debouncer }, queries)
    }

    pub fn session(&self) -> &LibrarySession {
        &self.session
    }

    pub fn results(&self) -> ServerMessage {
        ServerMessage::Results(LibraryView::from_session(&self.session))
    }

    /// Apply one client intent and return the replies.
    pub fn handle(&mut self, message: ClientMessage) -> Vec<ServerMessage> {
        match message {
            ClientMessage::Search { text } => {
                self.session.set_search_input(text.as_str());
                self.debouncer.schedule(text.clone());
                vec![ServerMessage::Input { text }]
            }

            ClientMessage::ToggleCategory { label } => {
                self.session.toggle_category(&label);
                vec![self.results()]
            }

            ClientMessage::SetStatus { status } => match parse_status(status.as_deref()) {
                Ok(status) => {
                    self.session.set_status(status);
                    vec![self.results()]
                }
                Err(e) => vec![error(e)],
            },

            ClientMessage::SetSort { sort } => match sort.parse::<SortOption>() {
                Ok(sort) => {
                    self.session.set_sort(sort);
                    vec![self.results()]
                }
                Err(e) => vec![error(e)],
            },

            ClientMessage::GoToPage { page } => {
                self.session.go_to_page(page);
                vec![self.results()]
            }

            ClientMessage::NextPage => {
                self.session.go_to_next();
                vec![self.results()]
            }

            ClientMessage::PreviousPage => {
                self.session.go_to_previous();
                vec![self.results()]
            }

            ClientMessage::ClearFilters => {
                self.debouncer.cancel();
                self.session.clear_filters();
                vec![
                    ServerMessage::Input {
                        text: String::new(),
                    },
                    self.results(),
                ]
            }
        }
    }

    /// Feed a debounced query to the engine.
    ///
    /// A query that no longer matches the search box (cleared in the meantime)
    /// is dropped.
    pub fn apply_query(&mut self, query: String) -> Option<ServerMessage> {
        if query != self.session.search_input() {
            tracing::debug!("Dropping stale query {:?}", query);
            return None;
        }
        self.session.set_query(query);
        Some(self.results())
    }

    /// Swap in a reloaded catalog under the current filters.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> ServerMessage {
        self.session.replace_catalog(catalog);
        self.results()
    }
}

fn error(err: impl std::fmt::Display) -> ServerMessage {
    ServerMessage::Error {
        message: err.to_string(),
    }
}

/// Drive one WebSocket connection until the client leaves.
pub async fn handle_live(mut socket: WebSocket, state: AppState) {
    let (catalog, items_per_page, debounce, mut reloads) = {
        let state = state.read().await;
        (
            state.catalog.clone(),
            state.config.items_per_page,
            state.config.search_debounce,
            state.hub.subscribe(),
        )
    };

    let (mut live, mut queries) = LiveSession::new(catalog, items_per_page, debounce);
    tracing::debug!("Live session opened");

    if !send(&mut socket, &ServerMessage::Connected).await
        || !send(&mut socket, &live.results()).await
    {
        return;
    }

    loop {
        let replies = tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => live.handle(message),
                        Err(e) => vec![error(format!("Invalid message: {}", e))],
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => continue,
            },

            Some(query) = queries.recv() => live.apply_query(query).into_iter().collect::<Vec<_>>(),

            reload = reloads.recv() => match reload {
                Ok(catalog) => vec![live.replace_catalog(catalog)],
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Live session missed {} catalog reloads", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        };

        for reply in &replies {
            if !send(&mut socket, reply).await {
                return;
            }
        }
    }

    tracing::debug!("Live session closed");
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode live message: {}", e);
            return false;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}
