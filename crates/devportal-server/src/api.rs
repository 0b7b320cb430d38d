//! JSON API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use devportal_catalog::{
    Catalog, CatalogEntry, CategoryCount, FilterState, LibrarySession, PageNav, SortOption,
    Status, UnknownStatus,
};
use devportal_content::{ModuleCollection, ModulePage};

use crate::error::ApiError;
use crate::server::AppState;

/// Full library state as the listing renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryView {
    pub items: Vec<CatalogEntry>,
    #[serde(flatten)]
    pub nav: PageNav,
    pub filters: FilterState,
    pub search_input: String,
    pub result_count: usize,
    pub has_active_filters: bool,
    /// Whole-catalog counts, `All Modules` first
    pub counts: Vec<CategoryCount>,
}

impl LibraryView {
    pub fn from_session(session: &LibrarySession) -> Self {
        let page = session.page();
        Self {
            items: page.items.into_iter().cloned().collect(),
            nav: page.nav,
            filters: session.filters().clone(),
            search_input: session.search_input().to_string(),
            result_count: session.result_count(),
            has_active_filters: session.has_active_filters(),
            counts: session.category_counts().items(),
        }
    }
}

/// Query string of `GET /api/library`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryQuery {
    pub q: Option<String>,
    /// Comma-separated category labels
    pub categories: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

impl LibraryQuery {
    /// Run the query against a fresh session.
    pub fn session(&self, catalog: Catalog, items_per_page: usize) -> Result<LibrarySession, ApiError> {
        let mut session = LibrarySession::new(catalog, items_per_page);

        if let Some(q) = &self.q {
            session.set_search_input(q.as_str());
            session.set_query(q.as_str());
        }

        if let Some(categories) = &self.categories {
            let labels: Vec<&str> = categories
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .collect();
            if !labels.is_empty() {
                session.set_categories(labels);
            }
        }

        let status = parse_status(self.status.as_deref())
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        session.set_status(status);

        if let Some(sort) = &self.sort {
            let sort = sort
                .parse::<SortOption>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            session.set_sort(sort);
        }

        if let Some(page) = self.page {
            session.go_to_page(page);
        }

        Ok(session)
    }
}

/// Status filter from user input; empty or `all` means no restriction.
pub fn parse_status(value: Option<&str>) -> Result<Option<Status>, UnknownStatus> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse::<Status>().map(Some),
    }
}

/// `GET /api/library`
pub async fn library_handler(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<LibraryView>, ApiError> {
    let (catalog, items_per_page) = {
        let state = state.read().await;
        (state.catalog.clone(), state.config.items_per_page)
    };

    let session = query.session(catalog, items_per_page)?;
    tracing::debug!(
        "Library query {:?}: {} results",
        session.filters(),
        session.result_count()
    );

    Ok(Json(LibraryView::from_session(&session)))
}

/// `GET /api/categories`
pub async fn categories_handler(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    let state = state.read().await;
    Json(state.catalog.counts().items())
}

/// `GET /api/module/{category}/{slug}`
pub async fn module_handler(
    State(state): State<AppState>,
    Path((category, slug)): Path<(String, String)>,
) -> Result<Json<ModulePage>, ApiError> {
    let store = state.read().await.content.clone();

    let page = {
        let (category, slug) = (category.clone(), slug.clone());
        tokio::task::spawn_blocking(move || store.module_page(&category, &slug))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))??
    };

    page.map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Module {}/{} not found", category, slug)))
}

/// `GET /api/content/{slug}`
pub async fn content_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ModuleCollection>, ApiError> {
    let store = state.read().await.content.clone();

    let collection = {
        let slug = slug.clone();
        tokio::task::spawn_blocking(move || store.module_collection(&slug))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))??
    };

    collection
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Module content {} not found", slug)))
}
