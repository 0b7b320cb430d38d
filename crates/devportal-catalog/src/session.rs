//! Library session: filter state, pagination and the reset policy that ties them.
//!
//! Every filter mutation recomputes the filtered result and moves back to page 1
//! inside the same call, so callers never observe a new result set paired with a
//! stale page index. Swapping the catalog recomputes the result but keeps the
//! page (clamped into range).

use serde::Serialize;

use crate::counts::CategoryCounts;
use crate::entry::{Catalog, CatalogEntry, Status};
use crate::filter::{apply_indices, CategorySelection, FilterState, SortOption};
use crate::pagination::{PageNav, Paginator};

/// One page of library results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryPage<'a> {
    pub items: Vec<&'a CatalogEntry>,
    #[serde(flatten)]
    pub nav: PageNav,
}

/// Filter, sort and pagination state for one user of the library.
#[derive(Debug, Clone)]
pub struct LibrarySession {
    catalog: Catalog,
    filters: FilterState,
    /// Raw search box text, echoed immediately and fed to `filters.query` later
    search_input: String,
    paginator: Paginator,
    /// Filtered and sorted positions into `catalog.entries()`
    results: Vec<usize>,
}

impl LibrarySession {
    pub fn new(catalog: Catalog, items_per_page: usize) -> Self {
        let filters = FilterState::default();
        let results = apply_indices(catalog.entries(), &filters);
        Self {
            catalog,
            filters,
            search_input: String::new(),
            paginator: Paginator::new(items_per_page),
            results,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn items_per_page(&self) -> usize {
        self.paginator.items_per_page()
    }

    /// Update the raw search text without filtering.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    /// Set the query the engine filters on (the debounced search text).
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.filters.query != query {
            self.filters.query = query;
            self.refresh();
        }
    }

    pub fn toggle_category(&mut self, label: &str) {
        self.filters.categories.toggle(label);
        self.refresh();
    }

    /// Replace the category selection, applying toggle semantics per label.
    pub fn set_categories<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = CategorySelection::from_labels(labels);
        if self.filters.categories != selection {
            self.filters.categories = selection;
            self.refresh();
        }
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        if self.filters.status != status {
            self.filters.status = status;
            self.refresh();
        }
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        if self.filters.sort != sort {
            self.filters.sort = sort;
            self.refresh();
        }
    }

    /// Back to an empty query, all categories, any status, newest first.
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.filters = FilterState::default();
        self.refresh();
    }

    /// Whether anything narrows the listing. Sort order alone does not count.
    pub fn has_active_filters(&self) -> bool {
        !self.search_input.is_empty()
            || !self.filters.categories.is_all()
            || self.filters.status.is_some()
    }

    /// Filtered and sorted entries, before pagination.
    pub fn filtered_results(&self) -> Vec<&CatalogEntry> {
        let entries = self.catalog.entries();
        self.results.iter().map(|&i| &entries[i]).collect()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    /// Whole-catalog counts, unaffected by filters.
    pub fn category_counts(&self) -> &CategoryCounts {
        self.catalog.counts()
    }

    /// The current page of results with navigation state.
    pub fn page(&self) -> LibraryPage<'_> {
        let entries = self.catalog.entries();
        let page = self.paginator.page(&self.results);
        LibraryPage {
            items: page.items.iter().map(|&i| &entries[i]).collect(),
            nav: page.nav,
        }
    }

    pub fn total_pages(&self) -> usize {
        crate::pagination::total_pages(self.results.len(), self.paginator.items_per_page())
    }

    /// Jump to a page; out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        self.paginator.go_to_page(page, total)
    }

    pub fn go_to_next(&mut self) -> bool {
        let total = self.total_pages();
        self.paginator.go_to_next(total)
    }

    pub fn go_to_previous(&mut self) -> bool {
        self.paginator.go_to_previous()
    }

    /// Swap in a new catalog under the same filters. The page is clamped, not reset.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.results = apply_indices(self.catalog.entries(), &self.filters);
        let total = self.total_pages();
        self.paginator.clamp(total);
        tracing::debug!(
            "Catalog replaced: {} entries, {} results",
            self.catalog.len(),
            self.results.len()
        );
    }

    fn refresh(&mut self) {
        self.results = apply_indices(self.catalog.entries(), &self.filters);
        self.paginator.reset();
    }
}
