//! Documentation library catalog.
//!
//! Holds the read-only list of documentation modules and the pure pipeline
//! over it: search, category and status filtering, sorting, category counts
//! and pagination. [`LibrarySession`] composes them for one user and owns the
//! page-reset policy; [`Debouncer`] delays typed queries before they reach it.

pub mod counts;
pub mod debounce;
pub mod entry;
pub mod filter;
pub mod pagination;
pub mod session;

pub use counts::{CategoryCount, CategoryCounts, DEFAULT_CATEGORIES};
pub use debounce::{CancelHandle, Debouncer, DEFAULT_DEBOUNCE};
pub use entry::{Catalog, CatalogEntry, CatalogError, Status, UnknownStatus};
pub use filter::{
    apply, apply_indices, locale_cmp, CategorySelection, FilterState, SortOption, UnknownSort,
    ALL_MODULES,
};
pub use pagination::{page_numbers, paginate, Page, PageLabel, PageNav, Paginator};
pub use session::{LibraryPage, LibrarySession};
