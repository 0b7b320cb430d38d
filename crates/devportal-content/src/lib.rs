//! Content store for DevPortal module pages.
//!
//! Reads `.mdx` pages from a content root laid out as one folder per category
//! and assembles them into single pages (with sidebar, previous/next links and
//! breadcrumbs) or into whole-folder collections.

pub mod page;
pub mod store;

pub use page::{
    Breadcrumb, CollectionSection, Direction, ModuleCollection, ModulePage, NavLink, PageParams,
    SidebarGroup, SidebarItem,
};
pub use store::{capitalize, ContentConfig, ContentError, ContentStore, DEFAULT_SKIP};
