//! Assembled pages, as served to clients.

use serde::Serialize;

use devportal_mdx::{CodeBlock, Frontmatter, TocEntry};

/// Sidebar entry linking to a page or a section anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub label: String,
    pub href: String,
    pub order: i32,
    pub is_active: bool,
}

/// Titled group of sidebar entries, one per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarGroup {
    pub title: String,
    pub items: Vec<SidebarItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Link to the neighbouring page in sidebar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub is_active: bool,
}

impl Breadcrumb {
    pub(crate) fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
            is_active: false,
        }
    }

    pub(crate) fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
            is_active: true,
        }
    }
}

/// A single module page at `/module/{category}/{slug}`.
#[derive(Debug, Clone, Serialize)]
pub struct ModulePage {
    pub category: String,
    pub slug: String,
    /// Frontmatter title, or the slug when the page has none
    pub title: String,
    pub frontmatter: Frontmatter,
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub code_blocks: Vec<CodeBlock>,
    pub sidebar: SidebarGroup,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// One page of a collection, rendered inline.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSection {
    /// File stem, also the section's anchor
    pub slug: String,
    pub title: String,
    pub frontmatter: Frontmatter,
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub code_blocks: Vec<CodeBlock>,
    /// Every section but the first renders its title as a heading
    pub show_heading: bool,
}

/// Every page of a content folder on one page at `/content/module/{slug}`.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleCollection {
    pub slug: String,
    pub folder: String,
    pub title: String,
    pub sidebar: SidebarGroup,
    pub sections: Vec<CollectionSection>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Route parameters of one module page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PageParams {
    pub category: String,
    pub slug: String,
}
