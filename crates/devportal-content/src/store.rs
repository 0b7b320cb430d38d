//! Content store over the module content tree.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use walkdir::WalkDir;

use devportal_mdx::{parse_mdx, Frontmatter, ParsedDoc};

use crate::page::{
    Breadcrumb, CollectionSection, Direction, ModuleCollection, ModulePage, NavLink, PageParams,
    SidebarGroup, SidebarItem,
};

/// Pages left out of every folder listing.
pub const DEFAULT_SKIP: [&str; 3] = ["la27.mdx", "la35.mdx", "a8.mdx"];

/// Where content lives and how folders are exposed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root, one folder per category
    pub dir: PathBuf,

    /// File names excluded from listings
    pub skip: Vec<String>,

    /// Collection slug to folder name
    pub collections: BTreeMap<String, String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content/module"),
            skip: DEFAULT_SKIP.iter().map(|s| s.to_string()).collect(),
            collections: BTreeMap::from([("laravel".to_string(), "laravel".to_string())]),
        }
    }
}

/// Errors that can occur while reading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to parse MDX: {path}: {message}")]
    Parse { path: String, message: String },
}

/// A page read from disk.
struct LoadedPage {
    slug: String,
    doc: ParsedDoc,
}

impl LoadedPage {
    fn frontmatter(&self) -> Frontmatter {
        self.doc.frontmatter.clone().unwrap_or_default()
    }

    fn title(&self) -> String {
        self.doc
            .frontmatter
            .as_ref()
            .map(|fm| fm.title_or(&self.slug).to_string())
            .unwrap_or_else(|| self.slug.clone())
    }

    fn order(&self) -> i32 {
        self.doc
            .frontmatter
            .as_ref()
            .map(Frontmatter::sort_order)
            .unwrap_or(0)
    }
}

/// Reads module pages and collections from a content root.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    config: ContentConfig,
}

impl ContentStore {
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    pub fn root(&self) -> &Path {
        &self.config.dir
    }

    /// A single page with its category sidebar and neighbours.
    ///
    /// Returns `Ok(None)` when the page does not exist or does not parse.
    pub fn module_page(
        &self,
        category: &str,
        slug: &str,
    ) -> Result<Option<ModulePage>, ContentError> {
        if !is_segment(category) || !is_segment(slug) {
            tracing::debug!("Rejected page path {}/{}", category, slug);
            return Ok(None);
        }

        let path = self.root().join(category).join(format!("{}.mdx", slug));
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ContentError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        let page = match parse_page(&path, slug, &source) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping page: {}", e);
                return Ok(None);
            }
        };

        let href = page_href(category, slug);
        let mut sidebar = self.sidebar(category)?;
        for item in &mut sidebar.items {
            item.is_active = item.href == href;
        }

        let position = sidebar.items.iter().position(|item| item.is_active);
        let previous = position
            .and_then(|i| i.checked_sub(1))
            .map(|i| nav_link(&sidebar.items[i], Direction::Previous));
        let next = position
            .and_then(|i| sidebar.items.get(i + 1))
            .map(|item| nav_link(item, Direction::Next));

        let title = page.title();
        let breadcrumbs = vec![
            Breadcrumb::link("Guides", "/library"),
            Breadcrumb::link(capitalize(category), format!("/module/{}", category)),
            Breadcrumb::current(title.clone()),
        ];

        tracing::debug!("Compiled module page {}", href);

        Ok(Some(ModulePage {
            category: category.to_string(),
            slug: slug.to_string(),
            title,
            frontmatter: page.frontmatter(),
            html: page.doc.to_html(),
            toc: page.doc.toc,
            code_blocks: page.doc.code_blocks,
            sidebar,
            previous,
            next,
            breadcrumbs,
        }))
    }

    /// Sidebar of a category: every listed page ordered by `order`.
    ///
    /// Pages that fail to parse are left out. A missing folder gives an empty group.
    pub fn sidebar(&self, category: &str) -> Result<SidebarGroup, ContentError> {
        let title = capitalize(category);
        if !is_segment(category) {
            return Ok(SidebarGroup {
                title,
                items: Vec::new(),
            });
        }

        let files = self.list_folder(&self.root().join(category))?.unwrap_or_default();
        let mut items: Vec<SidebarItem> = load_all(&files)
            .into_iter()
            .map(|page| SidebarItem {
                label: page.title(),
                href: page_href(category, &page.slug),
                order: page.order(),
                is_active: false,
            })
            .collect();
        items.sort_by_key(|item| item.order);

        Ok(SidebarGroup { title, items })
    }

    /// Every page of a folder compiled onto one page.
    ///
    /// `slug` is mapped through the configured collections; unmapped slugs name
    /// the folder directly. Returns `Ok(None)` when the folder is missing or no
    /// page in it compiles.
    pub fn module_collection(&self, slug: &str) -> Result<Option<ModuleCollection>, ContentError> {
        let folder = self
            .config
            .collections
            .get(slug)
            .map(String::as_str)
            .unwrap_or(slug)
            .to_string();
        if !is_segment(&folder) {
            return Ok(None);
        }

        let Some(files) = self.list_folder(&self.root().join(&folder))? else {
            tracing::debug!("Collection folder {} not found", folder);
            return Ok(None);
        };

        let mut pages = load_all(&files);
        if pages.is_empty() {
            return Ok(None);
        }
        pages.sort_by_key(LoadedPage::order);

        let title = pages[0]
            .doc
            .frontmatter
            .as_ref()
            .map(|fm| fm.title_or(&folder).to_string())
            .unwrap_or_else(|| folder.clone());

        let sidebar = SidebarGroup {
            title: capitalize(&folder),
            items: pages
                .iter()
                .map(|page| SidebarItem {
                    label: page.title(),
                    href: format!("#{}", page.slug),
                    order: page.order(),
                    is_active: false,
                })
                .collect(),
        };

        let sections: Vec<CollectionSection> = pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| CollectionSection {
                title: page.title(),
                frontmatter: page.frontmatter(),
                html: page.doc.to_html(),
                toc: page.doc.toc,
                code_blocks: page.doc.code_blocks,
                show_heading: index > 0,
                slug: page.slug,
            })
            .collect();

        tracing::debug!("Compiled collection {} ({} sections)", slug, sections.len());

        Ok(Some(ModuleCollection {
            slug: slug.to_string(),
            breadcrumbs: vec![
                Breadcrumb::link("Library", "/library"),
                Breadcrumb::current(capitalize(&folder)),
            ],
            folder,
            title,
            sidebar,
            sections,
        }))
    }

    /// Every `(category, slug)` pair under the content root, sorted.
    pub fn page_params(&self) -> Result<Vec<PageParams>, ContentError> {
        let root = self.root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        for entry in WalkDir::new(root).min_depth(2).max_depth(2).sort_by_file_name() {
            let entry = entry.map_err(|e| ContentError::Read {
                path: root.display().to_string(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_listed(path) {
                continue;
            }

            let category = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|s| s.to_str());
            if let (Some(category), Some(slug)) = (category, file_stem(path)) {
                params.push(PageParams {
                    category: category.to_string(),
                    slug: slug.to_string(),
                });
            }
        }

        params.sort();
        Ok(params)
    }

    /// Slugs of the configured collections.
    pub fn collection_params(&self) -> Vec<String> {
        self.config.collections.keys().cloned().collect()
    }

    /// `.mdx` files directly inside `folder`, by file name. `None` if the folder is missing.
    fn list_folder(&self, folder: &Path) -> Result<Option<Vec<PathBuf>>, ContentError> {
        if !folder.is_dir() {
            return Ok(None);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ContentError::Read {
                path: folder.display().to_string(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && self.is_listed(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(Some(files))
    }

    fn is_listed(&self, path: &Path) -> bool {
        let is_mdx = path.extension().and_then(|e| e.to_str()) == Some("mdx");
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        is_mdx && !self.config.skip.iter().any(|skip| skip == name)
    }
}

/// Parse pages in parallel, dropping those that fail. Input order is kept.
fn load_all(files: &[PathBuf]) -> Vec<LoadedPage> {
    files
        .par_iter()
        .map(|path| {
            let slug = file_stem(path).unwrap_or_default();
            fs::read_to_string(path)
                .map_err(|e| ContentError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
                .and_then(|source| parse_page(path, slug, &source))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|result| match result {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!("Skipping page: {}", e);
                None
            }
        })
        .collect()
}

fn parse_page(path: &Path, slug: &str, source: &str) -> Result<LoadedPage, ContentError> {
    let doc = parse_mdx(source).map_err(|e| ContentError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(LoadedPage {
        slug: slug.to_string(),
        doc,
    })
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn page_href(category: &str, slug: &str) -> String {
    format!("/module/{}/{}", category, slug)
}

fn nav_link(item: &SidebarItem, direction: Direction) -> NavLink {
    NavLink {
        label: item.label.clone(),
        href: item.href.clone(),
        direction,
    }
}

/// A single path component that stays inside the content root.
fn is_segment(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Capitalize first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn laravel_tree() -> (TempDir, ContentStore) {
        let temp = tempdir().unwrap();
        let laravel = temp.path().join("laravel");

        write(
            &laravel,
            "la1.mdx",
            "---\ntitle: Routing\norder: 2\n---\n# Routing\n\n```php\nRoute::get('/');\n```\n",
        );
        write(&laravel, "la2.mdx", "---\ntitle: Installation\norder: 1\n---\n# Install\n");
        write(&laravel, "intro.mdx", "# Welcome\n");
        write(&laravel, "la27.mdx", "---\ntitle: Skipped\n---\n");
        write(&laravel, "broken.mdx", "---\ntitle: [oops\n---\n");
        write(&laravel, "notes.txt", "not a page");
        write(&temp.path().join("react"), "hooks.mdx", "---\ntitle: Hooks\n---\n");

        let store = ContentStore::new(ContentConfig {
            dir: temp.path().to_path_buf(),
            ..ContentConfig::default()
        });
        (temp, store)
    }

    #[test]
    fn sidebar_is_ordered_and_filtered() {
        let (_temp, store) = laravel_tree();
        let sidebar = store.sidebar("laravel").unwrap();

        assert_eq!(sidebar.title, "Laravel");
        let hrefs: Vec<_> = sidebar.items.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/module/laravel/intro",
                "/module/laravel/la2",
                "/module/laravel/la1"
            ]
        );
        assert_eq!(sidebar.items[0].label, "intro");
    }

    #[test]
    fn module_page_links_neighbours() {
        let (_temp, store) = laravel_tree();
        let page = store.module_page("laravel", "la2").unwrap().unwrap();

        assert_eq!(page.title, "Installation");
        assert!(page.html.contains(r#"<h1 id="install">Install</h1>"#));

        let previous = page.previous.unwrap();
        assert_eq!(previous.href, "/module/laravel/intro");
        assert_eq!(previous.direction, Direction::Previous);
        assert_eq!(page.next.unwrap().label, "Routing");

        let active: Vec<_> = page
            .sidebar
            .items
            .iter()
            .filter(|i| i.is_active)
            .map(|i| i.href.as_str())
            .collect();
        assert_eq!(active, vec!["/module/laravel/la2"]);

        let labels: Vec<_> = page.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Guides", "Laravel", "Installation"]);
        assert!(page.breadcrumbs[2].is_active);
    }

    #[test]
    fn last_page_has_no_next() {
        let (_temp, store) = laravel_tree();
        let page = store.module_page("laravel", "la1").unwrap().unwrap();

        assert!(page.next.is_none());
        assert_eq!(page.previous.unwrap().label, "Installation");
        assert_eq!(page.code_blocks.len(), 1);
        assert_eq!(page.code_blocks[0].language, "php");
    }

    #[test]
    fn missing_pages_are_not_found() {
        let (_temp, store) = laravel_tree();

        assert!(store.module_page("laravel", "la99").unwrap().is_none());
        assert!(store.module_page("vue", "intro").unwrap().is_none());
        assert!(store.module_page("..", "secret").unwrap().is_none());
        assert!(store.module_page("laravel", "../react/hooks").unwrap().is_none());
    }

    #[test]
    fn broken_page_is_not_found() {
        let (_temp, store) = laravel_tree();
        let result = store.module_page("laravel", "broken");

        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn collection_compiles_every_listed_page() {
        let (_temp, store) = laravel_tree();
        let collection = store.module_collection("laravel").unwrap().unwrap();

        let slugs: Vec<_> = collection.sections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["intro", "la2", "la1"]);

        let headings: Vec<_> = collection.sections.iter().map(|s| s.show_heading).collect();
        assert_eq!(headings, vec![false, true, true]);

        assert_eq!(collection.title, "laravel");
        assert_eq!(collection.sidebar.items[1].href, "#la2");
        assert!(collection.sidebar.items.iter().all(|i| !i.is_active));
    }

    #[test]
    fn collection_slug_goes_through_aliases() {
        let (temp, _) = laravel_tree();
        let store = ContentStore::new(ContentConfig {
            dir: temp.path().to_path_buf(),
            collections: BTreeMap::from([("php".to_string(), "laravel".to_string())]),
            ..ContentConfig::default()
        });

        let collection = store.module_collection("php").unwrap().unwrap();
        assert_eq!(collection.folder, "laravel");
        assert_eq!(collection.slug, "php");
        assert_eq!(store.collection_params(), vec!["php"]);

        // Unmapped slugs name the folder directly
        assert!(store.module_collection("react").unwrap().is_some());
    }

    #[test]
    fn empty_or_missing_collection_is_not_found() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("broken"), "a.mdx", "---\ntitle: [x\n---\n");
        let store = ContentStore::new(ContentConfig {
            dir: temp.path().to_path_buf(),
            ..ContentConfig::default()
        });

        assert!(store.module_collection("broken").unwrap().is_none());
        assert!(store.module_collection("nowhere").unwrap().is_none());
    }

    #[test]
    fn page_params_cover_the_tree() {
        let (_temp, store) = laravel_tree();
        let params = store.page_params().unwrap();

        let pairs: Vec<_> = params
            .iter()
            .map(|p| format!("{}/{}", p.category, p.slug))
            .collect();
        assert_eq!(
            pairs,
            vec![
                "laravel/broken",
                "laravel/intro",
                "laravel/la1",
                "laravel/la2",
                "react/hooks"
            ]
        );
    }

    #[test]
    fn missing_root_has_no_params() {
        let store = ContentStore::new(ContentConfig {
            dir: PathBuf::from("/definitely/not/here"),
            ..ContentConfig::default()
        });
        assert!(store.page_params().unwrap().is_empty());
    }

    #[test]
    fn page_serializes_for_the_api() {
        let (_temp, store) = laravel_tree();
        let page = store.module_page("laravel", "la1").unwrap().unwrap();
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["previous"]["direction"], "previous");
        assert_eq!(json["next"], serde_json::Value::Null);
        assert_eq!(json["breadcrumbs"][2].get("href"), None);
    }

    #[test]
    fn capitalizes_labels() {
        assert_eq!(capitalize("laravel"), "Laravel");
        assert_eq!(capitalize(""), "");
    }
}
