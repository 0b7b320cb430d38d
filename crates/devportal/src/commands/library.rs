//! Library listing command.

use std::fmt::Write as _;

use anyhow::Result;

use devportal_catalog::{Catalog, LibrarySession, PageLabel, SortOption, Status};
use devportal_server::LibraryView;

use crate::config::ConfigFile;

/// Filters given on the command line.
#[derive(Debug, Clone, Default)]
pub struct LibraryRequest {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub status: Option<Status>,
    pub sort: SortOption,
    pub page: usize,
}

/// Run the library command.
pub fn run(config: &ConfigFile, request: LibraryRequest, json: bool) -> Result<()> {
    let catalog = config.load_catalog()?;
    let session = build_session(catalog, config.library.items_per_page, &request);

    if json {
        let view = LibraryView::from_session(&session);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&session));
    }

    Ok(())
}

fn build_session(catalog: Catalog, items_per_page: usize, request: &LibraryRequest) -> LibrarySession {
    let mut session = LibrarySession::new(catalog, items_per_page);

    if let Some(query) = &request.query {
        session.set_search_input(query.as_str());
        session.set_query(query.as_str());
    }
    if !request.categories.is_empty() {
        session.set_categories(&request.categories);
    }
    session.set_status(request.status);
    session.set_sort(request.sort);

    if request.page > 1 && !session.go_to_page(request.page) {
        tracing::warn!(
            "Page {} is out of range (1-{}), showing page 1",
            request.page,
            session.total_pages().max(1)
        );
    }

    session
}

fn render(session: &LibrarySession) -> String {
    let page = session.page();
    let nav = &page.nav;
    let mut out = String::new();

    if page.items.is_empty() {
        let _ = writeln!(out, "No modules match the current filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "Showing {}-{} of {} modules (page {} of {})",
        nav.start_index,
        nav.end_index,
        nav.total_items,
        nav.current_page,
        nav.total_pages
    );
    let _ = writeln!(out);

    for entry in &page.items {
        let _ = writeln!(
            out,
            "  {:<28} {:<10} {:<11} {}  {:>5}  {:>3}%",
            entry.title,
            entry.category_label,
            entry.status.as_str(),
            entry.created_at,
            entry.popularity,
            entry.progress
        );
    }

    if nav.total_pages > 1 {
        let labels: Vec<String> = nav
            .page_numbers
            .iter()
            .map(|label| match label {
                PageLabel::Page(n) if *n == nav.current_page => format!("[{}]", n),
                other => other.to_string(),
            })
            .collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Pages: {}", labels.join(" "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use devportal_catalog::DEFAULT_CATEGORIES;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        Catalog::from_toml_str(
            include_str!("../../templates/catalog.toml"),
            &DEFAULT_CATEGORIES,
        )
        .unwrap()
    }

    #[test]
    fn default_request_lists_newest_first() {
        let request = LibraryRequest {
            page: 1,
            ..LibraryRequest::default()
        };
        let session = build_session(sample(), 6, &request);
        let text = render(&session);

        assert!(text.starts_with("Showing 1-6 of 12 modules (page 1 of 2)"));
        assert!(text.contains("Pages: [1] 2"));
    }

    #[test]
    fn applies_filters_before_paging() {
        let request = LibraryRequest {
            categories: vec!["Frontend".to_string()],
            sort: SortOption::Alphabetical,
            page: 1,
            ..LibraryRequest::default()
        };
        let session = build_session(sample(), 6, &request);

        let ids: Vec<_> = session
            .filtered_results()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["astro", "jquery", "nextjs", "vue"]);
    }

    #[test]
    fn out_of_range_page_falls_back_to_first() {
        let request = LibraryRequest {
            page: 5,
            ..LibraryRequest::default()
        };
        let session = build_session(sample(), 6, &request);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn empty_result_says_so() {
        let request = LibraryRequest {
            query: Some("cobol".to_string()),
            page: 1,
            ..LibraryRequest::default()
        };
        let session = build_session(sample(), 6, &request);
        assert_eq!(render(&session), "No modules match the current filters.\n");
    }
}
