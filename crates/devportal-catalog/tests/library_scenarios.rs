//! Library behaviour over the twelve-module sample catalog.

use std::path::Path;

use devportal_catalog::{
    apply, Catalog, FilterState, LibrarySession, PageLabel, SortOption, Status,
    DEFAULT_CATEGORIES,
};
use pretty_assertions::assert_eq;

const ITEMS_PER_PAGE: usize = 6;

fn sample_catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.toml");
    Catalog::load(&path, &DEFAULT_CATEGORIES).unwrap()
}

fn ids(session: &LibrarySession) -> Vec<String> {
    session
        .filtered_results()
        .iter()
        .map(|e| e.id.clone())
        .collect()
}

#[test]
fn default_view_shows_newest_first() {
    let session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);
    let page = session.page();

    let page_ids: Vec<&str> = page.items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        page_ids,
        vec!["sanctum", "astro", "nextjs", "laravel", "vue", "flutter"]
    );
    assert!(page
        .items
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
    assert_eq!(page.nav.total_pages, 2);
    assert!(page.nav.can_go_next);
    assert!(!page.nav.can_go_previous);
}

#[test]
fn auth_query_finds_two_modules() {
    let mut session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);
    session.set_query("auth");

    assert_eq!(session.result_count(), 2);
    let page = session.page();
    assert_eq!(page.nav.total_pages, 1);
    assert_eq!(page.nav.page_numbers, vec![PageLabel::Page(1)]);
}

#[test]
fn frontend_alphabetical() {
    let mut session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);
    session.toggle_category("Frontend");
    session.set_sort(SortOption::Alphabetical);

    assert_eq!(ids(&session), vec!["astro", "jquery", "nextjs", "vue"]);
}

#[test]
fn deprecated_only() {
    let mut session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);
    session.set_status(Some(Status::Deprecated));

    assert_eq!(ids(&session), vec!["jquery", "grunt"]);
    assert!(session
        .filtered_results()
        .iter()
        .all(|e| e.status == Status::Deprecated));
}

#[test]
fn multiple_categories_combine_with_status() {
    let mut session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);
    session.set_categories(["Backend", "DevOps"]);
    session.set_status(Some(Status::Stable));
    session.set_sort(SortOption::Popular);

    assert_eq!(ids(&session), vec!["docker", "laravel", "sanctum"]);
    assert!(session.has_active_filters());

    session.clear_filters();
    assert_eq!(session.result_count(), 12);
    assert!(!session.has_active_filters());
    assert_eq!(session.filters(), &FilterState::default());
}

#[test]
fn counts_cover_the_whole_catalog() {
    let catalog = sample_catalog();
    let counts = catalog.counts();

    assert_eq!(counts.total(), 12);
    assert_eq!(counts.get("Frontend"), Some(4));
    assert_eq!(counts.get("Backend"), Some(2));
    assert_eq!(counts.get("Database"), Some(2));
    assert_eq!(counts.get("DevOps"), Some(2));
    assert_eq!(counts.get("Mobile"), Some(1));
    assert_eq!(counts.get("Security"), Some(1));
}

#[test]
fn engine_never_mutates_the_catalog() {
    let catalog = sample_catalog();
    let before: Vec<_> = catalog.entries().to_vec();

    let state = FilterState {
        sort: SortOption::Difficulty,
        ..FilterState::default()
    };
    let sorted = apply(catalog.entries(), &state);

    assert_eq!(sorted[0].id, "jquery");
    assert_eq!(catalog.entries(), before.as_slice());
}

#[test]
fn second_page_then_filter_returns_to_first() {
    let mut session = LibrarySession::new(sample_catalog(), ITEMS_PER_PAGE);

    assert!(session.go_to_next());
    assert_eq!(session.page().nav.current_page, 2);
    assert_eq!(session.page().items.len(), 6);

    session.set_sort(SortOption::Alphabetical);
    assert_eq!(session.current_page(), 1);
}
