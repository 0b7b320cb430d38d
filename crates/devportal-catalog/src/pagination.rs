//! Page slicing, navigation state and compact page-number labels.

use std::fmt;

use serde::{Serialize, Serializer};

/// Up to this many pages, every page number is shown.
pub const COMPACT_THRESHOLD: usize = 7;

/// One pager control: a page number or a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{}", n),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

impl Serialize for PageLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u64(*n as u64),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Number of pages needed for `len` items.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1))
}

/// Compact pager labels for `current` out of `total` pages.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageLabel> {
    use self::PageLabel::{Ellipsis, Page};

    if total <= COMPACT_THRESHOLD {
        return (1..=total).map(Page).collect();
    }

    let mut labels = Vec::with_capacity(COMPACT_THRESHOLD);

    if current <= 3 {
        labels.extend((1..=4).map(Page));
        labels.push(Ellipsis);
        labels.push(Page(total));
    } else if current >= total - 2 {
        labels.push(Page(1));
        labels.push(Ellipsis);
        labels.extend((total - 3..=total).map(Page));
    } else {
        labels.push(Page(1));
        labels.push(Ellipsis);
        labels.extend((current - 1..=current + 1).map(Page));
        labels.push(Ellipsis);
        labels.push(Page(total));
    }

    labels
}

/// Navigation state shown next to a page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub current_page: usize,
    pub total_pages: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub page_numbers: Vec<PageLabel>,
    /// 1-based position of the first item on the page, 0 when the page is empty
    pub start_index: usize,
    /// 1-based position of the last item on the page
    pub end_index: usize,
    pub total_items: usize,
}

/// A slice of items plus navigation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    #[serde(flatten)]
    pub nav: PageNav,
}

/// Slice out one page. Out-of-range pages yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let page = page.max(1);

    let start = (page - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    let slice = &items[start..end];

    Page {
        items: slice,
        nav: PageNav {
            current_page: page,
            total_pages: total,
            can_go_previous: page > 1,
            can_go_next: page < total,
            page_numbers: page_numbers(page, total),
            start_index: if slice.is_empty() { 0 } else { start + 1 },
            end_index: end,
            total_items: items.len(),
        },
    }
}

/// Current page plus the page size it applies to.
///
/// Navigation never fails: out-of-range requests leave the page unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    items_per_page: usize,
}

impl Paginator {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Jump to `page` if `1 <= page <= total_pages`. Returns whether the page moved.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages && page != self.current_page {
            self.current_page = page;
            return true;
        }
        false
    }

    pub fn go_to_next(&mut self, total_pages: usize) -> bool {
        if self.current_page < total_pages {
            self.current_page += 1;
            return true;
        }
        false
    }

    pub fn go_to_previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Pull the page back inside `[1, max(total_pages, 1)]`.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    /// Slice the current page out of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.current_page, self.items_per_page)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::PageLabel::{Ellipsis, Page as P};

    #[test]
    fn shows_every_page_up_to_seven() {
        assert_eq!(page_numbers(1, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
        assert_eq!(page_numbers(7, 7).len(), 7);
        assert_eq!(page_numbers(1, 0), vec![]);
    }

    #[test]
    fn compacts_near_start() {
        assert_eq!(
            page_numbers(3, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
    }

    #[test]
    fn compacts_near_end() {
        assert_eq!(
            page_numbers(8, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
    }

    #[test]
    fn compacts_middle() {
        assert_eq!(
            page_numbers(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
        assert_eq!(
            page_numbers(4, 8),
            vec![P(1), Ellipsis, P(3), P(4), P(5), Ellipsis, P(8)]
        );
    }

    #[test]
    fn serializes_labels_as_numbers_and_ellipsis() {
        let json = serde_json::to_string(&page_numbers(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }

    #[test]
    fn slices_pages() {
        let items: Vec<u32> = (1..=14).collect();

        let first = paginate(&items, 1, 6);
        assert_eq!(first.items, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(first.nav.total_pages, 3);
        assert!(first.nav.can_go_next);
        assert!(!first.nav.can_go_previous);
        assert_eq!((first.nav.start_index, first.nav.end_index), (1, 6));

        let last = paginate(&items, 3, 6);
        assert_eq!(last.items, &[13, 14]);
        assert!(!last.nav.can_go_next);
        assert_eq!((last.nav.start_index, last.nav.end_index), (13, 14));

        let beyond = paginate(&items, 9, 6);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn empty_input_has_zero_pages() {
        let items: Vec<u32> = vec![];
        let page = paginate(&items, 1, 6);

        assert_eq!(page.nav.total_pages, 0);
        assert_eq!(page.nav.current_page, 1);
        assert!(!page.nav.can_go_next);
        assert!(!page.nav.can_go_previous);
        assert!(page.nav.page_numbers.is_empty());
        assert_eq!(page.nav.start_index, 0);
    }

    #[test]
    fn out_of_range_jumps_are_ignored() {
        let mut paginator = Paginator::new(6);

        assert!(paginator.go_to_page(2, 3));
        for page in [0, 4, 100] {
            assert!(!paginator.go_to_page(page, 3));
            assert_eq!(paginator.current_page(), 2);
        }
    }

    #[test]
    fn next_and_previous_clamp_at_bounds() {
        let mut paginator = Paginator::new(6);

        assert!(!paginator.go_to_previous());
        assert!(paginator.go_to_next(2));
        assert!(!paginator.go_to_next(2));
        assert_eq!(paginator.current_page(), 2);
        assert!(paginator.go_to_previous());
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn clamp_keeps_page_in_range() {
        let mut paginator = Paginator::new(6);
        paginator.go_to_page(5, 5);

        paginator.clamp(3);
        assert_eq!(paginator.current_page(), 3);

        paginator.clamp(0);
        assert_eq!(paginator.current_page(), 1);
    }
}
