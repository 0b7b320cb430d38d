//! Search, category, status filtering and sorting over catalog entries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::entry::{CatalogEntry, Status};

/// Category sentinel meaning "no category restriction".
pub const ALL_MODULES: &str = "All Modules";

/// Sort order for the library listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most recently created first
    #[default]
    Newest,
    /// Title ascending
    Alphabetical,
    /// Highest popularity first
    Popular,
    /// Highest progress first
    Difficulty,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Alphabetical => "alphabetical",
            Self::Popular => "popular",
            Self::Difficulty => "difficulty",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "alphabetical" => Ok(Self::Alphabetical),
            "popular" => Ok(Self::Popular),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort option '{0}' (expected newest, alphabetical, popular or difficulty)")]
pub struct UnknownSort(pub String);

/// Selected categories. Never empty: no explicit selection is `{"All Modules"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySelection(Vec<String>);

impl CategorySelection {
    /// The sentinel-only selection.
    pub fn all() -> Self {
        Self(vec![ALL_MODULES.to_string()])
    }

    /// Build a selection by toggling each label in turn, starting from `{"All Modules"}`.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::all();
        for label in labels {
            selection.toggle(label.as_ref());
        }
        selection
    }

    /// Toggle one label.
    ///
    /// Toggling the sentinel resets to `{"All Modules"}`. Selecting a concrete
    /// label drops the sentinel; deselecting the last one restores it.
    pub fn toggle(&mut self, label: &str) {
        if label == ALL_MODULES {
            *self = Self::all();
            return;
        }

        if let Some(pos) = self.0.iter().position(|c| c == label) {
            self.0.remove(pos);
            if self.0.is_empty() {
                *self = Self::all();
            }
        } else {
            self.0.retain(|c| c != ALL_MODULES);
            self.0.push(label.to_string());
        }
    }

    /// Whether the sentinel is part of the selection.
    pub fn is_all(&self) -> bool {
        self.0.iter().any(|c| c == ALL_MODULES)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|c| c == label)
    }

    /// Whether an entry with this label passes the category stage.
    pub fn admits(&self, label: &str) -> bool {
        self.is_all() || self.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a selection is never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Filter and sort state for one library session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    /// Free-text query, matched case-insensitively
    pub query: String,
    pub categories: CategorySelection,
    /// `None` means no status restriction
    pub status: Option<Status>,
    pub sort: SortOption,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply a filter state to catalog entries.
///
/// Returns a new ordered view; the input is never touched.
pub fn apply<'a>(entries: &'a [CatalogEntry], state: &FilterState) -> Vec<&'a CatalogEntry> {
    apply_indices(entries, state)
        .into_iter()
        .map(|i| &entries[i])
        .collect()
}

/// Same as [`apply`] but yields positions into `entries`.
pub fn apply_indices(entries: &[CatalogEntry], state: &FilterState) -> Vec<usize> {
    let query = state.query.trim().to_lowercase();

    let mut matched: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_query(entry, &query))
        .filter(|(_, entry)| state.categories.admits(&entry.category_label))
        .filter(|(_, entry)| state.status.map_or(true, |s| entry.status == s))
        .map(|(i, _)| i)
        .collect();

    // slice::sort_by is stable, ties keep catalog order
    matched.sort_by(|&a, &b| compare(&entries[a], &entries[b], state.sort));

    matched
}

fn matches_query(entry: &CatalogEntry, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    entry.title.to_lowercase().contains(query)
        || entry.description.to_lowercase().contains(query)
        || entry.category_label.to_lowercase().contains(query)
}

fn compare(a: &CatalogEntry, b: &CatalogEntry, sort: SortOption) -> Ordering {
    match sort {
        SortOption::Newest => b.created_at.cmp(&a.created_at),
        SortOption::Alphabetical => locale_cmp(&a.title, &b.title),
        SortOption::Popular => b.popularity.total_cmp(&a.popularity),
        SortOption::Difficulty => b.progress.cmp(&a.progress),
    }
}

/// Compare two strings the way a human-facing listing expects.
///
/// Characters compare by base letter first (ignoring accents and case), then
/// by accents, then lower case before upper case. Whitespace sorts before
/// punctuation and symbols, which sort before digits, which sort before letters.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .map(collation_key)
        .cmp(base_letters(b).map(collation_key))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| case_bits(a).cmp(case_bits(b)))
}

/// ASCII punctuation and symbols in root collation order.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn collation_key(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(rank) = SYMBOL_ORDER.find(c) {
        (1, rank as u32)
    } else if c.is_numeric() {
        (3, c as u32)
    } else if c.is_alphabetic() {
        (4, c as u32)
    } else {
        // Remaining symbols follow the ASCII ones
        (2, c as u32)
    }
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_bits(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().filter(|c| c.is_alphabetic()).map(char::is_uppercase)
}
