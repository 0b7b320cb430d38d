//! Per-category entry counts for the library sidebar.

use serde::Serialize;

use crate::entry::CatalogEntry;
use crate::filter::ALL_MODULES;

/// Category labels the library always lists, even when empty.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Backend", "Frontend", "Database", "DevOps", "Mobile", "Security"];

/// Number of entries carrying one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Counts over the whole catalog, independent of any filter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    total: usize,
    categories: Vec<CategoryCount>,
}

impl CategoryCounts {
    /// Count entries per label.
    ///
    /// Known labels come first in the given order and are present even with a
    /// zero count; labels found only in the catalog follow in first-seen order.
    pub fn from_entries<S: AsRef<str>>(entries: &[CatalogEntry], known: &[S]) -> Self {
        let mut categories: Vec<CategoryCount> = known
            .iter()
            .map(|name| CategoryCount {
                name: name.as_ref().to_string(),
                count: 0,
            })
            .collect();

        for entry in entries {
            match categories
                .iter_mut()
                .find(|c| c.name == entry.category_label)
            {
                Some(category) => category.count += 1,
                None => categories.push(CategoryCount {
                    name: entry.category_label.clone(),
                    count: 1,
                }),
            }
        }

        Self {
            total: entries.len(),
            categories,
        }
    }

    /// Size of the whole catalog.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Count for a label; `"All Modules"` yields the total.
    pub fn get(&self, label: &str) -> Option<usize> {
        if label == ALL_MODULES {
            return Some(self.total);
        }
        self.categories
            .iter()
            .find(|c| c.name == label)
            .map(|c| c.count)
    }

    /// Concrete categories, without the `"All Modules"` row.
    pub fn categories(&self) -> &[CategoryCount] {
        &self.categories
    }

    /// Sidebar rows: `"All Modules"` first, then every category.
    pub fn items(&self) -> Vec<CategoryCount> {
        std::iter::once(CategoryCount {
            name: ALL_MODULES.to_string(),
            count: self.total,
        })
        .chain(self.categories.iter().cloned())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Status;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, category: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            category_label: category.to_string(),
            status: Status::Stable,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            popularity: 0.0,
            progress: 0,
            slug: id.to_string(),
        }
    }

    #[test]
    fn counts_known_and_unknown_labels() {
        let entries = vec![
            entry("a", "Backend"),
            entry("b", "Frontend"),
            entry("c", "Backend"),
            entry("d", "Tooling"),
        ];

        let counts = CategoryCounts::from_entries(&entries, &DEFAULT_CATEGORIES);

        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(ALL_MODULES), Some(4));
        assert_eq!(counts.get("Backend"), Some(2));
        assert_eq!(counts.get("Mobile"), Some(0));
        assert_eq!(counts.get("Tooling"), Some(1));
        assert_eq!(counts.get("Nope"), None);
        assert_eq!(counts.categories().last().unwrap().name, "Tooling");
    }

    #[test]
    fn sidebar_items_start_with_all_modules() {
        let entries = vec![entry("a", "Backend")];
        let counts = CategoryCounts::from_entries(&entries, &["Backend"]);

        assert_eq!(
            counts.items(),
            vec![
                CategoryCount {
                    name: ALL_MODULES.to_string(),
                    count: 1
                },
                CategoryCount {
                    name: "Backend".to_string(),
                    count: 1
                },
            ]
        );
    }
}
