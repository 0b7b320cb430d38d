//! Catalog entries and the read-only catalog that holds them.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::counts::{CategoryCounts, DEFAULT_CATEGORIES};

/// Publication status of a documentation module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Status {
    Stable,
    Beta,
    Deprecated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "beta" => Ok(Self::Beta),
            "deprecated" => Ok(Self::Deprecated),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A status string that is not one of `stable`, `beta`, `deprecated`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status '{0}' (expected stable, beta or deprecated)")]
pub struct UnknownStatus(pub String);

/// One documentation module listed in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier
    pub id: String,

    /// Display name, searched and used for alphabetical sort
    pub title: String,

    /// Free text, searched but never sorted on
    #[serde(default)]
    pub description: String,

    /// Human-readable category ("Backend", "Frontend", ...)
    #[serde(alias = "categoryLabel")]
    pub category_label: String,

    pub status: Status,

    /// Creation date, used for the "newest" sort
    #[serde(alias = "createdAt")]
    pub created_at: NaiveDate,

    /// Popularity score; missing, null or non-numeric means 0
    #[serde(default, deserialize_with = "popularity_score")]
    pub popularity: f64,

    /// Completion percentage (0-100); missing, null or non-numeric means 0
    #[serde(default, deserialize_with = "progress_percent")]
    pub progress: u8,

    /// Detail page slug
    pub slug: String,
}

/// Numeric field as it appears in a catalog file.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Read a non-negative number, falling back to 0 for anything else.
fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(n)) => n,
        Some(LooseNumber::Text(text)) => text.trim().parse().unwrap_or(0.0),
        Some(LooseNumber::Other(_)) | None => 0.0,
    };
    Ok(if value.is_finite() && value > 0.0 { value } else { 0.0 })
}

fn popularity_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    loose_number(deserializer)
}

/// Out-of-range percentages saturate and are rejected by validation.
fn progress_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = loose_number(deserializer)?.round();
    Ok(value.min(f64::from(u8::MAX)) as u8)
}

/// Errors that can occur when loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse catalog {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),

    #[error("Entry '{id}' has progress {progress}, expected 0-100")]
    InvalidProgress { id: String, progress: u8 },
}

/// On-disk catalog layout: a list of `[[modules]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    modules: Vec<CatalogEntry>,
}

/// Immutable, cheaply clonable catalog.
///
/// Category counts are computed once here and never again for the lifetime
/// of the value; a changed catalog is a new `Catalog`.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[CatalogEntry]>,
    counts: Arc<CategoryCounts>,
}

impl Catalog {
    /// Build a catalog counting the default category labels.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self::with_categories(entries, &DEFAULT_CATEGORIES)
    }

    /// Build a catalog counting the given known category labels.
    pub fn with_categories<S: AsRef<str>>(entries: Vec<CatalogEntry>, known: &[S]) -> Self {
        let counts = CategoryCounts::from_entries(&entries, known);
        Self {
            entries: entries.into(),
            counts: Arc::new(counts),
        }
    }

    /// Load a catalog file. `.json` files are read as JSON, anything else as TOML.
    pub fn load<S: AsRef<str>>(path: &Path, known: &[S]) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let parsed = if is_json {
            serde_json::from_str::<CatalogFile>(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str::<CatalogFile>(&content).map_err(|e| e.to_string())
        };

        let file = parsed.map_err(|message| CatalogError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        validate(&file.modules)?;

        tracing::debug!("Loaded {} catalog entries from {}", file.modules.len(), path.display());

        Ok(Self::with_categories(file.modules, known))
    }

    /// Parse catalog entries from TOML text.
    pub fn from_toml_str<S: AsRef<str>>(source: &str, known: &[S]) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source).map_err(|e| CatalogError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        validate(&file.modules)?;
        Ok(Self::with_categories(file.modules, known))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whole-catalog category counts.
    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

fn validate(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId(entry.id.clone()));
        }
        if entry.progress > 100 {
            return Err(CatalogError::InvalidProgress {
                id: entry.id.clone(),
                progress: entry.progress,
            });
        }
    }
    Ok(())
}
