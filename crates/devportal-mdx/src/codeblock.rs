//! Fenced code blocks found in module pages.

use serde::Serialize;

/// Language assumed for fences without an info string.
pub const DEFAULT_LANGUAGE: &str = "bash";

/// A code block as the page's code viewer shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: code-{line_number})
    pub id: String,

    /// Lower-cased language label from the fence, `bash` when absent
    pub language: String,

    /// Filename shown in the viewer header
    pub filename: String,

    pub source: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,
}

impl CodeBlock {
    /// Build a block from a fence info string such as `php filename="routes/web.php"`.
    pub fn from_fence(info: &str, source: String, line_number: usize) -> Self {
        let language = language_from_info(info);
        let filename =
            extract_filename(info).unwrap_or_else(|| format!("example.{}", language));

        Self {
            id: format!("code-{}", line_number),
            language,
            filename,
            source,
            line_number,
        }
    }

    /// Number of source lines, for line-number gutters.
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}

/// First word of the info string, lower-cased.
pub fn language_from_info(info: &str) -> String {
    info.split_whitespace()
        .next()
        .filter(|lang| !lang.contains('='))
        .map(|lang| lang.trim_start_matches("language-").to_lowercase())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Filename hint from `filename="..."`, `title="..."` or `file=...`.
pub fn extract_filename(info: &str) -> Option<String> {
    for key in ["filename=\"", "title=\""] {
        if let Some(start) = info.find(key) {
            let rest = &info[start + key.len()..];
            if let Some(end) = rest.find('"') {
                let name = &rest[..end];
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }

    let start = info.find("file=")?;
    let rest = &info[start + 5..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = rest[..end].trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}
