//! YAML frontmatter of a module page.

use serde::{Deserialize, Serialize};

/// Metadata block at the top of a module page.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Frontmatter {
    /// Page title; empty when the page does not declare one
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Content category the page belongs to (e.g. "laravel")
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Position in the module sidebar (lower = first)
    #[serde(default)]
    pub order: Option<i32>,
}

impl Frontmatter {
    /// Sort key for sidebars and collections; pages without `order` sit at 0.
    pub fn sort_order(&self) -> i32 {
        self.order.unwrap_or(0)
    }

    /// The declared title, or `fallback` when the page has none.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.trim().is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}

/// Split a page into its frontmatter and the body that follows.
///
/// A page without an opening `---` fence has no frontmatter and is returned
/// whole. An empty block yields default frontmatter.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start_matches('\u{feff}').trim_start();

    let Some(after_open) = trimmed.strip_prefix("---") else {
        return Ok((None, source));
    };

    let Some(close_pos) = find_closing_fence(after_open) else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml = after_open[..close_pos].trim();
    let rest = &after_open[close_pos..];
    let body = rest
        .trim_start_matches(['\r', '\n'])
        .strip_prefix("---")
        .unwrap_or(rest);

    let frontmatter = if yaml.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), body.trim_start()))
}

/// Byte offset of the line break before the closing `---`.
fn find_closing_fence(after_open: &str) -> Option<usize> {
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if offset > 0 && line.trim_end() == "---" {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_module_frontmatter() {
        let source = r#"---
title: "Sesi 5: Routing System"
description: "Mendefinisikan route di Laravel"
category: "laravel"
tags: ["laravel", "routing"]
order: 5
---

# Routing
"#;

        let (fm, body) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Sesi 5: Routing System");
        assert_eq!(fm.category.as_deref(), Some("laravel"));
        assert_eq!(fm.tags, vec!["laravel", "routing"]);
        assert_eq!(fm.sort_order(), 5);
        assert!(body.starts_with("# Routing"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let (fm, _) = extract_frontmatter("---\ndescription: only this\n---\nBody").unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "");
        assert_eq!(fm.title_or("la2"), "la2");
        assert_eq!(fm.sort_order(), 0);
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn empty_block_is_default() {
        let (fm, body) = extract_frontmatter("---\n---\n# Title").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(body, "# Title");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let (fm, body) = extract_frontmatter("---\r\ntitle: Windows\r\n---\r\n# Body").unwrap();

        assert_eq!(fm.unwrap().title, "Windows");
        assert_eq!(body, "# Body");
    }

    #[test]
    fn body_without_frontmatter_is_untouched() {
        let source = "# Plain page\n\nText.";
        let (fm, body) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(body, source);
    }

    #[test]
    fn dashes_inside_yaml_values_do_not_close_the_block() {
        let source = "---\ntitle: a---b\n---\nBody";
        let (fm, body) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.unwrap().title, "a---b");
        assert_eq!(body, "Body");
    }

    #[test]
    fn errors_on_unclosed_block() {
        let result = extract_frontmatter("---\ntitle: Test\n# No closing");
        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = extract_frontmatter("---\ntitle: [invalid yaml\n---\n");
        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
