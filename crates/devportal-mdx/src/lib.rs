//! MDX parser for module pages.
//!
//! Extracts YAML frontmatter, fenced code blocks and a table of contents, and
//! compiles the Markdown body to HTML with heading anchors.

pub mod codeblock;
pub mod frontmatter;
pub mod parser;

pub use codeblock::{CodeBlock, DEFAULT_LANGUAGE};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{compile_html, parse_mdx, slugify, ParseError, ParsedDoc, TocEntry};
