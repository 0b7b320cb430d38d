//! MDX document parser and HTML compiler.

use std::collections::HashMap;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::codeblock::CodeBlock;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Extracted code blocks
    pub code_blocks: Vec<CodeBlock>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedDoc {
    /// Compile the body to HTML with heading anchors matching [`ParsedDoc::toc`].
    pub fn to_html(&self) -> String {
        compile_html(&self.content)
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse an MDX document.
///
/// Extracts frontmatter, code blocks, and generates a table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // `content` is a suffix of `source`, so offsets shift by the header length
    let header_len = source.len() - content.len();
    let line_at = |offset: usize| source[..header_len + offset].matches('\n').count() + 1;

    let mut code_blocks = Vec::new();
    let mut toc = Vec::new();
    let mut slugs = Slugger::default();

    let mut current_code_block: Option<(String, usize, String)> = None; // (info, line, text)
    let mut current_heading: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(content, options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((info, line_at(range.start), String::new()));
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line, text)) = current_code_block.take() {
                    code_blocks.push(CodeBlock::from_fence(&info, text, line));
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugs.next(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut buffer)) = current_code_block {
                    buffer.push_str(&text);
                } else if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_blocks,
        toc,
    })
}

/// Compile Markdown to HTML. Headings get `id` attributes using the same slugs
/// as the table of contents.
pub fn compile_html(content: &str) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(content, options()).collect();
    let mut slugs = Slugger::default();

    let mut open: Option<(usize, String)> = None;
    for i in 0..events.len() {
        match &events[i] {
            Event::Start(Tag::Heading { .. }) => open = Some((i, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut title)) = open {
                    title.push_str(text);
                }
            }
            _ => {}
        }

        if matches!(events[i], Event::End(TagEnd::Heading(_))) {
            if let Some((start, title)) = open.take() {
                let slug = slugs.next(&title);
                if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                    *id = Some(CowStr::from(slug));
                }
            }
        }
    }

    let mut output = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// Hands out heading slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn next(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
