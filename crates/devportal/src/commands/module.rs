//! Module page command.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use devportal_content::{ContentStore, ModulePage};

use crate::config::ConfigFile;

/// Run the module command.
pub fn run(config: &ConfigFile, category: &str, slug: &str, json: bool) -> Result<()> {
    let store = ContentStore::new(config.content.clone());

    let page = store
        .module_page(category, slug)
        .with_context(|| format!("Failed to compile {}/{}", category, slug))?
        .with_context(|| {
            format!(
                "Module {}/{} not found under {}",
                category,
                slug,
                store.root().display()
            )
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", summary(&page));
    }

    Ok(())
}

fn summary(page: &ModulePage) -> String {
    let mut out = String::new();

    let trail: Vec<&str> = page.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
    let _ = writeln!(out, "{}", trail.join(" > "));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", page.title);
    if let Some(description) = &page.frontmatter.description {
        let _ = writeln!(out, "{}", description);
    }

    if !page.toc.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Contents:");
        for entry in &page.toc {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            let _ = writeln!(out, "  {}{} (#{})", indent, entry.title, entry.id);
        }
    }

    if !page.code_blocks.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Code blocks:");
        for block in &page.code_blocks {
            let _ = writeln!(
                out,
                "  line {:>4}  {:<8} {}",
                block.line_number, block.language, block.filename
            );
        }
    }

    let _ = writeln!(out);
    if let Some(previous) = &page.previous {
        let _ = writeln!(out, "Previous: {} ({})", previous.label, previous.href);
    }
    if let Some(next) = &page.next {
        let _ = writeln!(out, "Next: {} ({})", next.label, next.href);
    }

    out
}
