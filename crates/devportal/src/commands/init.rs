//! Initialize a DevPortal library in a directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command. Files are created next to `config_path`.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing DevPortal...");

    let root = config_path.parent().unwrap_or(Path::new(""));
    let content_dir = root.join("content/module/laravel");

    if content_dir.exists() {
        if !yes {
            tracing::warn!(
                "{} already exists. Use --yes to overwrite.",
                content_dir.display()
            );
            return Ok(());
        }
    } else {
        fs::create_dir_all(&content_dir).context("Failed to create content directory")?;
    }

    write_file(config_path, DEFAULT_CONFIG, yes)?;
    write_file(&root.join("catalog.toml"), SAMPLE_CATALOG, yes)?;

    for (name, source) in SAMPLE_PAGES {
        write_file(&content_dir.join(name), source, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'devportal library' to browse the catalog or 'devportal serve' for the API.");

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# DevPortal Configuration

[library]
# Catalog data file ([[modules]] tables)
catalog = "catalog.toml"

# Modules per library page
items_per_page = 6

# Category labels, in sidebar order
categories = ["Backend", "Frontend", "Database", "DevOps", "Mobile", "Security"]

# Quiet period before live search text is applied
search_debounce_ms = 300

[content]
# One folder per category, one .mdx file per page
dir = "content/module"

# Pages left out of sidebars and collections
skip = ["la27.mdx", "la35.mdx", "a8.mdx"]

[content.collections]
# Collection slug = content folder
laravel = "laravel"

[server]
host = "127.0.0.1"
port = 4000
"#;

const SAMPLE_CATALOG: &str = include_str!("../../templates/catalog.toml");

const SAMPLE_PAGES: [(&str, &str); 3] = [
    (
        "la1.mdx",
        r#"---
title: "Session 1: Installing Laravel"
description: "Create a new Laravel project with Composer"
category: "laravel"
tags: ["laravel", "setup"]
order: 1
---

# Installing Laravel

Laravel needs PHP 8.2 and Composer.

## Create a Project

```bash filename="terminal"
composer create-project laravel/laravel blog
cd blog
php artisan serve
```

## Directory Structure

| Folder | Purpose |
|---|---|
| `app/` | Application code |
| `routes/` | Route definitions |
| `resources/views/` | Blade templates |
"#,
    ),
    (
        "la2.mdx",
        r#"---
title: "Session 2: Routing"
description: "Map URLs to closures and controllers"
category: "laravel"
tags: ["laravel", "routing"]
order: 2
---

# Routing

Routes live in `routes/web.php`.

```php filename="routes/web.php"
Route::get('/', function () {
    return view('welcome');
});

Route::get('/posts/{post}', [PostController::class, 'show']);
```

## Route Parameters

Parameters in braces are passed to the handler in order.
"#,
    ),
    (
        "la3.mdx",
        r#"---
title: "Session 3: Blade Templates"
description: "Layouts, components and loops in Blade"
category: "laravel"
tags: ["laravel", "blade"]
order: 3
---

# Blade Templates

```php filename="resources/views/posts/index.blade.php"
@foreach ($posts as $post)
    <h2>{{ $post->title }}</h2>
@endforeach
```
"#,
    ),
];
