//! Configuration file (devportal.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use devportal_catalog::{Catalog, DEFAULT_CATEGORIES};
use devportal_content::ContentConfig;
use devportal_server::ServerConfig;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LibrarySettings {
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            items_per_page: default_items_per_page(),
            categories: default_categories(),
            search_debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_catalog() -> PathBuf {
    PathBuf::from("catalog.toml")
}
fn default_items_per_page() -> usize {
    6
}
fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        config.resolve_relative_to(path.parent().unwrap_or(Path::new("")));

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.library.items_per_page == 0 {
            anyhow::bail!("library.items_per_page must be at least 1");
        }
        Ok(())
    }

    /// Paths in the file are relative to the file itself.
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.library.catalog, &mut self.content.dir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Read the configured catalog file.
    pub fn load_catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.library.catalog, self.library.categories.as_slice()).with_context(
            || {
                format!(
                    "Could not load catalog. Run 'devportal init' to create {}",
                    self.library.catalog.display()
                )
            },
        )
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            catalog: self.library.catalog.clone(),
            categories: self.library.categories.clone(),
            items_per_page: self.library.items_per_page,
            search_debounce: Duration::from_millis(self.library.search_debounce_ms),
            content: self.content.clone(),
            port: self.server.port,
            host: self.server.host.clone(),
            watch: true,
        }
    }
}
