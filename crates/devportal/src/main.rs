//! DevPortal CLI - learning library search and module pages.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use devportal_catalog::{SortOption, Status};

mod commands;
mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "devportal")]
#[command(about = "Search the DevPortal module library and serve module pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to devportal.toml config file
    #[arg(short, long, default_value = "devportal.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config, a sample catalog and sample content
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Filter, sort and page through the module catalog
    Library {
        /// Search title, description and category
        #[arg(short, long)]
        query: Option<String>,

        /// Category label; repeat to select several
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// stable, beta or deprecated
        #[arg(short, long)]
        status: Option<Status>,

        /// newest, alphabetical, popular or difficulty
        #[arg(long, default_value = "newest")]
        sort: SortOption,

        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a module page
    Module {
        category: String,
        slug: String,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the JSON API with live search
    Serve {
        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Do not reload the catalog when it changes
        #[arg(long)]
        no_watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Library {
            query,
            categories,
            status,
            sort,
            page,
            json,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            let request = commands::library::LibraryRequest {
                query,
                categories,
                status,
                sort,
                page,
            };
            commands::library::run(&config, request, json)?;
        }
        Commands::Module {
            category,
            slug,
            json,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            commands::module::run(&config, &category, &slug, json)?;
        }
        Commands::Serve {
            port,
            host,
            no_watch,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            commands::serve::run(&config, port, host, !no_watch).await?;
        }
    }

    Ok(())
}
