pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod session;
pub mod source;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use catalog::Catalog;
use session::{JsonFileStateStore, KEY_CATEGORY, KEY_SEARCH, UiStateStore};
use source::{DirSource, HttpSource, IndexSource};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "category-search",
    version,
    about = "Browse and filter remote category indexes"
)]
pub struct Cli {
    /// Base URL of an index host (fetches <base>/data/<category>.json)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory holding <category>.json documents (defaults to ./data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path to a category definition JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured categories
    Categories,
    /// Load a category and filter it by a query
    Search {
        /// Category name (defaults to the last searched category)
        #[arg(long)]
        category: Option<String>,

        /// Free-text search terms
        query: String,

        /// Print only the first matching entry
        #[arg(long)]
        first: bool,
    },
    /// Load every configured category up front
    Warm,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let definitions = load_definitions(cli.config.as_deref())?;
    let source = build_source(&cli);
    let catalog = Catalog::new(definitions, source);

    match cli.command {
        Commands::Categories => {
            for def in catalog.definitions() {
                println!("{}\t{}", def.name, def.placeholder());
            }
            Ok(())
        }
        Commands::Search {
            category,
            query,
            first,
        } => run_search(&catalog, category, &query, first).await,
        Commands::Warm => run_warm(&catalog).await,
    }
}

async fn run_search(
    catalog: &Catalog,
    category: Option<String>,
    query: &str,
    first: bool,
) -> Result<()> {
    let mut session = JsonFileStateStore::open(default_session_path());
    let category = category
        .or_else(|| session.get(KEY_CATEGORY))
        .context("no category given and none stored from a previous search")?;

    catalog.ensure_loaded(&category).await?;
    session.set(KEY_CATEGORY, &category);
    session.set(KEY_SEARCH, query);

    if first {
        match catalog.first_match(&category, query)? {
            Some(entry) => println!("{}\t{}", entry.label, entry.href),
            None => println!("no match"),
        }
    } else {
        for (entry, visible) in catalog.filter(&category, query)? {
            if visible {
                println!("{}\t{}", entry.label, entry.href);
            }
        }
    }
    Ok(())
}

async fn run_warm(catalog: &Catalog) -> Result<()> {
    for def in catalog.definitions() {
        match catalog.ensure_loaded(&def.name).await {
            Ok(()) => tracing::info!(category = %def.name, "category_warm"),
            Err(err) => {
                tracing::warn!(category = %def.name, error = %err, "category_warm_failed");
            }
        }
    }
    Ok(())
}

fn load_definitions(path: Option<&Path>) -> Result<Vec<config::CategoryDefinition>> {
    match path {
        Some(p) => config::load_definitions(p)
            .with_context(|| format!("read category config {}", p.display())),
        None => Ok(config::default_definitions()),
    }
}

fn build_source(cli: &Cli) -> Arc<dyn IndexSource> {
    if let Some(base) = &cli.base_url {
        Arc::new(HttpSource::new(base.clone()))
    } else {
        let root = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"));
        Arc::new(DirSource::new(root))
    }
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "category-search", "category-search")
        .expect("project dirs available")
        .data_dir()
        .to_path_buf()
}

fn default_session_path() -> PathBuf {
    default_data_dir().join("session.json")
}
