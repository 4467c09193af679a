//! Command-line front end.
//!
//! A thin presentation layer over [`filmshelf::CatalogSession`]: it forwards
//! intents, waits for the session to settle, and prints the resulting
//! snapshot. It holds no coordination logic of its own.
//!
//! # Commands
//!
//! - `popular [--pages N]`: list popular movies
//! - `search <query> [--pages N]`: search the catalog
//! - `favorites`: list stored favorites (works offline)
//! - `toggle <id> [--query Q] [--pages N]`: add or remove a favorite

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use filmshelf::{build_session, open_store, CatalogItem, CatalogSession, Config, SessionSnapshot};

#[derive(Parser)]
#[command(name = "filmshelf")]
#[command(about = "Browse a movie catalog and keep offline favorites", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], global = true)]
    log_level: Option<String>,

    /// Print poster URLs next to each title.
    #[arg(long, global = true)]
    posters: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Popular {
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    Search {
        query: String,

        #[arg(long, default_value = "1")]
        pages: u32,
    },

    Favorites,

    Toggle {
        id: i64,

        /// Search term used to find the item when it is not a favorite yet.
        #[arg(long)]
        query: Option<String>,

        #[arg(long, default_value = "3")]
        pages: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> filmshelf::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.trace_level = level;
    }
    filmshelf::observability::init_tracing(&config);
    tracing::debug!(storage = ?config.storage, "filmshelf starting");

    match cli.command {
        Commands::Popular { pages } => {
            let mut session = build_session(&config)?;
            load_pages(&mut session, pages).await;
            print_items(&session.snapshot(), &config, cli.posters);
        }
        Commands::Search { query, pages } => {
            let mut session = build_session(&config)?;
            session.set_search_query(&query);
            session.settle().await;
            load_pages(&mut session, pages.saturating_sub(1)).await;
            print_items(&session.snapshot(), &config, cli.posters);
        }
        Commands::Favorites => {
            let store = open_store(&config)?;
            let items: Vec<CatalogItem> = store.snapshot().iter().map(|r| r.to_item()).collect();
            if items.is_empty() {
                println!("No favorites yet.");
            }
            for item in &items {
                print_item(item, true, &config, cli.posters);
            }
        }
        Commands::Toggle { id, query, pages } => {
            let mut session = build_session(&config)?;
            toggle(&mut session, id, query.as_deref(), pages).await;
        }
    }

    Ok(())
}

/// Loads up to `pages` more pages, stopping early at the end of the data.
async fn load_pages(session: &mut CatalogSession, pages: u32) {
    for _ in 0..pages {
        session.load_more();
        session.settle().await;
        if session.snapshot().end_of_data {
            break;
        }
    }
}

async fn toggle(session: &mut CatalogSession, id: i64, query: Option<&str>, pages: u32) {
    // Removing needs no network: the stored snapshot is enough.
    let stored = session
        .snapshot()
        .favorites
        .iter()
        .find(|r| r.id == id)
        .map(filmshelf::FavoriteRecord::to_item);

    let item = match stored {
        Some(item) => Some(item),
        None => {
            match query {
                Some(query) => {
                    session.set_search_query(query);
                    session.settle().await;
                    load_pages(session, pages.saturating_sub(1)).await;
                }
                None => load_pages(session, pages).await,
            }
            session.snapshot().items.into_iter().find(|item| item.id == id)
        }
    };

    let Some(item) = item else {
        println!("Movie {id} not found in the first {pages} page(s).");
        return;
    };

    session.toggle_favorite(&item);
    session.settle().await;

    if session.is_favorite(id) {
        println!("Added \"{}\" to favorites.", item.title);
    } else {
        println!("Removed \"{}\" from favorites.", item.title);
    }
}

fn print_items(snapshot: &SessionSnapshot, config: &Config, posters: bool) {
    if snapshot.items.is_empty() {
        println!("No results.");
        return;
    }
    for item in &snapshot.items {
        print_item(item, snapshot.is_favorite(item.id), config, posters);
    }
    if snapshot.end_of_data {
        println!("-- end of results --");
    }
}

fn print_item(item: &CatalogItem, favorite: bool, config: &Config, posters: bool) {
    let year = item
        .release_year()
        .map_or_else(|| "----".to_string(), |y| y.to_string());
    let marker = if favorite { "*" } else { " " };
    println!(
        "{marker} {:>8}  {year}  {:<48}  {:.1}",
        item.id, item.title, item.vote_average
    );
    if posters {
        if let Some(url) = item.poster_url(&config.image_base_url, "w500") {
            println!("            {url}");
        }
    }
}
