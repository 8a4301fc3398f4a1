mod config;

use std::{
    io::{self, BufRead},
    sync::Arc,
};

use anyhow::Result;
use catalog_client::{can_go_previous, CatalogClient, CatalogEvent, CatalogSession, PaginationStore};
use clap::Parser;
use shared::domain::CatalogItem;
use storage::Storage;

#[derive(Parser, Debug)]
struct Args {
    /// Catalog API base URL, e.g. https://pokeapi.co/api/v2
    #[arg(long)]
    api_url: Option<String>,
    /// SQLite database URL holding UI state across restarts
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }

    let storage = Storage::new(&settings.database_url).await?;
    storage.health_check().await?;

    let fetcher = Arc::new(CatalogClient::new(settings.api_base_url)?);
    let pages = PaginationStore::new(Arc::new(storage));
    let session = CatalogSession::new(fetcher, pages);

    let mut events = session.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                CatalogEvent::PageLoading { page } => println!("Loading page {page}..."),
                CatalogEvent::PageLoaded { page, items } => {
                    println!("--- Page {page} ---");
                    if items.is_empty() {
                        println!("(no entries on this page)");
                    }
                    for (index, item) in items.iter().enumerate() {
                        print_item(index, item);
                    }
                }
                CatalogEvent::FetchFailed { page, message } => {
                    println!("Page {page}: {message}");
                }
                CatalogEvent::ItemsUpdated { items } => {
                    for (index, item) in items.iter().enumerate() {
                        print_item(index, item);
                    }
                }
            }
        }
    });

    let page = session.start().await;
    println!(
        "Starting at page {page}. Commands: n(ext), p(revious), m <index> = more moves, \
         l <index> = fewer moves, r(eload), q(uit)"
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("n") => {
                if let Err(err) = session.next_page().await {
                    println!("Failed to advance page: {err:#}");
                }
            }
            Some("p") => {
                if can_go_previous(session.current_page().await) {
                    if let Err(err) = session.previous_page().await {
                        println!("Failed to go back a page: {err:#}");
                    }
                } else {
                    println!("Already at the first page.");
                }
            }
            Some("m") => {
                if let Some(index) = parse_index(parts.next()) {
                    session.set_moves_expanded(index, true).await;
                }
            }
            Some("l") => {
                if let Some(index) = parse_index(parts.next()) {
                    session.set_moves_expanded(index, false).await;
                }
            }
            Some("r") => {
                session.reload().await;
            }
            Some("q") => break,
            Some(other) => println!("Unknown command: {other}"),
            None => {}
        }
    }

    printer.abort();
    Ok(())
}

fn parse_index(raw: Option<&str>) -> Option<usize> {
    match raw.and_then(|raw| raw.parse::<usize>().ok()) {
        Some(index) => Some(index),
        None => {
            println!("Expected an item index, e.g. `m 0`.");
            None
        }
    }
}

fn print_item(index: usize, item: &CatalogItem) {
    let moves = item.visible_moves().join(", ");
    let hidden = item.hidden_move_count();
    let image = item.image_url.as_deref().unwrap_or("no image");
    if hidden > 0 {
        println!(
            "[{index}] #{} {} ({image}) moves: {moves} (+{hidden} more)",
            item.id.0, item.name
        );
    } else {
        println!(
            "[{index}] #{} {} ({image}) moves: {moves}",
            item.id.0, item.name
        );
    }
}
