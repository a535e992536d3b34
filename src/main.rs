use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use listing_browser::dom::{EventTarget, Region};
use listing_browser::search::PageDirection;
use listing_browser::{AppConfig, DetailController, HttpPropertyApi, PropertyApi, SearchController};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "listing-browser")]
#[command(about = "Drive the listings home and detail pages against a live backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type a query into the location field and show the suggestion panel
    Suggest {
        query: String,
    },

    /// Search a location with the search button
    Search {
        location: String,

        /// Press Next until this page is reached
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Open a property's detail page
    Detail {
        id: i64,

        /// Click the thumbnail at this index after loading
        #[arg(short, long)]
        select: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_browser=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    info!("Using backend at {}", config.api_base_url);

    let api: Arc<dyn PropertyApi> = Arc::new(HttpPropertyApi::new(&config)?);

    match cli.command {
        Commands::Suggest { query } => suggest(api, &config, &query).await,
        Commands::Search { location, page } => search(api, &config, &location, page).await,
        Commands::Detail { id, select } => detail(api, id, select).await,
    }
}

async fn suggest(api: Arc<dyn PropertyApi>, config: &AppConfig, query: &str) -> Result<()> {
    let controller = SearchController::new(api, config);
    controller.on_input(query);

    let deadline = config.debounce + config.request_timeout;
    tokio::time::timeout(deadline, async {
        while !controller.is_idle() {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .context("Timed out waiting for suggestions")?;

    let page = controller.page();
    if page.suggestions_open() {
        for suggestion in &page.visible_suggestions {
            println!("{}", suggestion.name);
        }
    } else {
        println!("(no suggestions)");
    }
    print_region(&page.suggestions);
    Ok(())
}

async fn search(api: Arc<dyn PropertyApi>, config: &AppConfig, location: &str, page: u32) -> Result<()> {
    let controller = SearchController::new(api, config);
    controller.on_input(location);
    controller.on_search_click().await;

    while controller.session().current_page() < page {
        let before = controller.session().current_page();
        controller.on_paginate(PageDirection::Next).await;
        if controller.session().current_page() == before {
            info!("No page after {}", before);
            break;
        }
    }

    let view = controller.page();
    println!("{}", html_text(view.meta.html()));
    print_region(&view.results);
    print_region(&view.pagination);
    Ok(())
}

async fn detail(api: Arc<dyn PropertyApi>, id: i64, select: Option<usize>) -> Result<()> {
    let controller = DetailController::new(api, id);
    controller.init().await;

    if let Some(index) = select {
        let rendered = controller.detail();
        let selector = format!(".gallery-thumb[data-index=\"{index}\"]");
        let target = EventTarget::locate(rendered.html(), &selector)?
            .with_context(|| format!("No thumbnail at index {index}"))?
            .inside(rendered.element());
        controller.on_click(&target);
    }

    print_region(&controller.detail());
    Ok(())
}

fn print_region(region: &Region) {
    println!("--- #{} ---", region.id());
    println!("{}", region.html().trim());
}

fn html_text(markup: &str) -> String {
    scraper::Html::parse_fragment(markup)
        .root_element()
        .text()
        .collect()
}
