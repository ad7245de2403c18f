// src/main.rs
mod downloader;
mod extractors;
mod storage;
mod utils;
mod wiki;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use extractors::{PeopleRoster, PiProfile};
use storage::StorageManager;
use utils::AppError;
use wiki::{Page, WikiClient};

const DEFAULT_BASE_URL: &str = "https://sbl.csie.org/JuanLab";

// DokuWiki page ids the site content lives under.
const START_PAGE: &str = "start";
const MEMBERS_PAGE: &str = "members:start";
const PI_PAGE: &str = "PI:Hsueh-Fen Juan";

/// Command Line Interface for the Juan Lab wiki scraper
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the wiki into JSON content files
    Scrape {
        /// Base URL of the DokuWiki installation
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Output directory for the JSON content files
        #[arg(short, long, default_value = "./content")]
        output_dir: String,

        /// Delay between page requests, in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Debug mode - save each fetched page's raw HTML
        #[arg(short, long)]
        debug: bool,
    },
    /// Download the images listed in a scraped manifest
    DownloadImages {
        /// Path to the images_manifest.json produced by scrape
        #[arg(long, default_value = "./content/images_manifest.json")]
        manifest: PathBuf,

        /// Directory the images are organized into, by category
        #[arg(long, default_value = "./public/images")]
        images_dir: PathBuf,

        /// Delay between image requests, in milliseconds
        #[arg(long, default_value = "500")]
        delay_ms: u64,

        /// Skip writing WebP copies of JPEG/PNG images
        #[arg(long)]
        skip_webp: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments and dispatch
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            base_url,
            output_dir,
            delay_ms,
            debug,
        } => scrape(&base_url, &output_dir, delay_ms, debug).await,
        Commands::DownloadImages {
            manifest,
            images_dir,
            delay_ms,
            skip_webp,
        } => download_images(&manifest, &images_dir, delay_ms, !skip_webp).await,
    }
}

async fn scrape(
    base_url: &str,
    output_dir: &str,
    delay_ms: u64,
    debug: bool,
) -> Result<(), AppError> {
    tracing::info!("Juan Lab DokuWiki content scraper");
    tracing::info!("Base URL: {}", base_url);
    tracing::info!("Output: {}", output_dir);

    // 1. Initialize the collaborators
    let client = WikiClient::new(base_url, delay_ms)?;
    let storage = StorageManager::new(output_dir)?;

    let mut all_images = Vec::new();

    // 2. Start page: news, research highlights, projects.
    // A failed topic degrades to its empty default so the output set stays
    // complete and schema-valid for the site build.
    tracing::info!("[1/4] Fetching start page...");
    let mut news = Vec::new();
    let mut highlights = Vec::new();
    let mut projects = Vec::new();
    match fetch_and_parse(&client, &storage, START_PAGE, debug).await {
        Some(page) => {
            let nodes = page.content_nodes();
            news = extractors::extract_news(&nodes, client.base_url());
            highlights = extractors::extract_research_highlights(&nodes, client.base_url());
            projects = extractors::extract_research_projects(&nodes);
            all_images.extend(extractors::extract_image_urls(&page, client.base_url()));
        }
        None => {
            tracing::error!("Start page unavailable; news, research and projects stay empty")
        }
    }
    storage.save_news(&news)?;
    storage.save_research(&highlights)?;
    storage.save_projects(&projects)?;

    // 3. Members page: the people roster
    tracing::info!("[2/4] Fetching members page...");
    let mut roster = PeopleRoster::default();
    match fetch_and_parse(&client, &storage, MEMBERS_PAGE, debug).await {
        Some(page) => {
            let nodes = page.content_nodes();
            roster = extractors::extract_people(&nodes, client.base_url());
            all_images.extend(extractors::extract_image_urls(&page, client.base_url()));
        }
        None => tracing::warn!("Members page unavailable; roster stays empty"),
    }
    storage.save_people(&roster)?;

    // 4. PI page: the profile
    tracing::info!("[3/4] Fetching PI page...");
    let mut profile = PiProfile::default();
    match fetch_and_parse(&client, &storage, PI_PAGE, debug).await {
        Some(page) => {
            let nodes = page.content_nodes();
            profile = extractors::extract_pi_profile(&nodes, client.base_url());
            all_images.extend(extractors::extract_image_urls(&page, client.base_url()));
        }
        None => tracing::warn!("PI page unavailable; profile keeps its identity defaults"),
    }
    storage.save_pi(&profile)?;

    // 5. Merge the per-page image references into one manifest
    tracing::info!("[4/4] Building images manifest...");
    let images = extractors::dedup_by_url(all_images);
    storage.save_images_manifest(&images)?;

    // 6. Run summary
    tracing::info!("Extraction complete:");
    tracing::info!("  news items: {}", news.len());
    tracing::info!("  research highlights: {}", highlights.len());
    tracing::info!("  projects: {}", projects.len());
    tracing::info!("  people: {}", roster.total());
    for (category, members) in roster.categories() {
        if !members.is_empty() {
            tracing::info!("    {}: {}", category, members.len());
        }
    }
    tracing::info!("  unique images: {}", images.len());

    Ok(())
}

/// Fetches and parses one wiki page. Failures are logged and mapped to
/// `None` so each topic can fall back to its empty default.
async fn fetch_and_parse(
    client: &WikiClient,
    storage: &StorageManager,
    page_id: &str,
    debug: bool,
) -> Option<Page> {
    match client.fetch_page(page_id).await {
        Ok(html) => {
            if debug {
                if let Err(e) = storage.save_debug_html(page_id, &html) {
                    tracing::warn!("Could not save raw HTML for '{}': {}", page_id, e);
                }
            }
            Some(Page::parse(&html))
        }
        Err(e) => {
            tracing::error!("Failed to fetch page '{}': {}", page_id, e);
            None
        }
    }
}

async fn download_images(
    manifest: &Path,
    images_dir: &Path,
    delay_ms: u64,
    create_webp: bool,
) -> Result<(), AppError> {
    tracing::info!("Juan Lab image downloader");

    let stats = downloader::run(manifest, images_dir, delay_ms, create_webp).await?;

    tracing::info!("Download complete:");
    tracing::info!("  downloaded: {}", stats.downloaded);
    tracing::info!("  skipped (existing): {}", stats.skipped);
    tracing::info!("  failed: {}", stats.failed);

    Ok(())
}
