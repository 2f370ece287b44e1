//! Card Vault - Pokemon TCG collection tracker
//!
//! Serves the collection JSON API over SQLite, enriching cards with images
//! and market prices from the external catalog and pricing services.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use card_vault::{refresh, web, Config, PriceClient, TcgdexClient};
use clap::Parser;
use rusqlite::Connection;

/// Card vault server - tracks owned cards with images and daily market prices
#[derive(Parser, Debug)]
#[command(name = "card_vault")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Port for the JSON API
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Run one refresh pass for this user and exit (default: serve the API)
    #[arg(long)]
    refresh_user: Option<String>,
}

/// Returns the default database path: ~/.local/share/card_vault/vault.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card_vault")
        .join("vault.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Starting card_vault...");
    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = match Connection::open(&db_path) {
        Ok(conn) => {
            log::info!("Opened database: {}", db_path.display());
            conn
        }
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = card_vault::init_schema(&conn) {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    let config = Config::from_env();
    if config.price_api_token.is_none() {
        log::warn!("PRICE_API_TOKEN is not set; price lookups will be skipped");
    }

    let tcgdex = TcgdexClient::new(&config);
    let prices = PriceClient::new(&config);
    let db = Arc::new(Mutex::new(conn));

    if let Some(owner) = args.refresh_user {
        let updated = refresh::refresh_prices_for_user(&db, &tcgdex, &prices, &owner).await;
        log::info!("Refreshed prices for {}: {} card(s) updated", owner, updated);
        return;
    }

    if let Err(e) = web::serve(db, tcgdex, prices, args.port).await {
        log::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
