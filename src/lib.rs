//! Card Vault - Pokemon TCG collection tracker
//!
//! Tracks owned cards in SQLite, enriches them with images from the TCGdex
//! catalog and market prices from the price tracker API, and keeps a dated
//! price history per card for charting collection value over time.

pub mod collection;
pub mod config;
pub mod database;
pub mod error;
pub mod pricetracker;
pub mod refresh;
pub mod sets;
pub mod tcgdex;
pub mod util;
pub mod web;

pub use config::Config;
pub use database::init_schema;
pub use error::{Result, VaultError};
pub use pricetracker::{PriceClient, PricePoint};
pub use refresh::refresh_prices_for_user;
pub use tcgdex::TcgdexClient;
pub use util::pad_card_number;
