//! Error types for card_vault operations

use thiserror::Error;

/// Unified error type for card_vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse a JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP error status code from an external API
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No price code mapping exists for this set name
    #[error("Unknown set: {0}")]
    UnknownSet(String),

    /// The pricing API credential is not configured
    #[error("Price API token is not configured")]
    MissingApiToken,

    /// The pricing API response carried no data payload
    #[error("No data received from price API")]
    NoPriceData,

    /// No entry in the pricing response matched the padded card number
    #[error("Card number {0} not found")]
    CardNotFound(String),

    /// A card with the same name/set/number already exists for this user
    #[error("This card already exists ({name} {set_name} #{card_number})")]
    DuplicateCard {
        name: String,
        set_name: String,
        card_number: String,
    },

    /// A field value is outside its fixed choice list
    #[error("Invalid {field}: {value}")]
    InvalidChoice { field: &'static str, value: String },

    /// No card with this id belongs to the requesting user
    #[error("No such card: {0}")]
    NoSuchCard(i64),
}

/// Result alias for card_vault operations
pub type Result<T> = std::result::Result<T, VaultError>;
