//! Runtime configuration
//!
//! External service endpoints and the pricing credential are resolved once at
//! startup and injected into the clients at construction. The price API token
//! is optional here so the rest of the app keeps working without it; the
//! price client refuses to fetch until one is configured.

use std::env;

/// Default TCGdex catalog endpoint (no credential required)
pub const TCGDEX_API_URL: &str = "https://api.tcgdex.net";

/// Default pricing API endpoint (requires a bearer token)
pub const PRICE_API_URL: &str = "https://www.pokemonpricetracker.com";

/// Fallback image shown when no real card image can be resolved
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://static.card-vault.app/images/card-placeholder.png";

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the image catalog API
    pub tcgdex_url: String,
    /// Base URL of the pricing API
    pub price_api_url: String,
    /// Bearer token for the pricing API, if configured
    pub price_api_token: Option<String>,
    /// Placeholder image URL used when resolution fails
    pub placeholder_image_url: String,
}

impl Config {
    /// Build configuration from environment variables, with defaults for
    /// everything except the pricing credential.
    ///
    /// - `TCGDEX_API_URL`
    /// - `PRICE_API_URL`
    /// - `PRICE_API_TOKEN`
    /// - `CARD_IMAGE_PLACEHOLDER_URL`
    pub fn from_env() -> Self {
        Self {
            tcgdex_url: env_or("TCGDEX_API_URL", TCGDEX_API_URL),
            price_api_url: env_or("PRICE_API_URL", PRICE_API_URL),
            price_api_token: env::var("PRICE_API_TOKEN").ok().filter(|t| !t.is_empty()),
            placeholder_image_url: env_or("CARD_IMAGE_PLACEHOLDER_URL", PLACEHOLDER_IMAGE_URL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcgdex_url: TCGDEX_API_URL.to_string(),
            price_api_url: PRICE_API_URL.to_string(),
            price_api_token: None,
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
