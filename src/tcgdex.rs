//! TCGdex catalog client for resolving card images
//!
//! Image resolution never fails from the caller's point of view: any lookup
//! problem (unmapped set, network error, no matching card, card without an
//! image asset) falls back to the configured placeholder URL.

use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::sets;
use crate::util::pad_card_number;

const USER_AGENT: &str = "card_vault/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TCGdex card list entry
///
/// The list endpoint returns a compact shape: the card identifier
/// (`<set code>-<number>`), the display name, and optionally the image asset
/// base URL (quality suffix appended by the client).
#[derive(Debug, Deserialize, Clone)]
pub struct TcgdexCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Client for the TCGdex catalog API (no credential required)
#[derive(Debug, Clone)]
pub struct TcgdexClient {
    client: reqwest::Client,
    base_url: String,
    placeholder_url: String,
}

impl TcgdexClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.tcgdex_url.clone(),
            placeholder_url: config.placeholder_image_url.clone(),
        }
    }

    /// The configured placeholder image URL
    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    /// Resolve the image URL for a card, or the placeholder.
    ///
    /// This is the only entry point callers use; it logs failures and always
    /// returns a usable URL.
    pub async fn resolve_image(
        &self,
        card_name: &str,
        set_name: &str,
        card_number: &str,
    ) -> String {
        let Some(image_code) = sets::image_code(set_name) else {
            log::debug!("No image code mapping for set {}", set_name);
            return self.placeholder_url.clone();
        };

        match self.find_image(card_name, image_code, card_number).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                log::warn!(
                    "Image missing from catalog for {} | {} | #{}",
                    card_name,
                    set_name,
                    card_number
                );
                self.placeholder_url.clone()
            }
            Err(e) => {
                log::warn!(
                    "Image fetch failed for {} | {} | #{}: {}",
                    card_name,
                    set_name,
                    card_number,
                    e
                );
                self.placeholder_url.clone()
            }
        }
    }

    /// Query the catalog by name and pick the matching card's image URL.
    ///
    /// Candidates are narrowed to the set by id prefix, then matched on the
    /// zero-padded card number: an exact `<code>-<number>` id wins, with a
    /// `-<number>` suffix match as fallback. Cards without an image asset
    /// are discarded.
    async fn find_image(
        &self,
        card_name: &str,
        image_code: &str,
        card_number: &str,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/v2/en/cards?name={}",
            self.base_url,
            urlencoding::encode(card_name)
        );

        log::debug!("Fetching card candidates from TCGdex: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaultError::HttpStatus(response.status()));
        }

        let cards: Vec<TcgdexCard> = response.json().await?;

        let code = image_code.to_lowercase();
        let padded = pad_card_number(card_number);
        let set_prefix = format!("{}-", code);

        let in_set: Vec<TcgdexCard> = cards
            .into_iter()
            .filter(|c| c.id.to_lowercase().starts_with(&set_prefix))
            .collect();

        let exact_id = format!("{}-{}", code, padded);
        let number_suffix = format!("-{}", padded);

        let mut matches: Vec<&TcgdexCard> = in_set
            .iter()
            .filter(|c| c.id.to_lowercase() == exact_id)
            .collect();
        if matches.is_empty() {
            matches = in_set
                .iter()
                .filter(|c| c.id.to_lowercase().ends_with(&number_suffix))
                .collect();
        }

        // The list endpoint's image field is an asset base; the quality
        // suffix selects the actual file.
        Ok(matches
            .into_iter()
            .find_map(|c| c.image.as_ref().map(|img| format!("{}/high.png", img))))
    }
}

#[cfg(test)]
#[path = "tcgdex_tests.rs"]
mod tests;
