//! Pricing API client and price extraction
//!
//! Fetching and extraction are split: `fetch_prices` talks to the provider
//! and returns the raw JSON payload, `extract_price` picks the matching
//! entry out of it. The split keeps the matching/parsing logic testable
//! without a network.
//!
//! Provider contract: `GET /api/prices?setId=<code>&name=<card name>` with a
//! bearer token, responding with
//! `{"data": [{"name", "cardNumber": "001/165", "prices": {"market",
//! "lastUpdated"}}]}`. Entries are matched by padded-number prefix on the
//! `cardNumber` field.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::sets;
use crate::util::pad_card_number;

const USER_AGENT: &str = "card_vault/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source label written into price snapshots
pub const PRICE_SOURCE: &str = "pokemonpricetracker";

/// A price observation extracted from a provider response
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub price_date: NaiveDate,
}

/// Client for the pricing API (bearer credential required)
#[derive(Debug, Clone)]
pub struct PriceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PriceClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.price_api_url.clone(),
            token: config.price_api_token.clone(),
        }
    }

    /// Fetch the raw price payload for a card name within a set.
    ///
    /// Refuses to fetch without a configured token, and maps an unmapped set
    /// name to `UnknownSet` before any network traffic happens.
    pub async fn fetch_prices(&self, card_name: &str, set_name: &str) -> Result<Value> {
        let set_code = sets::price_code(set_name)
            .ok_or_else(|| VaultError::UnknownSet(set_name.to_string()))?;
        let token = self.token.as_deref().ok_or(VaultError::MissingApiToken)?;

        let url = format!(
            "{}/api/prices?setId={}&name={}",
            self.base_url,
            set_code,
            urlencoding::encode(card_name)
        );

        log::debug!("Fetching prices for {} from set {}", card_name, set_code);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaultError::HttpStatus(response.status()));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Extract the price and date for a card number from a raw price payload.
///
/// Scans `data` for the first entry whose `cardNumber` starts with the
/// zero-padded target number (provider numbers look like `"058/165"`).
/// Malformed entries are skipped rather than aborting the scan.
pub fn extract_price(raw: &Value, card_number: &str) -> Result<PricePoint> {
    let data = raw
        .get("data")
        .and_then(Value::as_array)
        .ok_or(VaultError::NoPriceData)?;

    let padded = pad_card_number(card_number);

    for entry in data {
        let Some(number) = entry.get("cardNumber").and_then(Value::as_str) else {
            continue;
        };
        if !number.starts_with(&padded) {
            continue;
        }

        let Some(prices) = entry.get("prices") else {
            continue;
        };
        let Some(market) = prices.get("market").and_then(Value::as_f64) else {
            continue;
        };
        let Some(date) = prices
            .get("lastUpdated")
            .and_then(Value::as_str)
            .and_then(parse_price_date)
        else {
            continue;
        };

        return Ok(PricePoint {
            price: market,
            price_date: date,
        });
    }

    Err(VaultError::CardNotFound(padded))
}

/// Truncate an ISO-8601 timestamp to its date component
fn parse_price_date(timestamp: &str) -> Option<NaiveDate> {
    let date_part = timestamp.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[path = "pricetracker_tests.rs"]
mod http_tests;
