//! Price refresh service
//!
//! Walks a user's cards, heals missing images, fetches current prices and
//! writes the day's snapshots. Per-card failures are logged and skipped; one
//! bad card never aborts the batch. Cards already refreshed today are
//! skipped without any network traffic, so a second pass on the same day is
//! a cheap no-op.

use std::sync::Mutex;

use rusqlite::Connection;

use crate::database::{self, Card, CardSort};
use crate::error::Result;
use crate::pricetracker::{extract_price, PriceClient, PRICE_SOURCE};
use crate::tcgdex::TcgdexClient;

/// Write the first snapshot for a freshly created card.
///
/// Returns false when the card has no cached value to snapshot.
pub fn create_initial_snapshot(conn: &Connection, card: &Card) -> Result<bool> {
    let Some(value) = card.value_usd else {
        return Ok(false);
    };

    database::upsert_snapshot(
        conn,
        card.id,
        &database::today_date(),
        value,
        PRICE_SOURCE,
        "USD",
    )?;
    Ok(true)
}

/// Refresh image and price data for all of a user's cards.
///
/// Returns the number of cards whose price was updated this pass; the count
/// may be less than the number of cards when lookups fail or prices are
/// already current.
pub async fn refresh_prices_for_user(
    db: &Mutex<Connection>,
    tcgdex: &TcgdexClient,
    prices: &PriceClient,
    owner: &str,
) -> usize {
    let today = database::today_date();

    let cards = {
        let conn = db.lock().unwrap();
        match database::list_cards(&conn, owner, CardSort::default()) {
            Ok(cards) => cards,
            Err(e) => {
                log::error!("Failed to list cards for {}: {}", owner, e);
                return 0;
            }
        }
    };

    let mut updated = 0;

    for card in cards {
        // Heal missing images (catalog API is occasionally flaky)
        let needs_image = card
            .image_url
            .as_deref()
            .is_none_or(|url| url == tcgdex.placeholder_url());
        if needs_image {
            let new_url = tcgdex
                .resolve_image(&card.name, &card.set_name, &card.card_number)
                .await;
            if new_url != tcgdex.placeholder_url()
                && card.image_url.as_deref() != Some(new_url.as_str())
            {
                let conn = db.lock().unwrap();
                if let Err(e) = database::update_card_image(&conn, card.id, &new_url) {
                    log::warn!(
                        "Failed to store healed image for {} #{}: {}",
                        card.name,
                        card.card_number,
                        e
                    );
                }
            }
        }

        // Skip if the price is already current
        if card.price_last_updated.as_deref() == Some(today.as_str()) {
            continue;
        }

        let raw = match prices.fetch_prices(&card.name, &card.set_name).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!(
                    "Fetch card price failed for {} {} #{}: {}",
                    card.name,
                    card.set_name,
                    card.card_number,
                    e
                );
                continue;
            }
        };

        let point = match extract_price(&raw, &card.card_number) {
            Ok(point) => point,
            Err(e) => {
                log::warn!(
                    "Price extract failed for {} {} #{}: {}",
                    card.name,
                    card.set_name,
                    card.card_number,
                    e
                );
                continue;
            }
        };

        {
            let conn = db.lock().unwrap();
            let stored = database::upsert_snapshot(
                &conn,
                card.id,
                &today,
                point.price,
                PRICE_SOURCE,
                "USD",
            )
            .and_then(|()| database::update_card_value(&conn, card.id, point.price, &today));

            if let Err(e) = stored {
                log::warn!(
                    "Failed to store price for {} #{}: {}",
                    card.name,
                    card.card_number,
                    e
                );
                continue;
            }
        }

        updated += 1;
    }

    updated
}
