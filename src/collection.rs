//! Card validation and enrichment-on-save
//!
//! Create/update go through here so the storage layer stays free of network
//! side effects: choices and the per-owner duplicate invariant are validated
//! first, then the external lookups run as an explicit enrichment step, then
//! the row is written. Enrichment failures degrade (placeholder image, absent
//! price) instead of blocking the save.

use std::sync::Mutex;

use rusqlite::Connection;
use serde::Deserialize;

use crate::database::{self, Card, NewCard, CONDITIONS, LANGUAGES};
use crate::error::{Result, VaultError};
use crate::pricetracker::{extract_price, PriceClient, PricePoint};
use crate::refresh::create_initial_snapshot;
use crate::sets;
use crate::tcgdex::TcgdexClient;

/// User-submitted card fields
#[derive(Debug, Clone, Deserialize)]
pub struct CardForm {
    pub name: String,
    pub set_name: String,
    pub language: String,
    pub card_number: String,
    pub condition: String,
}

fn validate_choices(form: &CardForm) -> Result<()> {
    if !sets::is_known_set(&form.set_name) {
        return Err(VaultError::InvalidChoice {
            field: "set_name",
            value: form.set_name.clone(),
        });
    }
    if !LANGUAGES.contains(&form.language.as_str()) {
        return Err(VaultError::InvalidChoice {
            field: "language",
            value: form.language.clone(),
        });
    }
    if !CONDITIONS.contains(&form.condition.as_str()) {
        return Err(VaultError::InvalidChoice {
            field: "condition",
            value: form.condition.clone(),
        });
    }
    Ok(())
}

fn check_duplicate(
    conn: &Connection,
    owner: &str,
    form: &CardForm,
    exclude: Option<i64>,
) -> Result<()> {
    if database::duplicate_exists(
        conn,
        owner,
        &form.name,
        &form.set_name,
        &form.card_number,
        exclude,
    )? {
        return Err(VaultError::DuplicateCard {
            name: form.name.trim().to_string(),
            set_name: form.set_name.clone(),
            card_number: form.card_number.clone(),
        });
    }
    Ok(())
}

/// Create a card for the owner: validate, enrich, insert, snapshot.
///
/// The image resolves to the placeholder on any failure; a failed price
/// lookup is logged and leaves the value absent. If a price was resolved,
/// the card's first snapshot is written for today.
pub async fn create_card(
    db: &Mutex<Connection>,
    tcgdex: &TcgdexClient,
    prices: &PriceClient,
    owner: &str,
    form: &CardForm,
) -> Result<Card> {
    {
        let conn = db.lock().unwrap();
        validate_choices(form)?;
        check_duplicate(&conn, owner, form, None)?;
    }

    let name = form.name.trim();

    let image_url = tcgdex
        .resolve_image(name, &form.set_name, &form.card_number)
        .await;

    let price: Option<PricePoint> = match prices.fetch_prices(name, &form.set_name).await {
        Ok(raw) => match extract_price(&raw, &form.card_number) {
            Ok(point) => Some(point),
            Err(e) => {
                log::warn!(
                    "Price extract failed for {} {} #{}: {}",
                    name,
                    form.set_name,
                    form.card_number,
                    e
                );
                None
            }
        },
        Err(e) => {
            log::warn!(
                "Price lookup failed for {} {} #{}: {}",
                name,
                form.set_name,
                form.card_number,
                e
            );
            None
        }
    };

    let price_date = price
        .as_ref()
        .map(|p| p.price_date.format("%Y-%m-%d").to_string());

    let conn = db.lock().unwrap();
    let id = database::insert_card(
        &conn,
        &NewCard {
            owner,
            name,
            set_name: &form.set_name,
            language: &form.language,
            card_number: &form.card_number,
            condition: &form.condition,
            image_url: Some(&image_url),
            value_usd: price.as_ref().map(|p| p.price),
            price_last_updated: price_date.as_deref(),
        },
    )?;

    let card = database::get_card(&conn, owner, id)?.ok_or(VaultError::NoSuchCard(id))?;
    create_initial_snapshot(&conn, &card)?;

    Ok(card)
}

/// Edit the user-editable fields of one of the owner's cards.
///
/// Refresh-derived fields (image, value, refresh date) are untouched; the
/// duplicate check excludes the card itself.
pub fn update_card(
    conn: &Connection,
    owner: &str,
    card_id: i64,
    form: &CardForm,
) -> Result<Card> {
    validate_choices(form)?;
    check_duplicate(conn, owner, form, Some(card_id))?;

    if !database::update_card_fields(
        conn,
        owner,
        card_id,
        &form.name,
        &form.set_name,
        &form.language,
        &form.card_number,
        &form.condition,
    )? {
        return Err(VaultError::NoSuchCard(card_id));
    }

    database::get_card(conn, owner, card_id)?.ok_or(VaultError::NoSuchCard(card_id))
}

/// Delete one of the owner's cards (price history cascades)
pub fn delete_card(conn: &Connection, owner: &str, card_id: i64) -> Result<()> {
    if !database::delete_card(conn, owner, card_id)? {
        return Err(VaultError::NoSuchCard(card_id));
    }
    Ok(())
}
