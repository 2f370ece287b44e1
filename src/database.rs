//! Database operations for the card vault
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Dates are stored as ISO `YYYY-MM-DD` text. The snapshot table's composite
//! primary key `(card_id, as_of_date)` is what guarantees at most one price
//! snapshot per card per day; writes go through `upsert_snapshot` so a
//! same-day re-write updates the existing row instead of failing.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Condition codes in grading order
pub const CONDITIONS: &[&str] = &["M", "NM", "LP", "MP", "HP", "D"];

/// Supported language codes
pub const LANGUAGES: &[&str] = &["EN", "JP", "FR", "DE"];

/// An owned card row
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub set_name: String,
    pub language: String,
    pub card_number: String,
    pub condition: String,
    pub image_url: Option<String>,
    pub value_usd: Option<f64>,
    /// ISO date of the last successful price refresh
    pub price_last_updated: Option<String>,
}

/// Fields for a card insert
#[derive(Debug, Clone)]
pub struct NewCard<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub set_name: &'a str,
    pub language: &'a str,
    pub card_number: &'a str,
    pub condition: &'a str,
    pub image_url: Option<&'a str>,
    pub value_usd: Option<f64>,
    pub price_last_updated: Option<&'a str>,
}

/// One point of the collection value series
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub total: f64,
}

/// Sort orders for the card list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSort {
    ValueAsc,
    #[default]
    ValueDesc,
    SetAsc,
    SetDesc,
}

impl CardSort {
    /// Parse a `sort` query parameter, defaulting to most-valuable-first
    pub fn from_param(param: &str) -> Self {
        match param {
            "value_asc" => CardSort::ValueAsc,
            "value_desc" => CardSort::ValueDesc,
            "set_asc" => CardSort::SetAsc,
            "set_desc" => CardSort::SetDesc,
            _ => CardSort::default(),
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            CardSort::ValueAsc => "value_usd ASC, name ASC",
            CardSort::ValueDesc => "value_usd DESC, name ASC",
            CardSort::SetAsc => "set_name ASC, card_number ASC",
            CardSort::SetDesc => "set_name DESC, card_number ASC",
        }
    }
}

/// Initialize the database schema
///
/// Creates tables if they don't exist:
/// - `cards`: owned card records, one owner per card
/// - `price_snapshots`: dated price history, one row per card per day
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY,
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            set_name TEXT NOT NULL,
            language TEXT NOT NULL,
            card_number TEXT NOT NULL,
            condition TEXT NOT NULL,
            image_url TEXT,
            value_usd REAL,
            price_last_updated TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_cards_owner ON cards(owner);

        -- Composite primary key: (card_id, as_of_date) ensures one snapshot
        -- per card per day
        CREATE TABLE IF NOT EXISTS price_snapshots (
            card_id INTEGER NOT NULL,
            as_of_date TEXT NOT NULL,
            price REAL NOT NULL,
            source TEXT NOT NULL,
            currency TEXT NOT NULL DEFAULT 'USD',
            inserted_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (card_id, as_of_date),
            FOREIGN KEY (card_id) REFERENCES cards(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_snapshots_date ON price_snapshots(as_of_date);
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// Today's date as an ISO `YYYY-MM-DD` string (host-local calendar)
pub fn today_date() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        set_name: row.get(3)?,
        language: row.get(4)?,
        card_number: row.get(5)?,
        condition: row.get(6)?,
        image_url: row.get(7)?,
        value_usd: row.get(8)?,
        price_last_updated: row.get(9)?,
    })
}

const CARD_COLUMNS: &str = "id, owner, name, set_name, language, card_number, condition, \
                            image_url, value_usd, price_last_updated";

/// Insert a card and return its id. The name is trimmed on save.
pub fn insert_card(conn: &Connection, card: &NewCard<'_>) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO cards
         (owner, name, set_name, language, card_number, condition,
          image_url, value_usd, price_last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            card.owner,
            card.name.trim(),
            card.set_name,
            card.language,
            card.card_number,
            card.condition,
            card.image_url,
            card.value_usd,
            card.price_last_updated,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch one of the owner's cards by id
pub fn get_card(conn: &Connection, owner: &str, card_id: i64) -> DbResult<Option<Card>> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1 AND owner = ?2"),
        params![card_id, owner],
        row_to_card,
    )
    .optional()
}

/// List all of the owner's cards in the requested order
pub fn list_cards(conn: &Connection, owner: &str, sort: CardSort) -> DbResult<Vec<Card>> {
    let sql = format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE owner = ?1 ORDER BY {}",
        sort.order_clause()
    );
    let mut stmt = conn.prepare(&sql)?;
    let cards: DbResult<Vec<Card>> = stmt.query_map(params![owner], row_to_card)?.collect();
    cards
}

/// Whether another card with the same (name, set, number) triple exists for
/// this owner, compared case-insensitively. `exclude` skips the card being
/// edited.
pub fn duplicate_exists(
    conn: &Connection,
    owner: &str,
    name: &str,
    set_name: &str,
    card_number: &str,
    exclude: Option<i64>,
) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards
         WHERE owner = ?1
           AND name = ?2 COLLATE NOCASE
           AND set_name = ?3 COLLATE NOCASE
           AND card_number = ?4 COLLATE NOCASE
           AND (?5 IS NULL OR id <> ?5)",
        params![owner, name.trim(), set_name, card_number, exclude],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Update the user-editable fields of a card. Returns false when the card
/// does not exist or belongs to someone else.
pub fn update_card_fields(
    conn: &Connection,
    owner: &str,
    card_id: i64,
    name: &str,
    set_name: &str,
    language: &str,
    card_number: &str,
    condition: &str,
) -> DbResult<bool> {
    let changed = conn.execute(
        "UPDATE cards
         SET name = ?1, set_name = ?2, language = ?3, card_number = ?4, condition = ?5
         WHERE id = ?6 AND owner = ?7",
        params![
            name.trim(),
            set_name,
            language,
            card_number,
            condition,
            card_id,
            owner
        ],
    )?;
    Ok(changed > 0)
}

/// Store a newly resolved image URL on a card
pub fn update_card_image(conn: &Connection, card_id: i64, image_url: &str) -> DbResult<()> {
    conn.execute(
        "UPDATE cards SET image_url = ?1 WHERE id = ?2",
        params![image_url, card_id],
    )?;
    Ok(())
}

/// Store a freshly fetched market value and its refresh date on a card
pub fn update_card_value(
    conn: &Connection,
    card_id: i64,
    value_usd: f64,
    refreshed_on: &str,
) -> DbResult<()> {
    conn.execute(
        "UPDATE cards SET value_usd = ?1, price_last_updated = ?2 WHERE id = ?3",
        params![value_usd, refreshed_on, card_id],
    )?;
    Ok(())
}

/// Delete one of the owner's cards. Snapshot history goes with it via the
/// cascade. Returns false when nothing matched.
pub fn delete_card(conn: &Connection, owner: &str, card_id: i64) -> DbResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM cards WHERE id = ?1 AND owner = ?2",
        params![card_id, owner],
    )?;
    Ok(deleted > 0)
}

/// Insert or update the price snapshot for (card, date)
pub fn upsert_snapshot(
    conn: &Connection,
    card_id: i64,
    as_of_date: &str,
    price: f64,
    source: &str,
    currency: &str,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO price_snapshots (card_id, as_of_date, price, source, currency)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(card_id, as_of_date) DO UPDATE SET
             price = excluded.price,
             source = excluded.source,
             currency = excluded.currency",
        params![card_id, as_of_date, price, source, currency],
    )?;
    Ok(())
}

/// Number of snapshots stored for (card, date) — 0 or 1 by construction
pub fn snapshot_count(conn: &Connection, card_id: i64, as_of_date: &str) -> DbResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM price_snapshots WHERE card_id = ?1 AND as_of_date = ?2",
        params![card_id, as_of_date],
        |row| row.get(0),
    )
}

/// Sum of the cached values across the owner's collection
pub fn total_collection_value(conn: &Connection, owner: &str) -> DbResult<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(value_usd), 0) FROM cards WHERE owner = ?1",
        params![owner],
        |row| row.get(0),
    )
}

/// Collection value over time: snapshot prices summed per date, ascending,
/// optionally bounded below by `since` (inclusive)
pub fn collection_value_series(
    conn: &Connection,
    owner: &str,
    since: Option<&str>,
) -> DbResult<Vec<SeriesPoint>> {
    let mut stmt = conn.prepare(
        "SELECT s.as_of_date, SUM(s.price)
         FROM price_snapshots s
         JOIN cards c ON c.id = s.card_id
         WHERE c.owner = ?1
           AND (?2 IS NULL OR s.as_of_date >= ?2)
         GROUP BY s.as_of_date
         ORDER BY s.as_of_date ASC",
    )?;

    let points: DbResult<Vec<SeriesPoint>> = stmt
        .query_map(params![owner, since], |row| {
            Ok(SeriesPoint {
                date: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect();
    points
}
