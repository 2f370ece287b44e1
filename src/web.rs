//! JSON API for the card vault
//!
//! Authentication itself lives in front of this process; whatever sits there
//! (reverse proxy, gateway) asserts the caller's identity in the
//! `x-vault-user` header. Requests without it are rejected, and every store
//! operation is scoped to that owner.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Days;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::collection::{self, CardForm};
use crate::database::{self, Card, CardSort, SeriesPoint};
use crate::error::VaultError;
use crate::pricetracker::PriceClient;
use crate::refresh::refresh_prices_for_user;
use crate::tcgdex::TcgdexClient;

/// Header carrying the authenticated identity, set by the auth layer in front
const USER_HEADER: &str = "x-vault-user";

/// Shared application state (thread-safe database connection + API clients)
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub tcgdex: TcgdexClient,
    pub prices: PriceClient,
}

/// API response wrapper
#[derive(Serialize, Debug)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

type ApiError = (StatusCode, Json<ApiResponse<()>>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
}

fn vault_error(e: VaultError) -> ApiError {
    let status = match &e {
        VaultError::DuplicateCard { .. } | VaultError::InvalidChoice { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        VaultError::NoSuchCard(_) => StatusCode::NOT_FOUND,
        VaultError::Database(_) => {
            log::error!("Database error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    api_error(status, e.to_string())
}

/// Extract the authenticated owner from the request headers
fn owner_from(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Missing authenticated user"))
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    sort: String,
}

/// Card list plus the collection's current cached total
#[derive(Serialize)]
struct CardListData {
    cards: Vec<Card>,
    total_value_usd: f64,
}

/// GET /api/cards?sort={value_asc|value_desc|set_asc|set_desc}
async fn list_cards_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<CardListData>>, ApiError> {
    let owner = owner_from(&headers)?;
    let conn = state.db.lock().unwrap();

    let cards = database::list_cards(&conn, &owner, CardSort::from_param(&params.sort))
        .map_err(|e| vault_error(e.into()))?;
    let total_value_usd =
        database::total_collection_value(&conn, &owner).map_err(|e| vault_error(e.into()))?;

    Ok(ApiResponse::ok(CardListData {
        cards,
        total_value_usd,
    }))
}

/// POST /api/cards
async fn create_card_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<CardForm>,
) -> Result<(StatusCode, Json<ApiResponse<Card>>), ApiError> {
    let owner = owner_from(&headers)?;

    let card = collection::create_card(&state.db, &state.tcgdex, &state.prices, &owner, &form)
        .await
        .map_err(vault_error)?;

    Ok((StatusCode::CREATED, ApiResponse::ok(card)))
}

/// PUT /api/cards/{id}
async fn update_card_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(card_id): Path<i64>,
    Json(form): Json<CardForm>,
) -> Result<Json<ApiResponse<Card>>, ApiError> {
    let owner = owner_from(&headers)?;
    let conn = state.db.lock().unwrap();

    let card = collection::update_card(&conn, &owner, card_id, &form).map_err(vault_error)?;
    Ok(ApiResponse::ok(card))
}

/// DELETE /api/cards/{id}
async fn delete_card_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(card_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let owner = owner_from(&headers)?;
    let conn = state.db.lock().unwrap();

    collection::delete_card(&conn, &owner, card_id).map_err(vault_error)?;
    Ok(ApiResponse::ok(()))
}

#[derive(Serialize)]
struct RefreshResult {
    updated: usize,
}

/// POST /api/refresh-prices
async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let owner = owner_from(&headers)?;

    let updated =
        refresh_prices_for_user(&state.db, &state.tcgdex, &state.prices, &owner).await;

    Ok(ApiResponse::ok(RefreshResult { updated }))
}

#[derive(Deserialize)]
struct SeriesParams {
    #[serde(default)]
    range: String,
}

/// Lower bound for a range parameter, `None` meaning the full history.
/// Unrecognized values fall back to the 30-day default.
fn range_cutoff(range: &str, today: chrono::NaiveDate) -> Option<String> {
    let days = match range {
        "all" => return None,
        "90d" => 90,
        "1y" => 365,
        _ => 30,
    };
    today
        .checked_sub_days(Days::new(days))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// GET /api/collection-value-series?range={30d|90d|1y|all}
async fn series_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SeriesParams>,
) -> Result<Json<ApiResponse<Vec<SeriesPoint>>>, ApiError> {
    let owner = owner_from(&headers)?;

    let since = range_cutoff(&params.range, chrono::Local::now().date_naive());

    let conn = state.db.lock().unwrap();
    let series = database::collection_value_series(&conn, &owner, since.as_deref())
        .map_err(|e| vault_error(e.into()))?;

    Ok(ApiResponse::ok(series))
}

/// Build the API router
pub fn create_router(db: Arc<Mutex<Connection>>, tcgdex: TcgdexClient, prices: PriceClient) -> Router {
    let state = AppState { db, tcgdex, prices };

    Router::new()
        .route("/api/cards", get(list_cards_handler))
        .route("/api/cards", post(create_card_handler))
        .route("/api/cards/{id}", put(update_card_handler))
        .route("/api/cards/{id}", delete(delete_card_handler))
        .route("/api/refresh-prices", post(refresh_handler))
        .route("/api/collection-value-series", get(series_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server (async)
pub async fn serve(
    db: Arc<Mutex<Connection>>,
    tcgdex: TcgdexClient,
    prices: PriceClient,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(db, tcgdex, prices);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Card vault API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
