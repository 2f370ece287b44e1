//! Tests for the TCGdex catalog client.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::TcgdexClient;
use crate::config::Config;

const PLACEHOLDER: &str = "https://example.com/placeholder.png";

fn test_client(base_url: &str) -> TcgdexClient {
    let config = Config {
        tcgdex_url: base_url.to_string(),
        placeholder_image_url: PLACEHOLDER.to_string(),
        ..Config::default()
    };
    TcgdexClient::new(&config)
}

/// Helper: a TCGdex list entry as JSON.
fn card_json(id: &str, name: &str, image: Option<&str>) -> serde_json::Value {
    match image {
        Some(img) => serde_json::json!({ "id": id, "name": name, "image": img }),
        None => serde_json::json!({ "id": id, "name": name }),
    }
}

#[tokio::test]
async fn resolves_exact_match_with_high_quality_suffix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .and(query_param("name", "Pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("sv03.5-025", "Pikachu", Some("https://assets.tcgdex.net/en/sv/sv03.5/025")),
            card_json("sv03.5-058", "Pikachu", Some("https://assets.tcgdex.net/en/sv/sv03.5/058")),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, "https://assets.tcgdex.net/en/sv/sv03.5/058/high.png");
}

#[tokio::test]
async fn filters_out_other_sets_by_id_prefix() {
    let mock_server = MockServer::start().await;

    // Same card name, wrong set: swsh12 ids must not survive the prefix filter
    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("swsh12-058", "Pikachu", Some("https://assets.tcgdex.net/en/swsh/swsh12/058")),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, PLACEHOLDER);
}

#[tokio::test]
async fn falls_back_to_suffix_match_when_no_exact_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("sv03.5-promo-058", "Pikachu", Some("https://assets.tcgdex.net/en/sv/sv03.5/promo-058")),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(
        url,
        "https://assets.tcgdex.net/en/sv/sv03.5/promo-058/high.png"
    );
}

#[tokio::test]
async fn prefers_exact_match_over_suffix_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("sv03.5-promo-058", "Pikachu", Some("https://assets.tcgdex.net/en/sv/sv03.5/promo-058")),
            card_json("sv03.5-058", "Pikachu", Some("https://assets.tcgdex.net/en/sv/sv03.5/058")),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, "https://assets.tcgdex.net/en/sv/sv03.5/058/high.png");
}

#[tokio::test]
async fn pads_single_digit_numbers_for_matching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .and(query_param("name", "Bulbasaur"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("sv03.5-001", "Bulbasaur", Some("https://assets.tcgdex.net/en/sv/sv03.5/001")),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Bulbasaur", "151", "1").await;

    assert_eq!(url, "https://assets.tcgdex.net/en/sv/sv03.5/001/high.png");
}

#[tokio::test]
async fn skips_candidates_without_an_image_asset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("sv03.5-058", "Pikachu", None),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, PLACEHOLDER);
}

#[tokio::test]
async fn returns_placeholder_on_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, PLACEHOLDER);
}

#[tokio::test]
async fn returns_placeholder_on_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "151", "58").await;

    assert_eq!(url, PLACEHOLDER);
}

#[tokio::test]
async fn unmapped_set_short_circuits_without_a_request() {
    let mock_server = MockServer::start().await;

    // Zero expected requests: an unmapped set never reaches the network
    Mock::given(method("GET"))
        .and(path("/v2/en/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let url = client.resolve_image("Pikachu", "Base Set", "58").await;

    assert_eq!(url, PLACEHOLDER);
}
