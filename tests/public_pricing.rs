//! Tests for GET /pricing/{region}

mod common;

use common::*;

use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_pricing_returns_region_table() {
    let app = public_app(test_state());

    let response = app.oneshot(get_request("/pricing/PK")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["region"], "PK");
    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices.len(), table::PRODUCT_IDS.len());

    for price in prices {
        assert_eq!(price["source"], "fallback");
        assert_eq!(price["currency"], "PKR");
    }

    let resume = prices
        .iter()
        .find(|p| p["product_id"] == "resume_analysis")
        .expect("table should include resume_analysis");
    assert_eq!(resume["amount"], 1200);
    assert_eq!(resume["display"], "Rs 1,200");
}

#[tokio::test]
async fn test_pricing_unknown_region_serves_default() {
    let app = public_app(test_state());

    let response = app.oneshot(get_request("/pricing/ZZ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["region"], "US");
    assert!(body["prices"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["currency"] == "USD"));
}

#[tokio::test]
async fn test_pricing_region_is_case_insensitive() {
    let app = public_app(test_state());

    let response = app.oneshot(get_request("/pricing/pk")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["region"], "PK");
}
