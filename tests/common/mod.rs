//! Test utilities and fixtures for critiq-payments integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

pub use critiq_payments::error::AppError;
pub use critiq_payments::handlers::{
    create_payment, payment_cancel, payment_return, regional_pricing,
};
pub use critiq_payments::models::*;
pub use critiq_payments::pricing::{
    table, CircuitBreakerConfig, PricingProviderClient, PricingResolver,
};
pub use critiq_payments::state::AppState;
pub use critiq_payments::store::SessionStore;

/// A resolver with no live provider configured: every resolution comes from
/// the fallback table.
pub fn fallback_resolver() -> PricingResolver {
    PricingResolver::new(None, Duration::from_secs(60), CircuitBreakerConfig::default())
}

/// A resolver pointed at a dead endpoint (nothing listens on the discard
/// port), so every live fetch fails fast with connection refused.
pub fn dead_provider_resolver(failure_threshold: u32) -> PricingResolver {
    let client =
        PricingProviderClient::new("http://127.0.0.1:9".into(), Duration::from_millis(250));
    PricingResolver::new(
        Some(client),
        Duration::from_secs(60),
        CircuitBreakerConfig {
            failure_threshold,
            open_duration: Duration::from_secs(60),
        },
    )
}

/// Store with production-like TTL and grace.
pub fn test_store() -> SessionStore {
    SessionStore::new(3600, 900)
}

pub fn test_state() -> AppState {
    test_state_with_ttl(3600)
}

pub fn test_state_with_ttl(ttl_secs: i64) -> AppState {
    AppState {
        sessions: Arc::new(SessionStore::new(ttl_secs, 900)),
        pricing: Arc::new(fallback_resolver()),
        base_url: "http://127.0.0.1:3000".into(),
        checkout_url: "https://pay.test/checkout".into(),
    }
}

/// Public routes without the governor layers: per-IP rate limiting needs
/// peer connect info that `oneshot` requests don't carry.
pub fn public_app(state: AppState) -> Router {
    Router::new()
        .route("/payment/session", post(create_payment))
        .route("/payment/return", get(payment_return))
        .route("/payment/cancel", get(payment_cancel))
        .route("/pricing/{region}", get(regional_pricing))
        .with_state(state)
}

pub fn resume_payload() -> AnalysisPayload {
    AnalysisPayload::Resume {
        resume_text: "Jane Doe. Senior accountant, 8 years of experience.".into(),
        job_posting: None,
    }
}

pub fn job_match_payload() -> AnalysisPayload {
    AnalysisPayload::JobMatch {
        resume_text: "Jane Doe. Senior accountant, 8 years of experience.".into(),
        job_posting: "Hiring: staff accountant, CPA preferred.".into(),
    }
}

/// The PK fallback price for resume_analysis (PKR 1,200).
pub fn pk_price() -> RegionalPrice {
    table::lookup("resume_analysis", "PK").expect("PK fallback price should exist")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
