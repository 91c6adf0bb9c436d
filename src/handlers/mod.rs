mod callback;
mod checkout;
mod pricing;

pub use callback::*;
pub use checkout::*;
pub use pricing::*;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::config::RateLimits;
use crate::rate_limit::RateLimitLayers;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Public router with per-tier rate limiting.
///
/// Session creation is strict (it may call the external pricing provider);
/// redemption and pricing lookups are standard; health is relaxed.
pub fn router(limits: RateLimits) -> Router<AppState> {
    let layers = RateLimitLayers::from_config(limits);

    let strict = Router::new()
        .route("/payment/session", post(create_payment))
        .layer(layers.strict);

    let standard = Router::new()
        .route("/pricing/{region}", get(regional_pricing))
        .route("/payment/return", get(payment_return))
        .route("/payment/cancel", get(payment_cancel))
        .layer(layers.standard);

    let relaxed = Router::new()
        .route("/health", get(health))
        .layer(layers.relaxed);

    Router::new().merge(strict).merge(standard).merge(relaxed)
}
