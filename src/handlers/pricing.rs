use axum::extract::State;
use serde::Serialize;

use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::RegionalPrice;
use crate::pricing::table;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    /// Canonical region the prices were resolved for (unknown regions
    /// resolve against the default region).
    pub region: String,
    pub prices: Vec<RegionalPrice>,
}

/// GET /pricing/{region} - regional price table for all products.
///
/// Each entry carries a `source` indicator (`live`/`fallback`); a provider
/// outage degrades the source, never the endpoint.
pub async fn regional_pricing(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<PricingResponse>> {
    let prices = state.pricing.region_prices(&region).await?;

    Ok(Json(PricingResponse {
        region: table::canonical_region(&region),
        prices,
    }))
}
