use serde::{Deserialize, Serialize};

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Fetched from the live pricing provider (possibly via the short-lived cache).
    Live,
    /// Served from the statically bundled pricing table.
    Fallback,
}

/// A resolved price for one product in one region.
///
/// Immutable value object: produced by the pricing resolver per request or
/// per cache window, never mutated in place. Sessions copy the fields at
/// creation time so a later price change cannot alter an in-flight purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalPrice {
    pub product_id: String,
    pub region: String,
    /// Price in whole currency units (catalog prices are whole-unit).
    pub amount: i64,
    /// ISO 4217 currency code, e.g. "PKR".
    pub currency: String,
    /// Human-readable price string, e.g. "Rs 1,200".
    pub display: String,
    pub source: PriceSource,
}
