//! Rate limiting for public endpoints.
//!
//! Limits are applied per-IP address. Session references are high-entropy
//! (128 bits), so brute force is not a concern; the limits exist to bound
//! external pricing calls and store churn.
//!
//! Tiers:
//! - Strict: POST /payment/session - may hit the external pricing provider
//! - Standard: /payment/return, /payment/cancel, /pricing/{region}
//! - Relaxed: /health
//!
//! Configure via environment variables:
//! - RATE_LIMIT_STRICT_RPM (default: 10)
//! - RATE_LIMIT_STANDARD_RPM (default: 30)
//! - RATE_LIMIT_RELAXED_RPM (default: 60)

use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;

use crate::config::RateLimits;

/// Rate limiter layer type alias using governor types directly
pub type RateLimitLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
>;

/// One layer per tier, built from the configured RPM values.
pub struct RateLimitLayers {
    pub strict: RateLimitLayer,
    pub standard: RateLimitLayer,
    pub relaxed: RateLimitLayer,
}

impl RateLimitLayers {
    pub fn from_config(limits: RateLimits) -> Self {
        Self {
            strict: create_layer(limits.strict_rpm),
            standard: create_layer(limits.standard_rpm),
            relaxed: create_layer(limits.relaxed_rpm),
        }
    }
}

/// Creates a per-IP rate limiter layer with the specified requests per minute.
fn create_layer(requests_per_minute: u32) -> RateLimitLayer {
    assert!(requests_per_minute > 0, "Rate limit must be greater than 0");

    let period_secs = 60 / requests_per_minute as u64;
    let config = GovernorConfigBuilder::default()
        .period(Duration::from_secs(period_secs.max(1)))
        .burst_size(requests_per_minute)
        .finish()
        .expect("Failed to build rate limiter config");

    GovernorLayer {
        config: Arc::new(config),
    }
}
