//! Live pricing provider client and circuit breaker.
//!
//! The client fetches a region's price table from the external provider with
//! a bounded timeout and validates the response structurally before anything
//! downstream trusts it. The circuit breaker tracks consecutive failures so
//! a dead provider stops costing a timeout per request.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::table;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One price row as returned by the provider, post-validation.
#[derive(Debug, Clone, Deserialize)]
pub struct LivePrice {
    pub product_id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct LivePricingResponse {
    prices: Vec<LivePrice>,
}

#[derive(Debug, Clone)]
pub struct PricingProviderClient {
    client: Client,
    base_url: String,
}

impl PricingProviderClient {
    /// Build a client with a bounded per-request timeout. Called once at
    /// startup.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build pricing HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the live price table for one region.
    ///
    /// Timeouts, transport errors, non-2xx statuses, and structurally
    /// invalid bodies all surface as `ProviderError`; the resolver treats
    /// every variant the same way (count a failure, fall back).
    pub async fn fetch_region(&self, region: &str) -> Result<Vec<LivePrice>, ProviderError> {
        let url = format!("{}/v1/prices/{}", self.base_url, region);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: LivePricingResponse = response.json().await?;
        validate_prices(&body.prices)?;

        Ok(body.prices)
    }
}

fn validate_prices(prices: &[LivePrice]) -> Result<(), ProviderError> {
    if prices.is_empty() {
        return Err(ProviderError::Malformed("empty price list".into()));
    }

    for price in prices {
        if !table::is_known_product(&price.product_id) {
            return Err(ProviderError::Malformed(format!(
                "unknown product '{}'",
                price.product_id
            )));
        }
        if price.amount <= 0 {
            return Err(ProviderError::Malformed(format!(
                "non-positive amount {} for '{}'",
                price.amount, price.product_id
            )));
        }
        if price.currency.len() != 3 || !price.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ProviderError::Malformed(format!(
                "invalid currency '{}' for '{}'",
                price.currency, price.product_id
            )));
        }
    }

    Ok(())
}

/// Circuit breaker state, derived from the failure counter and the time the
/// circuit opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests flow normally.
    Closed,
    /// Failing fast; live fetches are skipped.
    Open,
    /// Cool-down elapsed; the next request is a probe.
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long the circuit stays open before allowing a probe request.
    pub open_duration: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_duration: Duration::from_secs(30),
        }
    }
}

/// Lock-free circuit breaker for live pricing fetches.
///
/// State is a pure function of the consecutive-failure count and the elapsed
/// time since the circuit opened; there are no blocking sleeps anywhere.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_count: AtomicU32,
    /// Unix seconds when the circuit opened (0 = closed).
    opened_at: AtomicU64,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            failure_count: AtomicU32::new(0),
            opened_at: AtomicU64::new(0),
            config,
        }
    }

    pub fn state(&self) -> CircuitState {
        let opened_at = self.opened_at.load(Ordering::Acquire);
        if opened_at == 0 {
            return CircuitState::Closed;
        }

        let elapsed = unix_now().saturating_sub(opened_at);
        if elapsed >= self.config.open_duration.as_secs() {
            CircuitState::HalfOpen
        } else {
            CircuitState::Open
        }
    }

    /// Whether a live fetch should be attempted right now.
    pub fn allow_request(&self) -> bool {
        !matches!(self.state(), CircuitState::Open)
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Release);
        self.opened_at.store(0, Ordering::Release);
    }

    pub fn record_failure(&self) {
        let failures = self.failure_count.fetch_add(1, Ordering::AcqRel) + 1;
        if failures >= self.config.failure_threshold {
            self.opened_at.store(unix_now(), Ordering::Release);

            tracing::warn!(
                failures = failures,
                threshold = self.config.failure_threshold,
                "pricing circuit breaker opened"
            );
        }
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::Acquire)
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaker_starts_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(cb.allow_request());
    }

    #[test]
    fn test_breaker_opens_at_threshold() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 3,
            open_duration: Duration::from_secs(60),
        });

        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Closed);

        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.allow_request());
    }

    #[test]
    fn test_breaker_success_resets() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            open_duration: Duration::from_secs(60),
        });

        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);

        cb.record_success();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_breaker_half_open_after_cooldown() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            open_duration: Duration::from_secs(0),
        });

        cb.record_failure();
        // Cool-down of zero elapses immediately: probe allowed.
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        assert!(cb.allow_request());
    }

    #[test]
    fn test_validate_rejects_unknown_product() {
        let prices = vec![LivePrice {
            product_id: "mystery_product".into(),
            amount: 10,
            currency: "USD".into(),
        }];
        assert!(validate_prices(&prices).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_amount_and_currency() {
        let zero = vec![LivePrice {
            product_id: "resume_analysis".into(),
            amount: 0,
            currency: "USD".into(),
        }];
        assert!(validate_prices(&zero).is_err());

        let bad_currency = vec![LivePrice {
            product_id: "resume_analysis".into(),
            amount: 10,
            currency: "usd".into(),
        }];
        assert!(validate_prices(&bad_currency).is_err());

        assert!(validate_prices(&[]).is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let prices = vec![LivePrice {
            product_id: "resume_analysis".into(),
            amount: 1150,
            currency: "PKR".into(),
        }];
        assert!(validate_prices(&prices).is_ok());
    }
}
