//! Regional price resolution.
//!
//! `PricingResolver` answers "what does this product cost in this region"
//! from two sources: the live pricing provider (bounded timeout, short-lived
//! cache, circuit breaker) and the statically bundled fallback table. Live
//! failures are recovered locally and logged - they are never surfaced to
//! the buyer.

mod provider;
pub mod table;

pub use provider::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, LivePrice, PricingProviderClient,
    ProviderError,
};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{msg, AppError, Result};
use crate::models::{PriceSource, RegionalPrice};

struct CachedRegion {
    fetched_at: Instant,
    prices: Vec<LivePrice>,
}

pub struct PricingResolver {
    provider: Option<PricingProviderClient>,
    breaker: CircuitBreaker,
    /// Live responses keyed by canonical region. Entries are read-only once
    /// written and simply expire.
    cache: Mutex<HashMap<String, CachedRegion>>,
    cache_ttl: Duration,
}

impl PricingResolver {
    pub fn new(
        provider: Option<PricingProviderClient>,
        cache_ttl: Duration,
        breaker_config: CircuitBreakerConfig,
    ) -> Self {
        Self {
            provider,
            breaker: CircuitBreaker::new(breaker_config),
            cache: Mutex::new(HashMap::new()),
            cache_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let provider = config.pricing_api_url.as_ref().map(|url| {
            PricingProviderClient::new(
                url.clone(),
                Duration::from_millis(config.pricing_timeout_ms),
            )
        });

        Self::new(
            provider,
            Duration::from_secs(config.pricing_cache_ttl_secs),
            CircuitBreakerConfig::default(),
        )
    }

    /// Resolve one product's price in one region.
    ///
    /// Fails with `PricingUnavailable` only when the product is unknown to
    /// both the live source and the fallback table - a configuration error,
    /// not a transient one.
    pub async fn resolve(&self, product_id: &str, region: &str) -> Result<RegionalPrice> {
        let canonical = table::canonical_region(region);

        if let Some(live) = self.live_region(&canonical).await {
            if let Some(row) = live.iter().find(|p| p.product_id == product_id) {
                return Ok(live_to_price(row, &canonical));
            }
        }

        table::lookup(product_id, &canonical).ok_or_else(|| {
            AppError::PricingUnavailable(format!("{}: '{}'", msg::UNKNOWN_PRODUCT, product_id))
        })
    }

    /// Resolve the full catalog for one region, backing `GET /pricing/{region}`.
    ///
    /// Live rows override fallback entries product-by-product, so a partial
    /// live response still yields a complete table.
    pub async fn region_prices(&self, region: &str) -> Result<Vec<RegionalPrice>> {
        let canonical = table::canonical_region(region);
        let mut prices = table::region_prices(&canonical);

        if let Some(live) = self.live_region(&canonical).await {
            for entry in prices.iter_mut() {
                if let Some(row) = live.iter().find(|p| p.product_id == entry.product_id) {
                    *entry = live_to_price(row, &canonical);
                }
            }
        }

        Ok(prices)
    }

    /// Current circuit breaker state, for ops visibility.
    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Live price rows for a region: cache first, then a guarded fetch.
    ///
    /// Returns `None` whenever live data cannot be had right now; the caller
    /// falls back. Never blocks other requests - the only lock taken is the
    /// cache mutex, held for a lookup or an insert, not across the fetch.
    async fn live_region(&self, region: &str) -> Option<Vec<LivePrice>> {
        let provider = self.provider.as_ref()?;

        {
            let cache = self.cache.lock();
            if let Some(entry) = cache.get(region) {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Some(entry.prices.clone());
                }
            }
        }

        if !self.breaker.allow_request() {
            tracing::debug!(region = region, "pricing circuit open, serving fallback");
            return None;
        }

        match provider.fetch_region(region).await {
            Ok(prices) => {
                self.breaker.record_success();
                self.cache.lock().insert(
                    region.to_string(),
                    CachedRegion {
                        fetched_at: Instant::now(),
                        prices: prices.clone(),
                    },
                );
                Some(prices)
            }
            Err(e) => {
                self.breaker.record_failure();
                tracing::warn!(region = region, error = %e, "live pricing fetch failed, serving fallback");
                None
            }
        }
    }
}

fn live_to_price(row: &LivePrice, region: &str) -> RegionalPrice {
    RegionalPrice {
        product_id: row.product_id.clone(),
        region: region.to_string(),
        amount: row.amount,
        currency: row.currency.clone(),
        display: table::format_display(&row.currency, row.amount),
        source: PriceSource::Live,
    }
}
