use std::sync::Arc;

use crate::config::Config;
use crate::pricing::PricingResolver;
use crate::store::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub pricing: Arc<PricingResolver>,
    /// Public base URL of this service (return/cancel URL construction).
    pub base_url: String,
    /// Payment provider checkout page URL.
    pub checkout_url: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(
                config.session_ttl_secs,
                config.session_grace_secs,
            )),
            pricing: Arc::new(PricingResolver::from_config(config)),
            base_url: config.base_url.clone(),
            checkout_url: config.checkout_url.clone(),
        }
    }
}
