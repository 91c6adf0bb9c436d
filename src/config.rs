use std::env;

/// Per-IP rate limits in requests per minute, by tier.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub strict_rpm: u32,
    pub standard_rpm: u32,
    pub relaxed_rpm: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public base URL of this service, used to build return/cancel URLs.
    pub base_url: String,
    /// Payment provider's hosted checkout page.
    pub checkout_url: String,
    /// Live pricing provider base URL. None = fallback table only.
    pub pricing_api_url: Option<String>,
    pub pricing_timeout_ms: u64,
    pub pricing_cache_ttl_secs: u64,
    pub session_ttl_secs: i64,
    pub session_grace_secs: i64,
    pub sweep_interval_secs: u64,
    pub rate_limit: RateLimits,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("CRITIQ_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = parse_env("PORT", 3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            base_url,
            checkout_url: env::var("CHECKOUT_URL")
                .unwrap_or_else(|_| "https://pay.critiq.app/checkout".to_string()),
            pricing_api_url: env::var("PRICING_API_URL").ok(),
            pricing_timeout_ms: parse_env("PRICING_TIMEOUT_MS", 3000),
            pricing_cache_ttl_secs: parse_env("PRICING_CACHE_TTL_SECS", 120),
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 3600),
            session_grace_secs: parse_env("SESSION_GRACE_SECS", 900),
            sweep_interval_secs: parse_env("SWEEP_INTERVAL_SECS", 60),
            rate_limit: RateLimits {
                strict_rpm: parse_env("RATE_LIMIT_STRICT_RPM", 10),
                standard_rpm: parse_env("RATE_LIMIT_STANDARD_RPM", 30),
                relaxed_rpm: parse_env("RATE_LIMIT_RELAXED_RPM", 60),
            },
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
