//! Statically bundled fallback pricing.
//!
//! The table is versioned with the binary: when the live pricing provider is
//! unreachable, times out, or returns something malformed, resolution falls
//! back here. Unknown regions resolve against [`DEFAULT_REGION`] rather than
//! erroring.

use crate::models::{PriceSource, RegionalPrice};

/// Region used when the requested region has no table of its own.
pub const DEFAULT_REGION: &str = "US";

/// All products sold by the service. Live provider responses are validated
/// against this list; a response naming anything else is rejected as
/// malformed.
pub const PRODUCT_IDS: &[&str] = &["resume_analysis", "job_match", "complete_package"];

pub fn is_known_product(product_id: &str) -> bool {
    PRODUCT_IDS.contains(&product_id)
}

struct RegionTable {
    region: &'static str,
    currency: &'static str,
    /// (product_id, amount in whole currency units)
    prices: &'static [(&'static str, i64)],
}

const FALLBACK: &[RegionTable] = &[
    RegionTable {
        region: "US",
        currency: "USD",
        prices: &[
            ("resume_analysis", 12),
            ("job_match", 9),
            ("complete_package", 18),
        ],
    },
    RegionTable {
        region: "GB",
        currency: "GBP",
        prices: &[
            ("resume_analysis", 10),
            ("job_match", 8),
            ("complete_package", 15),
        ],
    },
    RegionTable {
        region: "EU",
        currency: "EUR",
        prices: &[
            ("resume_analysis", 11),
            ("job_match", 9),
            ("complete_package", 17),
        ],
    },
    RegionTable {
        region: "PK",
        currency: "PKR",
        prices: &[
            ("resume_analysis", 1200),
            ("job_match", 900),
            ("complete_package", 1800),
        ],
    },
    RegionTable {
        region: "IN",
        currency: "INR",
        prices: &[
            ("resume_analysis", 999),
            ("job_match", 799),
            ("complete_package", 1499),
        ],
    },
];

fn region_table(region: &str) -> &'static RegionTable {
    FALLBACK
        .iter()
        .find(|t| t.region == region)
        .or_else(|| FALLBACK.iter().find(|t| t.region == DEFAULT_REGION))
        .expect("fallback table must contain the default region")
}

/// Normalize a requested region to the one the table actually serves.
pub fn canonical_region(region: &str) -> String {
    let upper = region.trim().to_ascii_uppercase();
    region_table(&upper).region.to_string()
}

/// Look up the fallback price for one product in one region.
///
/// Returns `None` only for unknown products; unknown regions fall back to
/// the default region.
pub fn lookup(product_id: &str, region: &str) -> Option<RegionalPrice> {
    let table = region_table(&region.trim().to_ascii_uppercase());
    let (_, amount) = table.prices.iter().find(|(p, _)| *p == product_id)?;

    Some(RegionalPrice {
        product_id: product_id.to_string(),
        region: table.region.to_string(),
        amount: *amount,
        currency: table.currency.to_string(),
        display: format_display(table.currency, *amount),
        source: PriceSource::Fallback,
    })
}

/// All fallback prices for one region (default region if unknown).
pub fn region_prices(region: &str) -> Vec<RegionalPrice> {
    let table = region_table(&region.trim().to_ascii_uppercase());
    table
        .prices
        .iter()
        .map(|(product_id, amount)| RegionalPrice {
            product_id: product_id.to_string(),
            region: table.region.to_string(),
            amount: *amount,
            currency: table.currency.to_string(),
            display: format_display(table.currency, *amount),
            source: PriceSource::Fallback,
        })
        .collect()
}

/// Deterministic per-currency display formatting: symbol placement and
/// thousands separators. Unknown currencies render as "{amount} {code}".
pub fn format_display(currency: &str, amount: i64) -> String {
    match currency {
        "USD" => format!("${}", thousands(amount, ',')),
        "GBP" => format!("\u{a3}{}", thousands(amount, ',')),
        "EUR" => format!("{} \u{20ac}", thousands(amount, '.')),
        "PKR" => format!("Rs {}", thousands(amount, ',')),
        "INR" => format!("\u{20b9}{}", thousands(amount, ',')),
        _ => format!("{} {}", thousands(amount, ','), currency),
    }
}

fn thousands(amount: i64, sep: char) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }

    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
