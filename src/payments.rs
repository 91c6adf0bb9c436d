//! Outbound checkout link construction.
//!
//! The payment provider hosts the actual checkout page; we hand the buyer a
//! redirect URL carrying the opaque session reference plus where to come
//! back to. Price and payload never appear in the URL - the reference is
//! the only thing the provider round-trips.

/// Build the provider checkout URL for a session.
pub fn build_checkout_url(
    checkout_base: &str,
    session_id: &str,
    return_url: &str,
    cancel_url: &str,
) -> String {
    append_query_params(
        checkout_base,
        &[
            ("ref", session_id),
            ("return_url", return_url),
            ("cancel_url", cancel_url),
        ],
    )
}

/// Append query parameters to a URL, percent-encoding values.
pub fn append_query_params(base_url: &str, params: &[(&str, &str)]) -> String {
    let query_string: String = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if base_url.contains('?') {
        format!("{}&{}", base_url, query_string)
    } else {
        format!("{}?{}", base_url, query_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_query_params() {
        let url = append_query_params("https://pay.example.com/checkout", &[("ref", "cq_ps_abc")]);
        assert_eq!(url, "https://pay.example.com/checkout?ref=cq_ps_abc");

        let url = append_query_params("https://pay.example.com/checkout?v=2", &[("ref", "x")]);
        assert_eq!(url, "https://pay.example.com/checkout?v=2&ref=x");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let url = append_query_params(
            "https://pay.example.com/checkout",
            &[("return_url", "https://api.example.com/payment/return?session_id=x")],
        );
        assert!(url.contains("return_url=https%3A%2F%2Fapi.example.com"));
        assert!(!url.contains("return?session_id"));
    }

    #[test]
    fn test_checkout_url_carries_only_the_reference() {
        let url = build_checkout_url(
            "https://pay.example.com/checkout",
            "cq_ps_00000000000000000000000000000000",
            "https://api.example.com/payment/return?session_id=cq_ps_00000000000000000000000000000000",
            "https://api.example.com/payment/cancel",
        );
        assert!(url.starts_with("https://pay.example.com/checkout?ref=cq_ps_"));
        assert!(url.contains("cancel_url="));
    }
}
