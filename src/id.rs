//! Session reference generation.
//!
//! Session references use a `cq_ps_` brand prefix followed by 128 random
//! bits, hex-encoded. The prefix guarantees collision avoidance with payment
//! provider identifiers (Stripe's `cs_`, `pi_`, etc.) and makes references
//! self-describing in logs and redirect URLs.
//!
//! Format: `cq_ps_{32_hex_chars}`

use rand::rngs::OsRng;
use rand::RngCore;

/// Prefix for payment session references.
pub const SESSION_REF_PREFIX: &str = "cq_ps_";

/// Generates a new unguessable session reference.
///
/// The random part carries a full 128 bits from the OS CSPRNG, so references
/// cannot be enumerated or predicted from previously issued ones.
pub fn generate_session_ref() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", SESSION_REF_PREFIX, hex::encode(bytes))
}

/// Validate that a string is a well-formed session reference.
///
/// This is a cheap shape check to reject garbage before hitting the store.
pub fn is_valid_session_ref(s: &str) -> bool {
    let Some(hex_part) = s.strip_prefix(SESSION_REF_PREFIX) else {
        return false;
    };

    hex_part.len() == 32
        && hex_part
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_format() {
        let id = generate_session_ref();
        assert!(id.starts_with("cq_ps_"));
        // cq_ps_ (6 chars) + 32 hex chars = 38 chars total
        assert_eq!(id.len(), 38);
    }

    #[test]
    fn test_refs_are_unique() {
        let id1 = generate_session_ref();
        let id2 = generate_session_ref();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_is_valid_session_ref() {
        // Valid refs
        assert!(is_valid_session_ref("cq_ps_a1b2c3d4e5f6789012345678901234ab"));
        assert!(is_valid_session_ref("cq_ps_00000000000000000000000000000000"));
        assert!(is_valid_session_ref(&generate_session_ref()));

        // Invalid refs
        assert!(!is_valid_session_ref("")); // empty
        assert!(!is_valid_session_ref("a1b2c3d4e5f6789012345678901234ab")); // missing prefix
        assert!(!is_valid_session_ref("cq_ps_a1b2c3d4")); // too short
        assert!(!is_valid_session_ref("cq_ps_a1b2c3d4e5f6789012345678901234abcd")); // too long
        assert!(!is_valid_session_ref("cq_ps_a1b2c3d4e5f6789012345678901234GG")); // non-hex
        assert!(!is_valid_session_ref("cq_ps_A1B2C3D4E5F6789012345678901234AB")); // uppercase
        assert!(!is_valid_session_ref("cs_a1b2c3d4e5f6789012345678901234ab")); // provider prefix
    }
}
