//! Webhook signature verification using HMAC-SHA256.
//!
//! Notion-style senders sign the raw request body with a shared secret
//! and put the base64-encoded digest in the `x-notion-signature` header.
//! Verification runs before the body is parsed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-notion-signature";

/// Computes the base64 HMAC-SHA256 of `payload` under `secret`.
///
/// Returns `None` only if the MAC cannot be keyed, which HMAC never
/// refuses in practice.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Verifies a signature header against the payload and secret.
///
/// Returns `false` for an empty secret, a header that is not canonical
/// base64, or a digest mismatch. Never panics. The digest comparison is
/// constant-time.
///
/// Callers that have no secret configured skip verification entirely
/// rather than calling this with an empty key.
///
/// # Examples
///
/// ```
/// use taskrelay_core::signature::{compute_signature, verify_signature};
///
/// let body = br#"{"id":"abc"}"#;
/// let header = compute_signature(body, b"s3cret").unwrap();
///
/// assert!(verify_signature(body, &header, b"s3cret"));
/// assert!(!verify_signature(body, &header, b"other"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    if secret.is_empty() {
        return false;
    }

    let expected = match STANDARD.decode(signature_header) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2, base64 encoded.
        let sig = compute_signature(b"what do ya want for nothing?", b"Jefe").unwrap();
        assert_eq!(sig, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_verify_valid() {
        let body = b"{\"properties\":{}}";
        let sig = compute_signature(body, b"secret").unwrap();
        assert!(verify_signature(body, &sig, b"secret"));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let body = b"payload";
        let sig = compute_signature(body, b"secret").unwrap();
        assert!(!verify_signature(body, &sig, b"secreT"));
    }

    #[test]
    fn test_verify_empty_secret_rejected() {
        let body = b"payload";
        let sig = compute_signature(body, b"").unwrap();
        assert!(!verify_signature(body, &sig, b""));
    }

    #[test]
    fn test_verify_malformed_headers() {
        let body = b"payload";
        assert!(!verify_signature(body, "", b"secret"));
        assert!(!verify_signature(body, "not base64!!", b"secret"));
        assert!(!verify_signature(body, "sha256=abcd", b"secret"));
        // Valid base64, wrong length.
        assert!(!verify_signature(body, "AAAA", b"secret"));
    }

    #[test]
    fn test_hex_encoding_rejected() {
        let body = b"payload";
        let sig = compute_signature(body, b"secret").unwrap();
        let bytes = STANDARD.decode(&sig).unwrap();
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert!(!verify_signature(body, &hex, b"secret"));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            payload in prop::collection::vec(any::<u8>(), 0..512),
            secret in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            let sig = compute_signature(&payload, &secret).unwrap();
            prop_assert!(verify_signature(&payload, &sig, &secret));
        }

        #[test]
        fn prop_single_byte_mutation_fails(
            payload in prop::collection::vec(any::<u8>(), 1..512),
            secret in prop::collection::vec(any::<u8>(), 1..64),
            idx in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let sig = compute_signature(&payload, &secret).unwrap();
            let mut mutated = payload.clone();
            let i = idx.index(mutated.len());
            mutated[i] ^= flip;
            prop_assert!(!verify_signature(&mutated, &sig, &secret));
        }

        #[test]
        fn prop_arbitrary_header_never_panics(header in ".*") {
            let _ = verify_signature(b"payload", &header, b"secret");
        }
    }
}
