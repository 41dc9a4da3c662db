//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Derive a filesystem-safe scope key for a web origin
///
/// Origins are compared case-insensitively and without a trailing slash,
/// so `https://Example.com/` and `https://example.com` share one scope.
pub fn origin_scope(origin: &str) -> String {
    let normalized = origin.trim().trim_end_matches('/').to_ascii_lowercase();
    to_base64_url(&sha256(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        let hash = sha256(b"hello");
        assert_eq!(
            to_base64_url(&hash),
            "LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ"
        );
    }

    #[test]
    fn test_origin_scope_normalizes() {
        assert_eq!(
            origin_scope("https://Example.com/"),
            origin_scope("https://example.com")
        );
        assert_ne!(
            origin_scope("https://example.com"),
            origin_scope("https://example.org")
        );
    }

    #[test]
    fn test_origin_scope_is_path_safe() {
        let scope = origin_scope("http://localhost:3000");
        assert!(
            scope
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
