//! Environment Configuration Readers
//!
//! Typed helpers over `std::env`. Invalid values fall back to the default
//! and are logged, so a typo never prevents startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Non-empty, trimmed value of `key`
pub fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Value of `key`, or `default` when unset or blank
pub fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Whole seconds from `key`, or `default`
pub fn env_secs(key: &str, default: Duration) -> Duration {
    match env_opt(key) {
        None => default,
        Some(raw) => parse_secs(&raw).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, "Invalid duration, using default");
            default
        }),
    }
}

/// Filesystem path from `key`
pub fn env_path(key: &str) -> Option<PathBuf> {
    env_opt(key).map(PathBuf::from)
}

/// Parse a positive number of seconds
pub fn parse_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_secs(" 3 "), Some(Duration::from_secs(3)));
        assert_eq!(parse_secs("0"), None);
        assert_eq!(parse_secs("-1"), None);
        assert_eq!(parse_secs("ten"), None);
    }

    #[test]
    fn test_unset_key_falls_back() {
        let key = "PLATFORM_CONFIG_TEST_SURELY_UNSET";
        assert_eq!(env_opt(key), None);
        assert_eq!(env_or(key, "fallback"), "fallback");
        assert_eq!(env_secs(key, Duration::from_secs(7)), Duration::from_secs(7));
        assert_eq!(env_path(key), None);
    }
}
