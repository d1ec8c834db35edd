//! Environment variable parsing helpers
//!
//! Missing or unparsable values fall back to defaults instead of panicking.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("BLOG_SERVICE_PORT", 8000);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("BLOG_TEST_MISSING_VAR", 42);
        assert_eq!(result, 42);

        std::env::set_var("BLOG_TEST_PORT", "8080");
        let result: u16 = parse_env_with_default("BLOG_TEST_PORT", 3000);
        assert_eq!(result, 8080);
        std::env::remove_var("BLOG_TEST_PORT");
    }

    #[test]
    #[serial]
    fn test_parse_env_with_default_ignores_garbage() {
        std::env::set_var("BLOG_TEST_GARBAGE", "eight");
        let result: u16 = parse_env_with_default("BLOG_TEST_GARBAGE", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("BLOG_TEST_GARBAGE");
    }

    #[test]
    #[serial]
    fn test_parse_env_optional() {
        assert_eq!(parse_env_optional::<u32>("BLOG_TEST_MISSING_VAR"), None);

        std::env::set_var("BLOG_TEST_OPT", " 123 ");
        assert_eq!(parse_env_optional::<u32>("BLOG_TEST_OPT"), Some(123));
        std::env::remove_var("BLOG_TEST_OPT");
    }
}
