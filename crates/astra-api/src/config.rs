//! # Service Configuration
//!
//! [`AppConfig`] collects the service-level settings read from the
//! environment. Upstream client settings (API keys, endpoints) are loaded by
//! the config types in `astra-clients`.
//!
//! | Variable                      | Default | Field |
//! |-------------------------------|---------|-------|
//! | `PORT`                        | 8001    | `port` |
//! | `ENVIRONMENT`                 | development | `environment` |
//! | `CORS_ORIGINS`                | `*`     | `cors_origins` (comma-separated) |
//! | `REQUIRE_AUTH`                | false   | `require_auth` |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | 30      | `access_token_expire_minutes` (1..=525600) |
//! | `PASSWORD_HASH_ITERATIONS`    | 100000  | `password_hash_iterations` |
//! | `ENABLE_BACKGROUND_SCANNER`   | true    | `enable_background_scanner` |
//! | `SCAN_INTERVAL_MINUTES`       | 30      | `scan_interval_minutes` |
//! | `COMPETITOR_INTERVAL_MINUTES` | 60      | `competitor_interval_minutes` |
//! | `ENABLE_LIVE_MARKET_DATA`     | false   | `enable_live_market_data` |
//! | `ENABLE_BLOCKCHAIN`           | false   | `enable_blockchain` |
//! | `RATE_LIMIT_MAX_REQUESTS`     | 1000    | `rate_limit.max_requests` |
//! | `RATE_LIMIT_WINDOW_SECS`      | 60      | `rate_limit.window_secs` |

use std::str::FromStr;

use crate::middleware::rate_limit::RateLimitConfig;

/// Longest accepted session lifetime: one year.
pub const MAX_TOKEN_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// When true, every non-public route requires a bearer session token.
    pub require_auth: bool,
    pub access_token_expire_minutes: i64,
    pub password_hash_iterations: u32,
    pub enable_background_scanner: bool,
    pub scan_interval_minutes: u64,
    pub competitor_interval_minutes: u64,
    pub enable_live_market_data: bool,
    pub enable_blockchain: bool,
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            require_auth: false,
            access_token_expire_minutes: 30,
            password_hash_iterations: 100_000,
            enable_background_scanner: true,
            scan_interval_minutes: 30,
            competitor_interval_minutes: 60,
            enable_live_market_data: false,
            enable_blockchain: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read every setting from the environment, falling back to the defaults
    /// above for absent or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT", defaults.port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .ok()
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
            require_auth: env_flag("REQUIRE_AUTH", defaults.require_auth),
            access_token_expire_minutes: token_lifetime(env_parse(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                defaults.access_token_expire_minutes,
            )),
            password_hash_iterations: env_parse(
                "PASSWORD_HASH_ITERATIONS",
                defaults.password_hash_iterations,
            ),
            enable_background_scanner: env_flag(
                "ENABLE_BACKGROUND_SCANNER",
                defaults.enable_background_scanner,
            ),
            scan_interval_minutes: env_parse("SCAN_INTERVAL_MINUTES", defaults.scan_interval_minutes),
            competitor_interval_minutes: env_parse(
                "COMPETITOR_INTERVAL_MINUTES",
                defaults.competitor_interval_minutes,
            ),
            enable_live_market_data: env_flag(
                "ENABLE_LIVE_MARKET_DATA",
                defaults.enable_live_market_data,
            ),
            enable_blockchain: env_flag("ENABLE_BLOCKCHAIN", defaults.enable_blockchain),
            rate_limit: RateLimitConfig {
                max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", defaults.rate_limit.max_requests),
                window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit.window_secs),
            },
        }
    }
}

fn token_lifetime(minutes: i64) -> i64 {
    let clamped = minutes.clamp(1, MAX_TOKEN_MINUTES);
    if clamped != minutes {
        tracing::warn!(requested = minutes, used = clamped, "token lifetime out of range");
    }
    clamped
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, "unparsable value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8001);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(!config.require_auth);
        assert_eq!(config.access_token_expire_minutes, 30);
        assert_eq!(config.scan_interval_minutes, 30);
        assert_eq!(config.competitor_interval_minutes, 60);
        assert!(config.enable_background_scanner);
        assert!(!config.enable_live_market_data);
        assert!(!config.enable_blockchain);
    }

    #[test]
    fn token_lifetime_is_clamped() {
        assert_eq!(token_lifetime(30), 30);
        assert_eq!(token_lifetime(0), 1);
        assert_eq!(token_lifetime(-5), 1);
        assert_eq!(token_lifetime(i64::MAX), MAX_TOKEN_MINUTES);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn origins_split_on_commas() {
        assert_eq!(
            split_origins("https://a.io, https://b.io,,"),
            vec!["https://a.io", "https://b.io"]
        );
    }

    #[test]
    fn unparsable_number_falls_back() {
        std::env::set_var("ASTRA_TEST_BAD_PORT", "eighty");
        assert_eq!(env_parse("ASTRA_TEST_BAD_PORT", 8001u16), 8001);
        std::env::remove_var("ASTRA_TEST_BAD_PORT");
    }
}
