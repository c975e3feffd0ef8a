//! Configuration Module
//!
//! Loads proxy settings from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default HTTP port when `SERVER_PORT` is unset.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default wait for a free store connection when `POOL_TIMEOUT_MS` is unset.
pub const DEFAULT_POOL_TIMEOUT_MS: u64 = 5000;

/// Default lifetime of an unused store connection.
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 60;

/// Proxy configuration parameters.
///
/// The store address, cache capacity, TTL and pool size have no defaults:
/// leaving any of them out is a startup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backing Redis address (`host:port`)
    pub redis_address: String,
    /// Maximum number of cached entries
    pub capacity: usize,
    /// Entry time-to-live
    pub ttl: Duration,
    /// Maximum concurrent store connections
    pub max_connections: usize,
    /// HTTP server port
    pub server_port: u16,
    /// How long a request waits for a store connection
    pub pool_timeout: Duration,
    /// How long an unused store connection is kept open
    pub pool_idle_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_ADDRESS` - Backing store address (required)
    /// - `CACHE_CAPACITY` - Maximum cached entries, positive (required)
    /// - `CACHE_TTL_SECONDS` - Entry TTL in seconds (required)
    /// - `MAX_CONNECTIONS` - Store connection pool size, positive (required)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `POOL_TIMEOUT_MS` - Connection wait in milliseconds (default: 5000)
    /// - `POOL_IDLE_TIMEOUT_SECS` - Idle connection lifetime in seconds (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary name-to-value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let redis_address = required("REDIS_ADDRESS")?;
        let capacity = positive("CACHE_CAPACITY", required("CACHE_CAPACITY")?)?;
        let ttl_secs = parse::<u64>(
            "CACHE_TTL_SECONDS",
            required("CACHE_TTL_SECONDS")?,
            "expected a non-negative number of seconds",
        )?;
        let max_connections = positive("MAX_CONNECTIONS", required("MAX_CONNECTIONS")?)?;

        let server_port = match lookup("SERVER_PORT") {
            Some(v) => parse("SERVER_PORT", v, "expected a port number")?,
            None => DEFAULT_SERVER_PORT,
        };
        let pool_timeout_ms = match lookup("POOL_TIMEOUT_MS") {
            Some(v) => parse("POOL_TIMEOUT_MS", v, "expected milliseconds")?,
            None => DEFAULT_POOL_TIMEOUT_MS,
        };
        let pool_idle_timeout_secs = match lookup("POOL_IDLE_TIMEOUT_SECS") {
            Some(v) => parse("POOL_IDLE_TIMEOUT_SECS", v, "expected seconds")?,
            None => DEFAULT_POOL_IDLE_TIMEOUT_SECS,
        };

        Ok(Self {
            redis_address,
            capacity,
            ttl: Duration::from_secs(ttl_secs),
            max_connections,
            server_port,
            pool_timeout: Duration::from_millis(pool_timeout_ms),
            pool_idle_timeout: Duration::from_secs(pool_idle_timeout_secs),
        })
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    value: String,
    reason: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value, reason })
}

fn positive(name: &'static str, value: String) -> Result<usize, ConfigError> {
    const REASON: &str = "expected a positive integer";
    match parse::<usize>(name, value.clone(), REASON)? {
        0 => Err(ConfigError::Invalid {
            name,
            value,
            reason: REASON,
        }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("REDIS_ADDRESS", "localhost:6379"),
        ("CACHE_CAPACITY", "3"),
        ("CACHE_TTL_SECONDS", "60"),
        ("MAX_CONNECTIONS", "10"),
    ];

    fn without(name: &str) -> Vec<(&'static str, &'static str)> {
        REQUIRED.iter().copied().filter(|(k, _)| *k != name).collect()
    }

    fn with(name: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
        let mut pairs = without(name);
        pairs.push((name, value));
        pairs
    }

    #[test]
    fn test_config_required_values_with_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.redis_address, "localhost:6379");
        assert_eq!(config.capacity, 3);
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(
            config.pool_timeout,
            Duration::from_millis(DEFAULT_POOL_TIMEOUT_MS)
        );
        assert_eq!(
            config.pool_idle_timeout,
            Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_config_optional_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SERVER_PORT", "9000"));
        pairs.push(("POOL_TIMEOUT_MS", "250"));
        pairs.push(("POOL_IDLE_TIMEOUT_SECS", "15"));

        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.pool_timeout, Duration::from_millis(250));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_config_missing_required() {
        for (name, _) in REQUIRED {
            let result = Config::from_lookup(lookup(&without(name)));
            assert_eq!(result, Err(ConfigError::Missing(name)));
        }
    }

    #[test]
    fn test_config_blank_counts_as_missing() {
        let result = Config::from_lookup(lookup(&with("REDIS_ADDRESS", "  ")));
        assert_eq!(result, Err(ConfigError::Missing("REDIS_ADDRESS")));
    }

    #[test]
    fn test_config_non_numeric() {
        let result = Config::from_lookup(lookup(&with("CACHE_CAPACITY", "lots")));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "CACHE_CAPACITY", .. })
        ));

        let result = Config::from_lookup(lookup(&with("CACHE_TTL_SECONDS", "-5")));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "CACHE_TTL_SECONDS", .. })
        ));
    }

    #[test]
    fn test_config_zero_capacity_and_pool() {
        let result = Config::from_lookup(lookup(&with("CACHE_CAPACITY", "0")));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "CACHE_CAPACITY", .. })
        ));

        let result = Config::from_lookup(lookup(&with("MAX_CONNECTIONS", "0")));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "MAX_CONNECTIONS", .. })
        ));
    }

    #[test]
    fn test_config_zero_ttl_is_allowed() {
        let config = Config::from_lookup(lookup(&with("CACHE_TTL_SECONDS", "0"))).unwrap();
        assert_eq!(config.ttl, Duration::ZERO);
    }

    #[test]
    fn test_config_bad_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SERVER_PORT", "70000"));

        let result = Config::from_lookup(lookup(&pairs));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "SERVER_PORT", .. })
        ));
    }
}
