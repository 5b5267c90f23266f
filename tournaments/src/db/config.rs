//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 2)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    ///
    /// Unset variables fall back to [`DatabaseConfig::development`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEnvValue`] if a numeric variable is set but does not parse
    pub fn from_env() -> Result<Self, InvalidEnvValue> {
        let defaults = Self::development();
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: parse_env_or(
                "DB_CONNECTION_TIMEOUT",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT", defaults.idle_timeout_secs)?,
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME", defaults.max_lifetime_secs)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/tournaments` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/tournaments".to_string(),
            max_connections: 20,
            min_connections: 2,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// A configuration variable that is set but cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {key}: '{value}'")]
pub struct InvalidEnvValue {
    pub key: String,
    pub value: String,
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T, InvalidEnvValue>
where
    T: std::str::FromStr,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T, InvalidEnvValue>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| InvalidEnvValue {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert!(config.database_url.starts_with("postgres://"));
    }

    #[test]
    fn test_parse_env_or_falls_back() {
        let value: u32 = parse_env_or("TOURNAMENTS_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_value_accepts_numbers() {
        let value: u32 = parse_value("DB_MAX_CONNECTIONS", Some(" 12 ".to_string()), 20).unwrap();
        assert_eq!(value, 12);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u32>("DB_MAX_CONNECTIONS", Some("abc".to_string()), 20)
            .unwrap_err();
        assert_eq!(err.key, "DB_MAX_CONNECTIONS");
        assert_eq!(err.value, "abc");
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
