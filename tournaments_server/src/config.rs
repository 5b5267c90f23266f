//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{Ipv4Addr, SocketAddr};
use tournaments::db::DatabaseConfig;

/// Default bind address when neither `--bind` nor `SERVER_BIND` is given
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
    8080,
);

/// Which store backs the registries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through `sqlx`
    Postgres,
    /// Process-local store; contents are lost on shutdown
    InMemory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::Invalid {
                var: "STORAGE".to_string(),
                reason: format!("Unknown storage backend '{other}' (expected postgres or memory)"),
            }),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Storage backend
    pub storage: StorageBackend,
    /// Database configuration, used when `storage` is `Postgres`
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `in_memory` - Force the in-memory store (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if `SERVER_BIND`, `STORAGE`, or a `DB_*` pool setting is
    /// set but invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        in_memory: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("SERVER_BIND") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "SERVER_BIND".to_string(),
                    reason: format!("'{raw}' is not a socket address"),
                })?,
                Err(_) => DEFAULT_BIND,
            },
        };

        let storage = if in_memory {
            StorageBackend::InMemory
        } else {
            match std::env::var("STORAGE") {
                Ok(raw) => raw.parse()?,
                Err(_) => StorageBackend::Postgres,
            }
        };

        let mut database = DatabaseConfig::from_env().map_err(|e| ConfigError::Invalid {
            var: e.key,
            reason: format!("'{}' is not a valid number", e.value),
        })?;
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        Ok(ServerConfig {
            bind,
            storage,
            database,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::InMemory {
            return Ok(());
        }

        if self.database.database_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Set DATABASE_URL or run with --in-memory".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.database.connection_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_CONNECTION_TIMEOUT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            storage: StorageBackend::Postgres,
            database: DatabaseConfig {
                database_url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
                connection_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Use --in-memory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Use --in-memory"));
    }

    #[test]
    fn test_valid_config() {
        assert!(postgres_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_pool() {
        let mut config = postgres_config();
        config.database.max_connections = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_config_validation_min_above_max() {
        let mut config = postgres_config();
        config.database.min_connections = 20;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "DB_MIN_CONNECTIONS"));
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = postgres_config();
        config.database.database_url = "  ".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_in_memory_skips_database_checks() {
        let mut config = postgres_config();
        config.storage = StorageBackend::InMemory;
        config.database.max_connections = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "memory".parse::<StorageBackend>().unwrap(),
            StorageBackend::InMemory
        );
        assert_eq!(
            "Postgres".parse::<StorageBackend>().unwrap(),
            StorageBackend::Postgres
        );
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let bind: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let config = ServerConfig::from_env(
            Some(bind),
            Some("postgres://override/db".to_string()),
            true,
        )
        .unwrap();

        assert_eq!(config.bind, bind);
        assert_eq!(config.storage, StorageBackend::InMemory);
        assert_eq!(config.database.database_url, "postgres://override/db");
    }
}
