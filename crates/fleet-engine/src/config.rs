//! Engine configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fleet_db::DbConfig;

use crate::allocation::AllocationPolicy;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Fleet Supply configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool ceiling
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub db_connect_timeout_secs: u64,

    pub environment: Environment,

    /// Attach internal error detail to responses
    pub expose_error_detail: bool,

    /// Assign also takes the quantity out of the pool
    pub decrement_pool_on_assign: bool,

    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        FleetConfig {
            database_path: PathBuf::from("./fleet_supply.db"),
            db_max_connections: 5,
            db_connect_timeout_secs: 30,
            environment: Environment::Development,
            expose_error_detail: true,
            decrement_pool_on_assign: false,
            log_level: "info".to_string(),
        }
    }
}

impl FleetConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = lookup("FLEET_ENV")
            .unwrap_or_else(|| "development".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("FLEET_ENV".to_string()))?;

        let config = FleetConfig {
            database_path: lookup("FLEET_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./fleet_supply.db")),

            db_max_connections: lookup("FLEET_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FLEET_DB_MAX_CONNECTIONS".to_string()))?,

            db_connect_timeout_secs: lookup("FLEET_DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("FLEET_DB_CONNECT_TIMEOUT_SECS".to_string())
                })?,

            environment,

            expose_error_detail: match lookup("FLEET_EXPOSE_ERROR_DETAIL") {
                Some(raw) => parse_flag("FLEET_EXPOSE_ERROR_DETAIL", &raw)?,
                None => environment != Environment::Production,
            },

            decrement_pool_on_assign: match lookup("FLEET_DECREMENT_POOL_ON_ASSIGN") {
                Some(raw) => parse_flag("FLEET_DECREMENT_POOL_ON_ASSIGN", &raw)?,
                None => false,
            },

            log_level: lookup("FLEET_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "FLEET_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.db_connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "FLEET_DB_CONNECT_TIMEOUT_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Pool settings for [`fleet_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }

    pub fn allocation_policy(&self) -> AllocationPolicy {
        AllocationPolicy {
            decrement_pool_on_assign: self.decrement_pool_on_assign,
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<FleetConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FleetConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./fleet_supply.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_config().connect_timeout, Duration::from_secs(30));
        assert_eq!(config.environment, Environment::Development);
        assert!(config.expose_error_detail);
        assert!(!config.decrement_pool_on_assign);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_production_hides_detail() {
        let config = load(&[("FLEET_ENV", "production")]).unwrap();
        assert!(config.is_production());
        assert!(!config.expose_error_detail);

        let config = load(&[
            ("FLEET_ENV", "production"),
            ("FLEET_EXPOSE_ERROR_DETAIL", "true"),
        ])
        .unwrap();
        assert!(config.expose_error_detail);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FLEET_DATABASE_PATH", "/tmp/fleet.db"),
            ("FLEET_DB_MAX_CONNECTIONS", "8"),
            ("FLEET_DB_CONNECT_TIMEOUT_SECS", "5"),
            ("FLEET_DECREMENT_POOL_ON_ASSIGN", "yes"),
        ])
        .unwrap();
        assert_eq!(config.db_config().max_connections, 8);
        assert_eq!(config.db_config().connect_timeout, Duration::from_secs(5));
        assert_eq!(config.db_config().database_path, PathBuf::from("/tmp/fleet.db"));
        assert!(config.allocation_policy().decrement_pool_on_assign);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("FLEET_DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for FLEET_DB_MAX_CONNECTIONS");

        assert!(load(&[("FLEET_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("FLEET_DB_CONNECT_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("FLEET_DB_CONNECT_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("FLEET_ENV", "staging")]).is_err());
        assert!(load(&[("FLEET_DECREMENT_POOL_ON_ASSIGN", "maybe")]).is_err());
    }
}
