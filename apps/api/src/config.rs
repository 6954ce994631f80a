//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first; real
//! environment variables win over it.
//!
//! | Variable               | Default    |
//! |------------------------|------------|
//! | `HOST`                 | `0.0.0.0`  |
//! | `PORT`                 | `8080`     |
//! | `DB_CONN`              | `kasir.db` |
//! | `DB_MAX_CONNECTIONS`   | `5`        |
//! | `DB_BUSY_TIMEOUT_SECS` | `5`        |
//! | `STOCK_POLICY`         | `reject`   |

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kasir_core::StockPolicy;
use kasir_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to bind.
    pub host: IpAddr,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// How long a checkout waits for another checkout's write lock.
    pub busy_timeout: Duration,

    /// What checkout does when stock runs out.
    pub stock_policy: StockPolicy,
}

impl ApiConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&lookup, "PORT", 8080u16)?;

        let database_path = lookup("DB_CONN")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("kasir.db"));

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        let busy_timeout_secs = parse_or(&lookup, "DB_BUSY_TIMEOUT_SECS", 5u64)?;
        let stock_policy = parse_or(&lookup, "STOCK_POLICY", StockPolicy::Reject)?;

        Ok(ApiConfig {
            host,
            port,
            database_path,
            max_connections,
            busy_timeout: Duration::from_secs(busy_timeout_secs),
            stock_policy,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pool configuration for [`kasir_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let config = if self.database_path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.max_connections)
        };
        config.busy_timeout(self.busy_timeout)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
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

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("kasir.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.stock_policy, StockPolicy::Reject);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("DB_CONN", "/var/lib/kasir/kasir.db"),
            ("DB_MAX_CONNECTIONS", "8"),
            ("DB_BUSY_TIMEOUT_SECS", "2"),
            ("STOCK_POLICY", "backorder"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.stock_policy, StockPolicy::AllowBackorder);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.busy_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_values() {
        let err = ApiConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");

        assert!(ApiConfig::from_lookup(lookup(&[("STOCK_POLICY", "maybe")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
    }

    #[test]
    fn test_in_memory_database() {
        let config = ApiConfig::from_lookup(lookup(&[("DB_CONN", ":memory:")])).unwrap();
        assert!(config.db_config().is_in_memory());
    }
}
