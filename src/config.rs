use std::fmt;
use std::time::Duration;

use clap::{Args, Parser};
use deadpool_postgres::{Config as PgConfig, PoolConfig};

use crate::error::StoreError;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

/// Connection target and pool sizing for the relational store.
///
/// Every field can come from a flag or from the environment, so nothing about the
/// deployment is compiled in. Required values stay `Option` here and are checked by
/// [`StoreConfig::validate`], which lets a partially filled config be reported field by field.
#[derive(Args, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[arg(long = "db-host", env = "LIGHTBNB_DB_HOST")]
    pub host: Option<String>,
    #[arg(long = "db-port", env = "LIGHTBNB_DB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(long = "db-user", env = "LIGHTBNB_DB_USER")]
    pub user: Option<String>,
    #[arg(long = "db-password", env = "LIGHTBNB_DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(long = "db-name", env = "LIGHTBNB_DB_NAME")]
    pub dbname: Option<String>,
    #[arg(long, env = "LIGHTBNB_POOL_MAX_SIZE", default_value_t = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: usize,
    /// How long a checkout may wait for a free connection; unbounded when unset.
    #[arg(long, env = "LIGHTBNB_POOL_WAIT_TIMEOUT_SECS")]
    pub pool_wait_timeout_secs: Option<u64>,
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct EnvOnly {
    #[command(flatten)]
    config: StoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            user: None,
            password: None,
            dbname: None,
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            pool_wait_timeout_secs: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dbname", &self.dbname)
            .field("pool_max_size", &self.pool_max_size)
            .field("pool_wait_timeout_secs", &self.pool_wait_timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Read the configuration from `LIGHTBNB_*` environment variables only.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` if a variable holds an unparseable value.
    pub fn from_env() -> Result<Self, StoreError> {
        EnvOnly::try_parse_from(std::iter::empty::<String>())
            .map(|parsed| parsed.config)
            .map_err(|e| StoreError::ConfigError(e.to_string()))
    }

    /// Check that every connection field a pool needs is present.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.dbname.is_none() {
            return Err(StoreError::ConfigError("dbname is required".to_string()));
        }
        if self.host.is_none() {
            return Err(StoreError::ConfigError("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(StoreError::ConfigError("port is required".to_string()));
        }
        if self.user.is_none() {
            return Err(StoreError::ConfigError("user is required".to_string()));
        }
        if self.password.is_none() {
            return Err(StoreError::ConfigError("password is required".to_string()));
        }
        if self.pool_max_size == 0 {
            return Err(StoreError::ConfigError(
                "pool_max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The equivalent `deadpool_postgres` configuration.
    #[must_use]
    pub fn to_pg_config(&self) -> PgConfig {
        let mut pg_config = PgConfig::new();
        pg_config.host.clone_from(&self.host);
        pg_config.port = Some(self.port);
        pg_config.user.clone_from(&self.user);
        pg_config.password.clone_from(&self.password);
        pg_config.dbname.clone_from(&self.dbname);
        let mut pool = PoolConfig::new(self.pool_max_size);
        pool.timeouts.wait = self.pool_wait_timeout_secs.map(Duration::from_secs);
        pg_config.pool = Some(pool);
        pg_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> StoreConfig {
        StoreConfig {
            host: Some("localhost".into()),
            user: Some("labber".into()),
            password: Some("secret".into()),
            dbname: Some("lightbnb".into()),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn complete_config_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn missing_fields_are_named() {
        let mut cfg = complete();
        cfg.password = None;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: password is required");

        let err = StoreConfig::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: dbname is required");
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn pool_settings_carry_over() {
        let mut cfg = complete();
        cfg.pool_max_size = 4;
        cfg.pool_wait_timeout_secs = Some(3);
        let pg = cfg.to_pg_config();
        let pool = pg.pool.unwrap();
        assert_eq!(pool.max_size, 4);
        assert_eq!(pool.timeouts.wait, Some(Duration::from_secs(3)));
        assert_eq!(pg.port, Some(DEFAULT_PORT));
        assert_eq!(pg.dbname.as_deref(), Some("lightbnb"));
    }

    #[test]
    fn flags_parse_into_config() {
        let parsed = EnvOnly::try_parse_from([
            "--db-host",
            "db.internal",
            "--db-port",
            "6543",
            "--db-user",
            "app",
            "--db-password",
            "pw",
            "--db-name",
            "lightbnb",
        ])
        .unwrap();
        assert_eq!(parsed.config.host.as_deref(), Some("db.internal"));
        assert_eq!(parsed.config.port, 6543);
        assert!(parsed.config.validate().is_ok());
    }
}
