use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_ttl_days: i64,
    pub session_secure: bool,
    pub bcrypt_cost: u32,
    pub db_pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "flashdeck.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            session_ttl_days: 1,
            session_secure: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            db_pool_size: 8,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Missing keys fall back
    /// to the defaults; present but unparseable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            session_ttl_days: parse(&lookup, "SESSION_TTL_DAYS")?
                .filter(|days| *days > 0)
                .unwrap_or(defaults.session_ttl_days),
            session_secure: parse(&lookup, "SESSION_SECURE")?.unwrap_or(defaults.session_secure),
            bcrypt_cost: parse(&lookup, "BCRYPT_COST")?.unwrap_or(defaults.bcrypt_cost),
            db_pool_size: parse(&lookup, "DB_POOL_SIZE")?.unwrap_or(defaults.db_pool_size),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
