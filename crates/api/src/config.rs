//! Runtime configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "STOCKROOM_BIND_ADDR";
pub const MAX_AMOUNT_VAR: &str = "STOCKROOM_MAX_AMOUNT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_AMOUNT: i64 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Largest amount a single request may add or remove.
    pub max_amount: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (env, file, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr: SocketAddr = match lookup(BIND_ADDR_VAR) {
            Some(raw) => raw.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: BIND_ADDR_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => {
                tracing::info!("{BIND_ADDR_VAR} not set; using {DEFAULT_BIND_ADDR}");
                ApiConfig::default().bind_addr
            }
        };

        let max_amount = match lookup(MAX_AMOUNT_VAR) {
            Some(raw) => parse_max_amount(&raw)?,
            None => DEFAULT_MAX_AMOUNT,
        };

        Ok(Self {
            bind_addr,
            max_amount,
        })
    }
}

fn parse_max_amount(raw: &str) -> Result<i64, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: MAX_AMOUNT_VAR,
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: i64 = raw.trim().parse().map_err(|_| invalid("not an integer"))?;
    if value <= 0 {
        return Err(invalid("must be positive"));
    }
    Ok(value)
}
