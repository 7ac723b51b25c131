//! # Configuration
//!
//! Runtime settings for one kiosk terminal, read from environment variables on top of
//! built-in defaults.
//!
//! | Variable                     | Default       | Meaning                                  |
//! |------------------------------|---------------|------------------------------------------|
//! | `KIOSK_ORDER_LOG`            | `orders.json` | Path of the durable order log            |
//! | `KIOSK_KITCHEN_HOST`         | `localhost`   | Kitchen listener host                    |
//! | `KIOSK_KITCHEN_PORT`         | `9999`        | Kitchen listener port                    |
//! | `KIOSK_KITCHEN_TIMEOUT_SECS` | `5`           | Bound on connect and on every read/write |
//! | `KIOSK_KITCHEN_DISABLED`     | unset         | `1`/`true`/`yes`: local-only checkout    |
//! | `KIOSK_DEFAULT_ORDER_TYPE`   | `매장`        | Order type of each new session           |

use crate::model::OrderType;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_ORDER_LOG: &str = "KIOSK_ORDER_LOG";
pub const ENV_KITCHEN_HOST: &str = "KIOSK_KITCHEN_HOST";
pub const ENV_KITCHEN_PORT: &str = "KIOSK_KITCHEN_PORT";
pub const ENV_KITCHEN_TIMEOUT_SECS: &str = "KIOSK_KITCHEN_TIMEOUT_SECS";
pub const ENV_KITCHEN_DISABLED: &str = "KIOSK_KITCHEN_DISABLED";
pub const ENV_DEFAULT_ORDER_TYPE: &str = "KIOSK_DEFAULT_ORDER_TYPE";

/// Errors raised while reading configuration values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("KIOSK_KITCHEN_PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("KIOSK_KITCHEN_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("unknown order type '{0}', expected 매장/dine_in or 포장/take_out")]
    InvalidOrderType(String),
}

/// Where and how to reach the kitchen listener.
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenConfig {
    pub host: String,
    pub port: u16,
    /// Bounds the connect and each subsequent read or write.
    pub timeout: Duration,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9999,
            timeout: Duration::from_secs(5),
        }
    }
}

impl KitchenConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KioskConfig {
    pub order_log_path: PathBuf,
    /// Order type each new session starts with.
    pub default_order_type: OrderType,
    /// `None` runs checkout in local-only mode.
    pub kitchen: Option<KitchenConfig>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            order_log_path: PathBuf::from("orders.json"),
            default_order_type: OrderType::default(),
            kitchen: Some(KitchenConfig::default()),
        }
    }
}

impl KioskConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_ORDER_LOG) {
            config.order_log_path = PathBuf::from(path);
        }
        if let Some(order_type) = lookup(ENV_DEFAULT_ORDER_TYPE) {
            config.default_order_type = order_type.trim().parse()?;
        }

        let disabled = lookup(ENV_KITCHEN_DISABLED)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if disabled {
            config.kitchen = None;
            return Ok(config);
        }

        let mut kitchen = KitchenConfig::default();
        if let Some(host) = lookup(ENV_KITCHEN_HOST) {
            kitchen.host = host;
        }
        if let Some(port) = lookup(ENV_KITCHEN_PORT) {
            kitchen.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(secs) = lookup(ENV_KITCHEN_TIMEOUT_SECS) {
            let parsed: f64 = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(secs.clone()))?;
            if !parsed.is_finite() || parsed <= 0.0 {
                return Err(ConfigError::InvalidTimeout(secs));
            }
            kitchen.timeout = Duration::from_secs_f64(parsed);
        }
        config.kitchen = Some(kitchen);

        Ok(config)
    }
}
