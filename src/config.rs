//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for credentials (`CROSSBOOK_API_KEY_<EXCHANGE>` /
//! `CROSSBOOK_API_SECRET_<EXCHANGE>`); secrets are never read from the
//! config file.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::exchange;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Venue entries, one per exchange.
    pub exchanges: Vec<ExchangeConfig>,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One venue entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Venue name ("binance", "kraken", ...).
    pub name: String,
    /// Routing tie-break order; lower wins.
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Loaded from `CROSSBOOK_API_KEY_<EXCHANGE>` at runtime.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Loaded from `CROSSBOOK_API_SECRET_<EXCHANGE>` at runtime.
    #[serde(skip)]
    pub api_secret: Option<String>,
}

fn default_priority() -> u32 {
    100
}

const fn default_true() -> bool {
    true
}

/// Service-level tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Deadline for each per-adapter call during fan-outs.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Health monitor poll interval.
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
    /// Fixed delay before each reconnection attempt.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Strict minimum net spread for an opportunity to be profitable.
    #[serde(default = "default_arbitrage_threshold")]
    pub arbitrage_threshold: Decimal,
    /// Window after which quote confidence decays to zero.
    #[serde(default = "default_max_stale_window_secs")]
    pub max_stale_window_secs: u64,
    /// TTL for the in-memory quote cache.
    #[serde(default = "default_quote_ttl_ms")]
    pub quote_ttl_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    2_000
}

fn default_health_check_interval_secs() -> u64 {
    30
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_arbitrage_threshold() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

fn default_max_stale_window_secs() -> u64 {
    10
}

fn default_quote_ttl_ms() -> u64 {
    2_000
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn max_stale_window(&self) -> Duration {
        Duration::from_secs(self.max_stale_window_secs)
    }

    pub fn quote_ttl(&self) -> Duration {
        Duration::from_millis(self.quote_ttl_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            health_check_interval_secs: default_health_check_interval_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            arbitrage_threshold: default_arbitrage_threshold(),
            max_stale_window_secs: default_max_stale_window_secs(),
            quote_ttl_ms: default_quote_ttl_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load from a TOML file, apply environment credential overrides,
    /// and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        for exchange in &mut config.exchanges {
            let suffix = exchange.name.to_uppercase();
            exchange.api_key = std::env::var(format!("CROSSBOOK_API_KEY_{suffix}")).ok();
            exchange.api_secret = std::env::var(format!("CROSSBOOK_API_SECRET_{suffix}")).ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that hold for any source of the config.
    pub fn validate(&self) -> Result<()> {
        if self.exchanges.is_empty() {
            return Err(ConfigError::MissingField { field: "exchanges" }.into());
        }

        let mut seen = std::collections::HashSet::new();
        for exchange in &self.exchanges {
            if exchange.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "exchanges.name",
                }
                .into());
            }
            if !exchange::is_supported(&exchange.name) {
                return Err(ConfigError::UnsupportedExchange {
                    name: exchange.name.clone(),
                }
                .into());
            }
            if !seen.insert(exchange.name.to_lowercase()) {
                return Err(ConfigError::DuplicateExchange {
                    name: exchange.name.clone(),
                }
                .into());
            }
        }

        if self.service.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "service.request_timeout_ms",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.service.arbitrage_threshold < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "service.arbitrage_threshold",
                reason: "must be non-negative".into(),
            }
            .into());
        }
        if self.service.max_stale_window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "service.max_stale_window_secs",
                reason: "must be positive".into(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize the tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchanges: vec![
                ExchangeConfig {
                    name: "binance".into(),
                    priority: 1,
                    enabled: true,
                    api_key: None,
                    api_secret: None,
                },
                ExchangeConfig {
                    name: "kraken".into(),
                    priority: 2,
                    enabled: true,
                    api_key: None,
                    api_secret: None,
                },
            ],
            service: ServiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
