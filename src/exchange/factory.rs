//! Adapter construction keyed by venue name.

use std::sync::Arc;

use crate::config::ExchangeConfig;
use crate::error::ConfigError;

use super::traits::ExchangeAdapter;

/// Venue names this core recognizes at configuration time.
///
/// Recognition is only a naming contract: the matching transport lives in
/// the adapter crate (or test double) supplied through [`AdapterFactory`].
pub const SUPPORTED_EXCHANGES: &[&str] = &[
    "binance", "coinbase", "kraken", "bitfinex", "huobi", "okx", "bybit", "kucoin",
];

/// Whether a venue name is recognized.
pub fn is_supported(name: &str) -> bool {
    SUPPORTED_EXCHANGES.contains(&name.to_lowercase().as_str())
}

/// Builds one adapter per configured venue.
///
/// Injected into the integration service so the core stays free of
/// concrete transports; the `testkit` mock factory is the in-crate
/// implementation.
pub trait AdapterFactory: Send + Sync {
    /// Build the adapter for one venue entry.
    ///
    /// An unknown venue name fails with
    /// [`ConfigError::UnsupportedExchange`].
    fn build(&self, config: &ExchangeConfig) -> Result<Arc<dyn ExchangeAdapter>, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_venues_case_insensitively() {
        assert!(is_supported("binance"));
        assert!(is_supported("Kraken"));
        assert!(is_supported("OKX"));
    }

    #[test]
    fn rejects_unknown_venues() {
        assert!(!is_supported("mtgox"));
        assert!(!is_supported(""));
    }
}
