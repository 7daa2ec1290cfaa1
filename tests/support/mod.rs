#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crossbook::config::{Config, ExchangeConfig, LoggingConfig, ServiceConfig};
use crossbook::domain::{OrderBook, PriceLevel, Symbol};
use crossbook::exchange::AdapterFactory;
use crossbook::service::{IntegrationService, NotifierRegistry};
use crossbook::testkit::RecordingNotifier;

/// Config over the given venues with test-friendly timeouts.
pub fn config_for(venues: &[(&str, u32)]) -> Config {
    Config {
        exchanges: venues
            .iter()
            .map(|(name, priority)| ExchangeConfig {
                name: (*name).to_string(),
                priority: *priority,
                enabled: true,
                api_key: None,
                api_secret: None,
            })
            .collect(),
        service: ServiceConfig {
            request_timeout_ms: 250,
            health_check_interval_secs: 1,
            reconnect_delay_secs: 1,
            arbitrage_threshold: dec!(0.001),
            max_stale_window_secs: 10,
            quote_ttl_ms: 2_000,
        },
        logging: LoggingConfig::default(),
    }
}

/// An initialized service plus a recorder observing its events.
pub async fn init_service(
    config: Config,
    factory: Arc<dyn AdapterFactory>,
) -> (IntegrationService, RecordingNotifier) {
    let recorder = RecordingNotifier::new();
    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(recorder.clone()));

    let service = IntegrationService::new(config, factory, notifiers);
    service.initialize().await.expect("initialize service");
    (service, recorder)
}

/// One-sided ask book for buy-routing scenarios.
pub fn ask_book(symbol: &str, levels: &[(Decimal, Decimal)]) -> OrderBook {
    OrderBook::with_levels(
        Symbol::from(symbol),
        vec![],
        levels
            .iter()
            .map(|(price, size)| PriceLevel::new(*price, *size))
            .collect(),
    )
}

/// One-sided bid book for sell-routing scenarios.
pub fn bid_book(symbol: &str, levels: &[(Decimal, Decimal)]) -> OrderBook {
    OrderBook::with_levels(
        Symbol::from(symbol),
        levels
            .iter()
            .map(|(price, size)| PriceLevel::new(*price, *size))
            .collect(),
        vec![],
    )
}
