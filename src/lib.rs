//! Crossbook - one logical trading venue over N independently failing
//! exchanges.
//!
//! This crate provides the integration core for multi-exchange trading:
//! a capability-based adapter abstraction, concurrent fan-out queries
//! with partial-failure tolerance, a best-execution order router, a
//! cross-venue arbitrage detector with confidence scoring, a
//! volume-weighted market-data aggregator, and a connection-health /
//! reconnection state machine.
//!
//! # Architecture
//!
//! Control flow runs external caller ->
//! [`IntegrationService`](service::IntegrationService) -> registry ->
//! per-adapter fan-out -> aggregator/router/arbitrage engine -> result
//! plus emitted events.
//!
//! - **`exchange`** - The [`ExchangeAdapter`](exchange::ExchangeAdapter)
//!   capability trait venue implementations fulfill, the composed
//!   [`ConnectionTracker`](exchange::ConnectionTracker) they embed, and
//!   the registry/factory pair the service owns.
//! - **`service`** - The fan-out machinery and the four engines over it:
//!   [`MarketDataAggregator`](service::MarketDataAggregator),
//!   [`SmartOrderRouter`](service::SmartOrderRouter),
//!   [`ArbitrageEngine`](service::ArbitrageEngine), and
//!   [`HealthMonitor`](service::HealthMonitor).
//! - **`domain`** - Exchange-agnostic types: quotes, order books,
//!   routing plans, opportunities, health classifications.
//! - [`config`] - TOML configuration with environment credential
//!   overrides.
//! - [`error`] - Error taxonomy for the crate.
//!
//! Adapters for concrete venues live outside this core; it only sees the
//! capability trait. The `testkit` feature ships a scripted
//! [`MockExchange`](testkit::MockExchange) for integration testing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use crossbook::config::Config;
//! use crossbook::domain::{OrderRequest, OrderSide, Symbol};
//! use crossbook::service::{IntegrationService, LogNotifier, NotifierRegistry};
//! # use rust_decimal_macros::dec;
//!
//! # async fn run(factory: Arc<dyn crossbook::exchange::AdapterFactory>) -> crossbook::error::Result<()> {
//! let config = Config::load("crossbook.toml")?;
//! let mut notifiers = NotifierRegistry::new();
//! notifiers.register(Box::new(LogNotifier));
//!
//! let service = IntegrationService::new(config, factory, notifiers);
//! service.initialize().await?;
//!
//! let order = OrderRequest::market("BTC/USDT", OrderSide::Buy, dec!(0.5));
//! let plan = service.route_order(order).await?;
//! println!("routing to {}", plan.selected);
//!
//! let opportunities = service.detect_arbitrage(&Symbol::from("BTC/USDT")).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
