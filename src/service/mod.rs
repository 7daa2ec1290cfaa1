//! Service layer: aggregation, routing, arbitrage detection, health
//! monitoring, metrics, and event notification, composed by the
//! integration service.

mod aggregator;
mod arbitrage;
mod events;
mod fanout;
mod health;
mod integration;
mod metrics;
mod quotes;
mod router;

pub use aggregator::MarketDataAggregator;
pub use arbitrage::{ArbitrageConfig, ArbitrageEngine};
pub use events::{Event, LogNotifier, MarketDataEvent, Notifier, NotifierRegistry, NullNotifier};
pub use fanout::fan_out;
pub use health::{HealthMonitor, HealthMonitorConfig};
pub use integration::IntegrationService;
pub use metrics::{RoutingMetrics, RoutingMetricsRecorder, ServiceMetrics};
pub use quotes::gather_quotes;
pub use router::{visible_liquidity, MarketAnalysis, SmartOrderRouter, VenueDepth};
