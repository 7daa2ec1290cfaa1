//! Exchange-agnostic domain types.

mod arbitrage;
mod health;
mod ids;
mod money;
mod order;
mod order_book;
mod quote;
mod routing;
mod view;

pub use arbitrage::ArbitrageOpportunity;
pub use health::{ConnectionState, ExchangeHealth, HealthState, OverallHealth, SystemHealth};
pub use ids::{ExchangeId, OrderId, Symbol};
pub use money::{Price, Volume, DEFAULT_TAKER_FEE};
pub use order::{OrderAck, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use order_book::{OrderBook, PriceLevel};
pub use quote::{Quote, QuoteCache};
pub use routing::{RoutingLeg, RoutingPlan};
pub use view::{
    AggregatedMarketView, BestQuotes, SpreadSummary, VolumeBreakdown, WeightedAverages,
};
