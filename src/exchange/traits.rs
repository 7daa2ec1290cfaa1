//! Exchange adapter trait definitions.
//!
//! These traits define the capability interface any venue implementation
//! must provide. Concrete transports (REST, WebSocket) belong to the
//! implementations; the core only sees this contract.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ConnectionState, ExchangeHealth, ExchangeId, OrderAck, OrderBook, OrderId, OrderRequest,
    OrderStatus, Quote, Symbol, DEFAULT_TAKER_FEE,
};
use crate::error::ExchangeError;

/// Maker/taker fee schedule for a symbol on one venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub maker: Decimal,
    pub taker: Decimal,
}

impl FeeSchedule {
    /// Flat schedule using the same rate for both sides.
    pub const fn flat(rate: Decimal) -> Self {
        Self {
            maker: rate,
            taker: rate,
        }
    }
}

impl Default for FeeSchedule {
    /// Conservative fallback used when a venue's schedule is unavailable.
    fn default() -> Self {
        Self::flat(DEFAULT_TAKER_FEE)
    }
}

/// Capability interface implemented per venue.
///
/// Adapters are shared behind `Arc` across concurrent fan-outs, so every
/// method takes `&self`; connection state lives in interior-mutable
/// storage (see [`ConnectionTracker`](crate::exchange::ConnectionTracker)).
///
/// Market-data reads enforce their own transport deadline and map
/// failures into [`ExchangeError`]; the service layer wraps fan-out calls
/// in a second outer deadline, so a hung adapter can never stall an
/// aggregate operation.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Venue name this adapter fronts.
    fn name(&self) -> &ExchangeId;

    /// Current connection state. Single point of truth, updated
    /// atomically by the adapter.
    fn state(&self) -> ConnectionState;

    /// Establish the venue connection.
    async fn connect(&self) -> Result<(), ExchangeError>;

    /// Tear down the venue connection.
    async fn disconnect(&self) -> Result<(), ExchangeError>;

    /// Disconnect then connect. Persistent failures surface through the
    /// returned error, never silently.
    async fn reconnect(&self) -> Result<(), ExchangeError> {
        self.disconnect().await?;
        self.connect().await
    }

    /// Fetch the order book for a symbol.
    async fn order_book(&self, symbol: &Symbol) -> Result<OrderBook, ExchangeError>;

    /// Fetch the latest ticker quote for a symbol.
    async fn ticker(&self, symbol: &Symbol) -> Result<Quote, ExchangeError>;

    /// Fetch the maker/taker fee schedule for a symbol.
    async fn trading_fees(&self, symbol: &Symbol) -> Result<FeeSchedule, ExchangeError>;

    /// Submit an order to the venue.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError>;

    /// Cancel a resting order.
    async fn cancel_order(&self, order_id: &OrderId) -> Result<(), ExchangeError>;

    /// Query the lifecycle state of an order.
    async fn order_status(&self, order_id: &OrderId) -> Result<OrderStatus, ExchangeError>;

    /// Cheap, non-blocking health snapshot derived from the last known
    /// connection state and heartbeat. Must never fail.
    fn health(&self) -> ExchangeHealth;
}
