use thiserror::Error;

use crate::domain::{ExchangeId, OrderId, Symbol};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unsupported exchange: {name}")]
    UnsupportedExchange { name: String },

    #[error("duplicate exchange entry: {name}")]
    DuplicateExchange { name: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Per-adapter transport and venue errors.
///
/// These are caught and logged during fan-outs; they never propagate
/// individually to callers of the aggregate operations.
#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("call exceeded deadline of {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("rate limited by venue")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("not connected")]
    NotConnected,

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("unknown order: {0}")]
    UnknownOrder(OrderId),

    #[error("symbol not listed: {0}")]
    SymbolNotListed(Symbol),
}

/// Order validation errors, raised before any adapter is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order quantity must be positive, got {quantity}")]
    NonPositiveQuantity { quantity: rust_decimal::Decimal },

    #[error("order symbol must not be empty")]
    EmptySymbol,

    #[error("limit price must be positive, got {price}")]
    NonPositiveLimitPrice { price: rust_decimal::Decimal },

    #[error("max slippage must be non-negative, got {slippage}")]
    NegativeSlippage { slippage: rust_decimal::Decimal },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("insufficient liquidity: no venue can fill {quantity} {symbol}")]
    InsufficientLiquidity {
        symbol: Symbol,
        quantity: rust_decimal::Decimal,
    },

    #[error("aggregation failed: no venue responded for {symbol}")]
    AggregationFailed { symbol: Symbol },

    #[error("no such exchange: {0}")]
    UnknownExchange(ExchangeId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
