//! Order book types and the effective-price book walk.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::Symbol;
use super::money::{Price, Volume};
use super::order::OrderSide;

/// A single price level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub size: Volume,
}

impl PriceLevel {
    /// Create a new price level.
    pub const fn new(price: Price, size: Volume) -> Self {
        Self { price, size }
    }
}

/// Order book for a symbol on one venue.
///
/// Bids are ordered best-first (descending price), asks best-first
/// (ascending price).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    symbol: Symbol,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// Create an empty order book stamped now.
    pub fn new(symbol: Symbol) -> Self {
        Self::with_levels(symbol, Vec::new(), Vec::new())
    }

    /// Create an order book with initial levels.
    ///
    /// Levels are sorted into canonical order (bids descending, asks
    /// ascending) so adapters can hand over venue payloads as-is.
    pub fn with_levels(symbol: Symbol, mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            symbol,
            bids,
            asks,
            timestamp: Utc::now(),
        }
    }

    /// Get the symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get all bid levels, best (highest) first.
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Get all ask levels, best (lowest) first.
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Snapshot timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Best bid (highest buy price).
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask (lowest sell price).
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Average fill price for `quantity` against the book.
    ///
    /// Walks the asks for a buy and the bids for a sell, consuming levels
    /// until the quantity is filled; effective price = total notional /
    /// quantity. Returns `None` when visible liquidity cannot fill the
    /// full quantity.
    pub fn effective_price(&self, side: OrderSide, quantity: Volume) -> Option<Price> {
        if quantity <= Decimal::ZERO {
            return None;
        }

        let levels = match side {
            OrderSide::Buy => &self.asks,
            OrderSide::Sell => &self.bids,
        };

        let mut remaining = quantity;
        let mut notional = Decimal::ZERO;

        for level in levels {
            let take = remaining.min(level.size);
            notional += take * level.price;
            remaining -= take;
            if remaining.is_zero() {
                return Some(notional / quantity);
            }
        }

        None
    }
}
