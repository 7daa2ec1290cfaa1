//! Order request and lifecycle types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

use super::ids::{ExchangeId, OrderId, Symbol};
use super::money::{Price, Volume};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum OrderType {
    Market,
    Limit { price: Price },
}

/// An order to be routed and (eventually) executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Volume,
    pub order_type: OrderType,
    /// Maximum tolerated slippage as a fraction (e.g. 0.02 = 2%).
    pub max_slippage: Option<Decimal>,
}

impl OrderRequest {
    /// Build a market order with a generated ID.
    pub fn market(symbol: impl Into<Symbol>, side: OrderSide, quantity: Volume) -> Self {
        Self {
            id: OrderId::generate(),
            symbol: symbol.into(),
            side,
            quantity,
            order_type: OrderType::Market,
            max_slippage: None,
        }
    }

    /// Build a limit order with a generated ID.
    pub fn limit(
        symbol: impl Into<Symbol>,
        side: OrderSide,
        quantity: Volume,
        price: Price,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            symbol: symbol.into(),
            side,
            quantity,
            order_type: OrderType::Limit { price },
            max_slippage: None,
        }
    }

    /// Set the slippage bound.
    pub fn with_max_slippage(mut self, slippage: Decimal) -> Self {
        self.max_slippage = Some(slippage);
        self
    }

    /// Validate the request. Called before any adapter is contacted.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.symbol.is_empty() {
            return Err(OrderError::EmptySymbol);
        }
        if self.quantity <= Decimal::ZERO {
            return Err(OrderError::NonPositiveQuantity {
                quantity: self.quantity,
            });
        }
        if let OrderType::Limit { price } = self.order_type {
            if price <= Decimal::ZERO {
                return Err(OrderError::NonPositiveLimitPrice { price });
            }
        }
        if let Some(slippage) = self.max_slippage {
            if slippage < Decimal::ZERO {
                return Err(OrderError::NegativeSlippage { slippage });
            }
        }
        Ok(())
    }
}

/// Venue acknowledgement of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: OrderId,
    pub exchange: ExchangeId,
    pub status: OrderStatus,
    pub accepted_at: DateTime<Utc>,
}

/// Lifecycle state of an order on a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum OrderStatus {
    Open,
    PartiallyFilled { filled: Volume },
    Filled { average_price: Price },
    Cancelled,
    Rejected { reason: String },
}

impl OrderStatus {
    /// Whether the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled { .. } | Self::Cancelled | Self::Rejected { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_validates() {
        let order = OrderRequest::market("BTC/USDT", OrderSide::Buy, dec!(1.5));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let order = OrderRequest::market("BTC/USDT", OrderSide::Buy, dec!(0));
        assert_eq!(
            order.validate(),
            Err(OrderError::NonPositiveQuantity { quantity: dec!(0) })
        );
    }

    #[test]
    fn empty_symbol_is_rejected() {
        let order = OrderRequest::market("", OrderSide::Sell, dec!(1));
        assert_eq!(order.validate(), Err(OrderError::EmptySymbol));
    }

    #[test]
    fn non_positive_limit_price_is_rejected() {
        let order = OrderRequest::limit("ETH/USDT", OrderSide::Buy, dec!(1), dec!(0));
        assert_eq!(
            order.validate(),
            Err(OrderError::NonPositiveLimitPrice { price: dec!(0) })
        );
    }

    #[test]
    fn negative_slippage_is_rejected() {
        let order = OrderRequest::market("BTC/USDT", OrderSide::Buy, dec!(1))
            .with_max_slippage(dec!(-0.01));
        assert_eq!(
            order.validate(),
            Err(OrderError::NegativeSlippage {
                slippage: dec!(-0.01)
            })
        );
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Filled {
            average_price: dec!(100)
        }
        .is_terminal());
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::PartiallyFilled { filled: dec!(0.5) }.is_terminal());
    }
}
