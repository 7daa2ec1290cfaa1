//! Routing plan produced by the smart order router.

use serde::{Deserialize, Serialize};

use super::ids::ExchangeId;
use super::money::{Price, Volume};
use super::order::OrderRequest;

/// One fill leg of a routing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingLeg {
    pub exchange: ExchangeId,
    pub quantity: Volume,
    pub price: Price,
}

/// The router's selection for an order.
///
/// Invariant: leg quantities sum to the requested quantity. The baseline
/// router emits exactly one leg; the sequence shape leaves room for a
/// splitting router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingPlan {
    pub request: OrderRequest,
    pub selected: ExchangeId,
    pub expected_effective_price: Price,
    pub legs: Vec<RoutingLeg>,
}

impl RoutingPlan {
    /// Build a single-venue plan covering the full requested quantity.
    pub fn single(request: OrderRequest, exchange: ExchangeId, effective_price: Price) -> Self {
        let leg = RoutingLeg {
            exchange: exchange.clone(),
            quantity: request.quantity,
            price: effective_price,
        };
        Self {
            request,
            selected: exchange,
            expected_effective_price: effective_price,
            legs: vec![leg],
        }
    }

    /// Total quantity across all legs.
    pub fn total_quantity(&self) -> Volume {
        self.legs.iter().map(|leg| leg.quantity).sum()
    }
}
