//! Best-execution order routing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{
    ExchangeId, OrderBook, OrderRequest, OrderSide, Price, RoutingPlan, Symbol, Volume,
};
use crate::error::{Error, Result};
use crate::exchange::{AdapterRegistry, FeeSchedule};

use super::fanout::fan_out;

/// Per-venue depth snapshot used by the routing decision.
#[derive(Debug, Clone)]
pub struct VenueDepth {
    pub exchange: ExchangeId,
    pub priority: u32,
    pub book: OrderBook,
    pub fees: FeeSchedule,
}

/// Everything the routing decision needs, gathered in one fan-out.
#[derive(Debug, Clone)]
pub struct MarketAnalysis {
    pub symbol: Symbol,
    pub venues: Vec<VenueDepth>,
}

/// Picks the venue that minimizes execution cost for a given order.
pub struct SmartOrderRouter {
    registry: Arc<AdapterRegistry>,
    request_timeout: Duration,
}

impl SmartOrderRouter {
    /// Create a router over the given registry.
    pub fn new(registry: Arc<AdapterRegistry>, request_timeout: Duration) -> Self {
        Self {
            registry,
            request_timeout,
        }
    }

    /// Concurrently fetch order book and fees from every enabled venue.
    ///
    /// Routing never reads the quote cache: decisions always use freshly
    /// fetched depth. Venues that fail the book fetch are excluded; a
    /// failed fee fetch falls back to the default schedule.
    pub async fn analyze_market(&self, symbol: &Symbol) -> MarketAnalysis {
        let adapters: Vec<_> = self
            .registry
            .enabled_adapters()
            .into_iter()
            .map(|(name, adapter, _)| (name, adapter))
            .collect();

        let symbol_for_call = symbol.clone();
        let depths = fan_out(&adapters, self.request_timeout, move |adapter| {
            let symbol = symbol_for_call.clone();
            async move {
                let book = adapter.order_book(&symbol).await?;
                let fees = adapter
                    .trading_fees(&symbol)
                    .await
                    .unwrap_or_default();
                Ok((book, fees))
            }
        })
        .await;

        let venues = depths
            .into_iter()
            .map(|(exchange, (book, fees))| VenueDepth {
                priority: self.registry.priority_of(&exchange).unwrap_or(u32::MAX),
                exchange,
                book,
                fees,
            })
            .collect();

        MarketAnalysis {
            symbol: symbol.clone(),
            venues,
        }
    }

    /// Select the venue with the best effective price for the request.
    ///
    /// Pure function of the analysis: walk each venue's book for the full
    /// quantity, keep only venues that can fill it, minimize effective
    /// price for a buy (maximize for a sell), break exact ties by
    /// priority ascending.
    pub fn find_optimal_routing(
        &self,
        request: &OrderRequest,
        analysis: &MarketAnalysis,
    ) -> Result<RoutingPlan> {
        request.validate()?;

        let mut best: Option<(Price, u32, &VenueDepth)> = None;
        for venue in &analysis.venues {
            let Some(effective) = venue.book.effective_price(request.side, request.quantity)
            else {
                debug!(
                    exchange = %venue.exchange,
                    symbol = %request.symbol,
                    quantity = %request.quantity,
                    "Venue cannot fill, excluding"
                );
                continue;
            };

            let candidate = (effective, venue.priority, venue);
            best = Some(match best.take() {
                None => candidate,
                Some(current) => pick(request.side, current, candidate),
            });
        }

        let Some((effective_price, _, venue)) = best else {
            return Err(Error::InsufficientLiquidity {
                symbol: request.symbol.clone(),
                quantity: request.quantity,
            });
        };

        info!(
            order_id = %request.id,
            symbol = %request.symbol,
            side = %request.side,
            exchange = %venue.exchange,
            effective_price = %effective_price,
            "Routing selected"
        );

        Ok(RoutingPlan::single(
            request.clone(),
            venue.exchange.clone(),
            effective_price,
        ))
    }
}

/// Choose between two fillable venues: better effective price wins, an
/// exact price tie goes to the lower priority number.
fn pick<'a>(
    side: OrderSide,
    current: (Price, u32, &'a VenueDepth),
    candidate: (Price, u32, &'a VenueDepth),
) -> (Price, u32, &'a VenueDepth) {
    let better = match side {
        OrderSide::Buy => candidate.0 < current.0,
        OrderSide::Sell => candidate.0 > current.0,
    };
    if better || (candidate.0 == current.0 && candidate.1 < current.1) {
        candidate
    } else {
        current
    }
}

/// Quantity a venue can fill at any price, used for diagnostics.
pub fn visible_liquidity(book: &OrderBook, side: OrderSide) -> Volume {
    let levels = match side {
        OrderSide::Buy => book.asks(),
        OrderSide::Sell => book.bids(),
    };
    levels.iter().map(|level| level.size).sum()
}
