//! Cross-venue arbitrage opportunity type and its spread math.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{ExchangeId, Symbol};
use super::money::Price;
use super::quote::Quote;

/// A detected cross-venue spread: buy at one venue's ask, sell at
/// another's bid.
///
/// Advisory only. Nothing here guarantees both legs execute; that is the
/// caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub symbol: Symbol,
    pub buy_exchange: ExchangeId,
    pub sell_exchange: ExchangeId,
    pub buy_price: Price,
    pub sell_price: Price,
    /// Gross relative spread: `(sell_bid - buy_ask) / buy_ask`.
    pub spread: Decimal,
    /// Spread net of both legs' taker fees.
    pub net_spread: Decimal,
    pub estimated_fees: Decimal,
    /// Strictly greater than the configured threshold.
    pub profitable: bool,
    /// Freshness score in [0, 1]; decays as the older quote's age
    /// approaches the stale window.
    pub confidence: Decimal,
    pub detected_at: DateTime<Utc>,
}

impl ArbitrageOpportunity {
    /// Evaluate one direction of a venue pair: buying `buy`'s ask and
    /// selling `sell`'s bid.
    ///
    /// Returns `None` when either quote side is non-positive, which keeps
    /// crossed or empty books out of the pair scan.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        symbol: &Symbol,
        buy_exchange: &ExchangeId,
        buy_quote: &Quote,
        buy_fee: Decimal,
        sell_exchange: &ExchangeId,
        sell_quote: &Quote,
        sell_fee: Decimal,
        threshold: Decimal,
        stale_window: Duration,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if buy_quote.ask <= Decimal::ZERO || sell_quote.bid <= Decimal::ZERO {
            return None;
        }

        let spread = (sell_quote.bid - buy_quote.ask) / buy_quote.ask;
        let estimated_fees = buy_fee + sell_fee;
        let net_spread = spread - estimated_fees;

        Some(Self {
            symbol: symbol.clone(),
            buy_exchange: buy_exchange.clone(),
            sell_exchange: sell_exchange.clone(),
            buy_price: buy_quote.ask,
            sell_price: sell_quote.bid,
            spread,
            net_spread,
            estimated_fees,
            profitable: net_spread > threshold,
            confidence: confidence(buy_quote, sell_quote, stale_window, now),
            detected_at: now,
        })
    }
}

/// Freshness confidence: `max(0, 1 - max(age_buy, age_sell) / window)`.
///
/// Stale quotes push confidence toward zero without being excluded.
fn confidence(buy: &Quote, sell: &Quote, window: Duration, now: DateTime<Utc>) -> Decimal {
    let window_ms = Decimal::from(window.as_millis().max(1) as u64);
    let oldest_ms = buy
        .age(now)
        .max(sell.age(now))
        .num_milliseconds()
        .max(0);
    let ratio = Decimal::from(oldest_ms as u64) / window_ms;
    (Decimal::ONE - ratio).max(Decimal::ZERO)
}
