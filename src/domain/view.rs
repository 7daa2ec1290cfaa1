//! Aggregated multi-venue market view.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{ExchangeId, Symbol};
use super::money::{Price, Volume};
use super::quote::Quote;

/// Best bid/ask across venues, with attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestQuotes {
    pub bid: Price,
    pub ask: Price,
    pub bid_exchange: ExchangeId,
    pub ask_exchange: ExchangeId,
}

/// Volume-weighted blended prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedAverages {
    pub bid: Price,
    pub ask: Price,
    pub mid: Price,
}

/// Reported volume, total and per venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBreakdown {
    pub total: Volume,
    pub by_exchange: BTreeMap<ExchangeId, Volume>,
}

/// Per-venue relative spread extremes and mean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadSummary {
    pub tightest: Decimal,
    pub tightest_exchange: ExchangeId,
    pub widest: Decimal,
    pub widest_exchange: ExchangeId,
    pub average: Decimal,
}

/// One fused view over every venue that answered a ticker fan-out.
///
/// Invariants: `best.bid` is the maximum of all contributing bids and
/// `best.ask` the minimum of all contributing asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedMarketView {
    pub symbol: Symbol,
    pub quotes: BTreeMap<ExchangeId, Quote>,
    pub best: BestQuotes,
    pub weighted: WeightedAverages,
    pub volume: VolumeBreakdown,
    pub spread: SpreadSummary,
}

impl AggregatedMarketView {
    /// Fuse per-venue quotes into one view.
    ///
    /// Returns `None` on an empty input; the aggregator turns that into
    /// an `AggregationFailed` error.
    pub fn fuse(symbol: Symbol, quotes: BTreeMap<ExchangeId, Quote>) -> Option<Self> {
        let (bid_exchange, best_bid) = quotes
            .iter()
            .max_by_key(|(_, quote)| quote.bid)
            .map(|(exchange, quote)| (exchange.clone(), quote.bid))?;
        let (ask_exchange, best_ask) = quotes
            .iter()
            .min_by_key(|(_, quote)| quote.ask)
            .map(|(exchange, quote)| (exchange.clone(), quote.ask))?;

        let total_volume: Volume = quotes.values().map(|quote| quote.volume_24h).sum();
        let count = Decimal::from(quotes.len() as u64);

        // Volume-weighted averages; arithmetic mean when no venue reports
        // volume.
        let (avg_bid, avg_ask) = if total_volume.is_zero() {
            (
                quotes.values().map(|q| q.bid).sum::<Decimal>() / count,
                quotes.values().map(|q| q.ask).sum::<Decimal>() / count,
            )
        } else {
            (
                quotes
                    .values()
                    .map(|q| q.bid * q.volume_24h)
                    .sum::<Decimal>()
                    / total_volume,
                quotes
                    .values()
                    .map(|q| q.ask * q.volume_24h)
                    .sum::<Decimal>()
                    / total_volume,
            )
        };

        let (tightest_exchange, tightest) = quotes
            .iter()
            .map(|(exchange, quote)| (exchange.clone(), quote.spread_fraction()))
            .min_by_key(|(_, spread)| *spread)?;
        let (widest_exchange, widest) = quotes
            .iter()
            .map(|(exchange, quote)| (exchange.clone(), quote.spread_fraction()))
            .max_by_key(|(_, spread)| *spread)?;
        let average_spread = quotes
            .values()
            .map(Quote::spread_fraction)
            .sum::<Decimal>()
            / count;

        let by_exchange = quotes
            .iter()
            .map(|(exchange, quote)| (exchange.clone(), quote.volume_24h))
            .collect();

        Some(Self {
            symbol,
            best: BestQuotes {
                bid: best_bid,
                ask: best_ask,
                bid_exchange,
                ask_exchange,
            },
            weighted: WeightedAverages {
                bid: avg_bid,
                ask: avg_ask,
                mid: (avg_bid + avg_ask) / Decimal::TWO,
            },
            volume: VolumeBreakdown {
                total: total_volume,
                by_exchange,
            },
            spread: SpreadSummary {
                tightest,
                tightest_exchange,
                widest,
                widest_exchange,
                average: average_spread,
            },
            quotes,
        })
    }
}
