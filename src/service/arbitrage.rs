//! Cross-venue arbitrage detection.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{ArbitrageOpportunity, ExchangeId, Quote, QuoteCache, Symbol};
use crate::exchange::{AdapterRegistry, FeeSchedule};
use crate::service::events::{Event, NotifierRegistry};

use super::fanout::fan_out;
use super::quotes::gather_quotes;

/// Detector settings, sourced from `ServiceConfig`.
#[derive(Debug, Clone)]
pub struct ArbitrageConfig {
    /// Strict minimum net spread for profitability.
    pub threshold: Decimal,
    /// Window after which quote confidence decays to zero.
    pub stale_window: Duration,
    /// Deadline for each per-venue call.
    pub request_timeout: Duration,
}

/// Compares venue quote pairs to surface profitable cross-venue spreads.
pub struct ArbitrageEngine {
    registry: Arc<AdapterRegistry>,
    cache: Arc<QuoteCache>,
    notifiers: Arc<NotifierRegistry>,
    config: ArbitrageConfig,
}

impl ArbitrageEngine {
    /// Create an engine over the given registry and quote cache.
    pub fn new(
        registry: Arc<AdapterRegistry>,
        cache: Arc<QuoteCache>,
        notifiers: Arc<NotifierRegistry>,
        config: ArbitrageConfig,
    ) -> Self {
        Self {
            registry,
            cache,
            notifiers,
            config,
        }
    }

    /// Detect cross-venue opportunities for a symbol.
    ///
    /// Best-effort fan-out: a venue that errors or times out is omitted.
    /// Every unordered venue pair is evaluated in both directions; the
    /// result is sorted by net spread descending. Callers decide
    /// execution - an opportunity is advisory only.
    pub async fn detect(&self, symbol: &Symbol) -> Vec<ArbitrageOpportunity> {
        let quotes =
            gather_quotes(&self.registry, &self.cache, symbol, self.config.request_timeout)
                .await;
        if quotes.len() < 2 {
            debug!(
                symbol = %symbol,
                responded = quotes.len(),
                "Not enough venues for pair comparison"
            );
            return Vec::new();
        }

        let fees = self.gather_fees(symbol, &quotes).await;
        let now = Utc::now();

        let mut opportunities = Vec::new();
        for (i, (buy_name, buy_quote)) in quotes.iter().enumerate() {
            for (sell_name, sell_quote) in quotes.iter().skip(i + 1) {
                for (buy, buy_q, sell, sell_q) in [
                    (buy_name, buy_quote, sell_name, sell_quote),
                    (sell_name, sell_quote, buy_name, buy_quote),
                ] {
                    let opportunity = ArbitrageOpportunity::evaluate(
                        symbol,
                        buy,
                        buy_q,
                        taker_fee(&fees, buy),
                        sell,
                        sell_q,
                        taker_fee(&fees, sell),
                        self.config.threshold,
                        self.config.stale_window,
                        now,
                    );
                    if let Some(opportunity) = opportunity {
                        opportunities.push(opportunity);
                    }
                }
            }
        }

        opportunities.sort_by(|a, b| b.net_spread.cmp(&a.net_spread));

        for opportunity in opportunities.iter().filter(|o| o.profitable) {
            self.notifiers
                .notify_all(Event::OpportunityDetected(opportunity.clone()));
        }

        opportunities
    }

    /// Fetch fee schedules for the venues that produced quotes.
    ///
    /// Best-effort: a venue missing from the result falls back to the
    /// default taker rate rather than being excluded - hiding a real
    /// spread is worse than estimating its cost.
    async fn gather_fees(
        &self,
        symbol: &Symbol,
        quotes: &[(ExchangeId, Quote)],
    ) -> Vec<(ExchangeId, FeeSchedule)> {
        let adapters: Vec<_> = quotes
            .iter()
            .filter_map(|(name, _)| self.registry.get(name).map(|a| (name.clone(), a)))
            .collect();

        let symbol_for_call = symbol.clone();
        fan_out(&adapters, self.config.request_timeout, move |adapter| {
            let symbol = symbol_for_call.clone();
            async move { adapter.trading_fees(&symbol).await }
        })
        .await
    }
}

fn taker_fee(fees: &[(ExchangeId, FeeSchedule)], exchange: &ExchangeId) -> Decimal {
    fees.iter()
        .find(|(name, _)| name == exchange)
        .map(|(_, schedule)| schedule.taker)
        .unwrap_or_else(|| FeeSchedule::default().taker)
}
