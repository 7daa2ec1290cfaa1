//! Volume-weighted market-data aggregation across venues.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{AggregatedMarketView, QuoteCache, Symbol};
use crate::error::{Error, Result};
use crate::exchange::AdapterRegistry;

use super::quotes::gather_quotes;

/// Fans out ticker queries across the registry for a symbol and fuses
/// them into one view.
pub struct MarketDataAggregator {
    registry: Arc<AdapterRegistry>,
    cache: Arc<QuoteCache>,
    request_timeout: Duration,
}

impl MarketDataAggregator {
    /// Create an aggregator over the given registry and quote cache.
    pub fn new(
        registry: Arc<AdapterRegistry>,
        cache: Arc<QuoteCache>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            cache,
            request_timeout,
        }
    }

    /// Build the fused view for a symbol.
    ///
    /// Partial failures are excluded; zero surviving venues is an
    /// `AggregationFailed` error, never a silently empty result.
    pub async fn aggregate(&self, symbol: &Symbol) -> Result<AggregatedMarketView> {
        let quotes =
            gather_quotes(&self.registry, &self.cache, symbol, self.request_timeout).await;

        debug!(
            symbol = %symbol,
            responded = quotes.len(),
            enabled = self.registry.enabled_names().len(),
            "Ticker fan-out complete"
        );

        let quotes: BTreeMap<_, _> = quotes.into_iter().collect();
        AggregatedMarketView::fuse(symbol.clone(), quotes).ok_or(Error::AggregationFailed {
            symbol: symbol.clone(),
        })
    }
}
