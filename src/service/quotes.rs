//! Shared quote gathering through the TTL cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{ExchangeId, Quote, QuoteCache, Symbol};
use crate::exchange::AdapterRegistry;

use super::fanout::fan_out;

/// Collect one quote per enabled venue, serving cache hits inside the
/// TTL and fanning out to the rest.
///
/// Best-effort: venues that error or time out are simply absent from the
/// result. Fresh fetches are written back to the cache.
pub async fn gather_quotes(
    registry: &AdapterRegistry,
    cache: &Arc<QuoteCache>,
    symbol: &Symbol,
    timeout: Duration,
) -> Vec<(ExchangeId, Quote)> {
    let mut collected = Vec::new();
    let mut to_fetch = Vec::new();

    for (name, adapter, _priority) in registry.enabled_adapters() {
        match cache.fresh(&name, symbol) {
            Some(quote) => {
                debug!(exchange = %name, symbol = %symbol, "Quote cache hit");
                collected.push((name, quote));
            }
            None => to_fetch.push((name, adapter)),
        }
    }

    let symbol_for_call = symbol.clone();
    let fetched = fan_out(&to_fetch, timeout, move |adapter| {
        let symbol = symbol_for_call.clone();
        async move { adapter.ticker(&symbol).await }
    })
    .await;

    for (name, quote) in fetched {
        cache.insert(name.clone(), symbol.clone(), quote.clone());
        collected.push((name, quote));
    }

    collected
}
