//! Ticker quotes and the in-memory TTL quote cache.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::ids::{ExchangeId, Symbol};
use super::money::{Price, Volume};

/// Best bid/ask/volume snapshot for a symbol on one venue.
///
/// Ephemeral: fetched fresh per query and held only in the [`QuoteCache`]
/// until its TTL lapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Price,
    pub ask: Price,
    pub bid_size: Volume,
    pub ask_size: Volume,
    /// Venue-reported 24h volume, used as the aggregation weight.
    pub volume_24h: Volume,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Age of the quote relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.timestamp
    }

    /// Whether the quote is older than `window` relative to `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        // A future-stamped quote has no std age and is never stale.
        self.age(now)
            .to_std()
            .map(|age| age > window)
            .unwrap_or(false)
    }

    /// Midpoint between bid and ask.
    pub fn mid(&self) -> Price {
        (self.bid + self.ask) / Price::TWO
    }

    /// Relative spread `(ask - bid) / bid`. Returns zero on a zero bid.
    pub fn spread_fraction(&self) -> Price {
        if self.bid.is_zero() {
            return Price::ZERO;
        }
        (self.ask - self.bid) / self.bid
    }
}

/// In-memory TTL cache of per-venue quotes.
///
/// Shared by the aggregator and the arbitrage engine so bursts of reads
/// inside the TTL do not re-poll venues. Stale entries are treated as
/// absent and overwritten by the next fetch.
pub struct QuoteCache {
    quotes: DashMap<(ExchangeId, Symbol), Quote>,
    ttl: Duration,
}

impl QuoteCache {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            quotes: DashMap::new(),
            ttl,
        }
    }

    /// Insert or replace the quote for `(exchange, symbol)`.
    pub fn insert(&self, exchange: ExchangeId, symbol: Symbol, quote: Quote) {
        self.quotes.insert((exchange, symbol), quote);
    }

    /// Fetch a quote if present and still within the TTL.
    pub fn fresh(&self, exchange: &ExchangeId, symbol: &Symbol) -> Option<Quote> {
        let key = (exchange.clone(), symbol.clone());
        let entry = self.quotes.get(&key)?;
        if entry.is_stale(Utc::now(), self.ttl) {
            drop(entry);
            self.quotes.remove(&key);
            return None;
        }
        Some(entry.clone())
    }

    /// Drop every cached quote.
    pub fn clear(&self) {
        self.quotes.clear();
    }

    /// Number of cached entries, including ones past their TTL.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
