//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! Provides [`MockExchange`] (scripted responses, failure and latency
//! injection) with its [`MockFactory`], the [`RecordingNotifier`] event
//! collector, and quote builders for staleness scenarios.

mod exchange;
mod notifier;

pub use exchange::{MockExchange, MockExchangeBuilder, MockFactory};
pub use notifier::RecordingNotifier;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::Quote;

/// A fresh quote with default sizes and no reported volume.
pub fn quote(bid: i64, ask: i64) -> Quote {
    quote_with(Decimal::from(bid), Decimal::from(ask), dec!(0))
}

/// A fresh quote with explicit prices and 24h volume.
pub fn quote_with(bid: Decimal, ask: Decimal, volume_24h: Decimal) -> Quote {
    Quote {
        bid,
        ask,
        bid_size: dec!(100),
        ask_size: dec!(100),
        volume_24h,
        timestamp: Utc::now(),
    }
}

/// A quote stamped `age_secs` in the past, for staleness scenarios.
pub fn quote_aged(bid: Decimal, ask: Decimal, age_secs: i64) -> Quote {
    let mut quote = quote_with(bid, ask, dec!(0));
    quote.timestamp = Utc::now() - Duration::seconds(age_secs);
    quote
}
