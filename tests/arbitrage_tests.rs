//! Integration tests for cross-venue arbitrage detection.

mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;

use crossbook::domain::{ExchangeId, Symbol};
use crossbook::exchange::FeeSchedule;
use crossbook::testkit::{quote_aged, quote_with, MockExchange, MockFactory};

const SYMBOL: &str = "BTC/USDT";

#[tokio::test]
async fn detects_profitable_spread_net_of_fees() {
    // Buy binance @ 65000, sell kraken @ 65400: gross spread ~0.615%,
    // fees 0.2% total, net ~0.415% > 0.1% threshold.
    let cheap = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(64990), dec!(65000), dec!(10)))
        .fees(SYMBOL, FeeSchedule::flat(dec!(0.001)))
        .build();
    let rich = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(65400), dec!(65410), dec!(10)))
        .fees(SYMBOL, FeeSchedule::flat(dec!(0.001)))
        .build();

    let factory = Arc::new(MockFactory::new().with(cheap).with(rich));
    let (service, recorder) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;

    let best = opportunities.first().expect("at least one opportunity");
    assert_eq!(best.buy_exchange, ExchangeId::from("binance"));
    assert_eq!(best.sell_exchange, ExchangeId::from("kraken"));
    assert_eq!(best.spread, dec!(400) / dec!(65000));
    assert_eq!(best.estimated_fees, dec!(0.002));
    assert_eq!(best.net_spread, best.spread - dec!(0.002));
    assert!(best.profitable);
    assert_eq!(recorder.opportunity_count(), 1);
    service.shutdown().await;
}

#[tokio::test]
async fn results_are_sorted_by_net_spread_descending() {
    let a = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(64990), dec!(65000), dec!(10)))
        .build();
    let b = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(65200), dec!(65210), dec!(10)))
        .build();
    let c = MockExchange::builder("coinbase")
        .ticker(SYMBOL, quote_with(dec!(65400), dec!(65410), dec!(10)))
        .build();

    let factory = Arc::new(MockFactory::new().with(a).with(b).with(c));
    let (service, _) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2), ("coinbase", 3)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;

    // Three venues, both directions per pair.
    assert_eq!(opportunities.len(), 6);
    for pair in opportunities.windows(2) {
        assert!(pair[0].net_spread >= pair[1].net_spread);
    }
    let best = &opportunities[0];
    assert_eq!(best.buy_exchange, ExchangeId::from("binance"));
    assert_eq!(best.sell_exchange, ExchangeId::from("coinbase"));
    service.shutdown().await;
}

#[tokio::test]
async fn spread_exactly_at_threshold_is_not_profitable() {
    // Gross spread = 0.3% exactly; fees 0.1% per leg leave net = 0.1%,
    // equal to the configured threshold.
    let buy = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(9990), dec!(10000), dec!(10)))
        .fees(SYMBOL, FeeSchedule::flat(dec!(0.001)))
        .build();
    let sell = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(10030), dec!(10040), dec!(10)))
        .fees(SYMBOL, FeeSchedule::flat(dec!(0.001)))
        .build();

    let factory = Arc::new(MockFactory::new().with(buy).with(sell));
    let (service, recorder) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;

    let at_threshold = opportunities
        .iter()
        .find(|o| o.buy_exchange == ExchangeId::from("binance"))
        .unwrap();
    assert_eq!(at_threshold.net_spread, dec!(0.001));
    assert!(!at_threshold.profitable);
    assert_eq!(recorder.opportunity_count(), 0);
    service.shutdown().await;
}

#[tokio::test]
async fn missing_fee_schedule_falls_back_per_leg() {
    let no_fees = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(64990), dec!(65000), dec!(10)))
        .build();
    no_fees.fail_fees();
    let with_fees = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(65400), dec!(65410), dec!(10)))
        .fees(SYMBOL, FeeSchedule::flat(dec!(0.0025)))
        .build();

    let factory = Arc::new(MockFactory::new().with(no_fees).with(with_fees));
    let (service, _) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;
    let best = opportunities.first().unwrap();
    // 0.1% fallback for binance + 0.25% scripted for kraken.
    assert_eq!(best.estimated_fees, dec!(0.0035));
    service.shutdown().await;
}

#[tokio::test]
async fn stale_quotes_lower_confidence_without_exclusion() {
    let stale = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_aged(dec!(64990), dec!(65000), 8))
        .build();
    let fresh = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(65400), dec!(65410), dec!(10)))
        .build();

    let factory = Arc::new(MockFactory::new().with(stale).with(fresh));
    let (service, _) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;

    let best = opportunities.first().unwrap();
    // 8s old against a 10s window leaves around 20% confidence.
    assert!(best.confidence > dec!(0.1));
    assert!(best.confidence < dec!(0.3));
    assert!(best.profitable, "staleness does not exclude the quote");
    service.shutdown().await;
}

#[tokio::test]
async fn failed_venue_is_omitted_from_pair_scan() {
    let a = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(64990), dec!(65000), dec!(10)))
        .build();
    let b = MockExchange::builder("kraken")
        .ticker(SYMBOL, quote_with(dec!(65400), dec!(65410), dec!(10)))
        .build();
    let dead = MockExchange::builder("coinbase").build();
    dead.fail_next_tickers(10);

    let factory = Arc::new(MockFactory::new().with(a).with(b).with(dead));
    let (service, _) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2), ("coinbase", 3)]),
        factory,
    )
    .await;

    let opportunities = service.detect_arbitrage(&Symbol::from(SYMBOL)).await;
    assert_eq!(opportunities.len(), 2);
    assert!(opportunities
        .iter()
        .all(|o| o.buy_exchange != ExchangeId::from("coinbase")
            && o.sell_exchange != ExchangeId::from("coinbase")));
    service.shutdown().await;
}

#[tokio::test]
async fn single_surviving_venue_yields_no_opportunities() {
    let only = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(64990), dec!(65000), dec!(10)))
        .build();

    let factory = Arc::new(MockFactory::new().with(only));
    let (service, _) =
        support::init_service(support::config_for(&[("binance", 1)]), factory).await;

    assert!(service
        .detect_arbitrage(&Symbol::from(SYMBOL))
        .await
        .is_empty());
    service.shutdown().await;
}
