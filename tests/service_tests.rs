//! Integration tests for the service surface: initialization, status,
//! metrics, and event re-emission.

mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;

use crossbook::domain::{ExchangeId, HealthState, OverallHealth};
use crossbook::error::Error;
use crossbook::exchange::ExchangeAdapter;
use crossbook::service::Event;
use crossbook::testkit::{quote_with, MockExchange, MockFactory};

const SYMBOL: &str = "BTC/USDT";

#[tokio::test]
async fn initialize_fails_soft_on_unbuildable_venue() {
    // Factory only knows binance; the kraken entry cannot be built.
    let known = MockExchange::builder("binance")
        .ticker(SYMBOL, quote_with(dec!(65000), dec!(65005), dec!(10)))
        .build();
    let factory = Arc::new(MockFactory::new().with(known));

    let (service, _) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    assert_eq!(service.active_exchanges(), vec![ExchangeId::from("binance")]);
    assert!(service
        .aggregated_market_data(&crossbook::domain::Symbol::from(SYMBOL))
        .await
        .is_ok());
    service.shutdown().await;
}

#[tokio::test]
async fn initialize_connects_adapters_and_emits_events() {
    let a = MockExchange::builder("binance").start_disconnected().build();
    let b = MockExchange::builder("kraken").start_disconnected().build();
    let probe = a.clone();

    let factory = Arc::new(MockFactory::new().with(a).with(b));
    let (service, recorder) = support::init_service(
        support::config_for(&[("binance", 1), ("kraken", 2)]),
        factory,
    )
    .await;

    assert_eq!(probe.connect_calls(), 1);
    assert_eq!(recorder.connected_count(&ExchangeId::from("binance")), 1);
    assert_eq!(recorder.connected_count(&ExchangeId::from("kraken")), 1);
    service.shutdown().await;
}

#[tokio::test]
async fn failed_initial_connect_leaves_venue_registered_for_recovery() {
    let flaky = MockExchange::builder("binance")
        .start_disconnected()
        .failing_connects(1)
        .build();
    let probe = flaky.clone();

    let factory = Arc::new(MockFactory::new().with(flaky));
    let (service, recorder) =
        support::init_service(support::config_for(&[("binance", 1)]), factory).await;

    // Still registered and enabled, just unhealthy until the monitor
    // reconnects it.
    assert_eq!(service.active_exchanges(), vec![ExchangeId::from("binance")]);
    assert_eq!(probe.health().status, HealthState::Error);
    assert_eq!(recorder.connected_count(&ExchangeId::from("binance")), 0);
    let error_events = recorder
        .events()
        .iter()
        .filter(|event| matches!(event, Event::ExchangeError { .. }))
        .count();
    assert_eq!(error_events, 1);
    service.shutdown().await;
}

#[tokio::test]
async fn exchange_status_reports_per_venue_and_unknown_names_error() {
    let venue = MockExchange::builder("binance").build();
    let factory = Arc::new(MockFactory::new().with(venue));
    let (service, _) =
        support::init_service(support::config_for(&[("binance", 1)]), factory).await;

    let status = service
        .exchange_status(&ExchangeId::from("binance"))
        .unwrap();
    assert_eq!(status.status, HealthState::Healthy);
    assert!(status.last_heartbeat.is_some());

    let all = service.exchange_statuses();
    assert_eq!(all.len(), 1);

    assert!(matches!(
        service.exchange_status(&ExchangeId::from("okx")),
        Err(Error::UnknownExchange(_))
    ));
    service.shutdown().await;
}

#[tokio::test]
async fn check_health_classifies_current_registry() {
    let up = MockExchange::builder("binance").build();
    let down = MockExchange::builder("kraken").start_disconnected().build();

    let factory = Arc::new(MockFactory::new().with(up).with(down));
    let config = {
        let mut config = support::config_for(&[("binance", 1), ("kraken", 2)]);
        // Keep initialize from connecting kraken so the check sees it
        // down.
        config.exchanges[1].enabled = false;
        config
    };
    let (service, _) = support::init_service(config, factory).await;

    // Only binance is enabled: healthy.
    assert_eq!(service.check_health().overall, OverallHealth::Healthy);

    // Re-enable kraken (still disconnected): one of two is unhealthy.
    service.registry().enable(&ExchangeId::from("kraken"));
    assert_eq!(service.check_health().overall, OverallHealth::Degraded);
    service.shutdown().await;
}

#[tokio::test]
async fn active_exchanges_follow_priority_order_and_enablement() {
    let a = MockExchange::builder("binance").build();
    let b = MockExchange::builder("kraken").build();
    let c = MockExchange::builder("okx").build();

    let factory = Arc::new(MockFactory::new().with(a).with(b).with(c));
    let (service, _) = support::init_service(
        support::config_for(&[("binance", 5), ("kraken", 1), ("okx", 3)]),
        factory,
    )
    .await;

    assert_eq!(
        service.active_exchanges(),
        vec![
            ExchangeId::from("kraken"),
            ExchangeId::from("okx"),
            ExchangeId::from("binance"),
        ]
    );

    service.registry().disable(&ExchangeId::from("okx"));
    assert_eq!(
        service.active_exchanges(),
        vec![ExchangeId::from("kraken"), ExchangeId::from("binance")]
    );
    service.shutdown().await;
}

#[tokio::test]
async fn service_metrics_expose_adapter_counts_and_uptime() {
    let venue = MockExchange::builder("binance").build();
    let factory = Arc::new(MockFactory::new().with(venue));
    let (service, _) =
        support::init_service(support::config_for(&[("binance", 1)]), factory).await;

    let metrics = service.service_metrics();
    assert_eq!(metrics.active_exchanges, 1);
    assert_eq!(metrics.total_adapters, 1);
    assert_eq!(metrics.routing.orders_routed, 0);
    service.shutdown().await;
}

#[tokio::test]
async fn shutdown_disconnects_and_emits_events() {
    let venue = MockExchange::builder("binance").build();
    let probe = venue.clone();
    let factory = Arc::new(MockFactory::new().with(venue));
    let (service, recorder) =
        support::init_service(support::config_for(&[("binance", 1)]), factory).await;

    service.shutdown().await;

    assert_eq!(
        probe.state(),
        crossbook::domain::ConnectionState::Disconnected
    );
    let disconnects = recorder
        .events()
        .iter()
        .filter(|event| matches!(event, Event::ExchangeDisconnected { .. }))
        .count();
    assert_eq!(disconnects, 1);
}
