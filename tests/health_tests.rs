//! Integration tests for health classification and reconnection.

mod support;

use std::sync::Arc;
use std::time::Duration;

use crossbook::domain::{ExchangeId, HealthState, OverallHealth};
use crossbook::exchange::{AdapterRegistry, ExchangeAdapter};
use crossbook::service::{HealthMonitor, HealthMonitorConfig, NotifierRegistry};
use crossbook::testkit::{MockExchange, RecordingNotifier};

fn monitor_over(
    adapters: Vec<Arc<MockExchange>>,
    reconnect_delay: Duration,
) -> (HealthMonitor, RecordingNotifier) {
    let registry = Arc::new(AdapterRegistry::new());
    for adapter in adapters {
        registry.insert(adapter, 1);
    }

    let recorder = RecordingNotifier::new();
    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(recorder.clone()));

    let monitor = HealthMonitor::new(
        registry,
        Arc::new(notifiers),
        HealthMonitorConfig {
            check_interval: Duration::from_secs(60),
            reconnect_delay,
        },
    );
    (monitor, recorder)
}

#[tokio::test]
async fn one_unhealthy_of_four_is_degraded() {
    let adapters = vec![
        MockExchange::builder("binance").build(),
        MockExchange::builder("kraken").build(),
        MockExchange::builder("coinbase").build(),
        MockExchange::builder("okx").start_disconnected().build(),
    ];
    let (monitor, recorder) = monitor_over(adapters, Duration::from_secs(60));

    let health = monitor.check_now();
    assert_eq!(health.overall, OverallHealth::Degraded);
    assert_eq!(health.exchanges.len(), 4);
    assert_eq!(
        health.exchanges[&ExchangeId::from("okx")].status,
        HealthState::Disconnected
    );
    assert_eq!(recorder.health_count(), 1);
}

#[tokio::test]
async fn three_unhealthy_of_four_is_critical() {
    let adapters = vec![
        MockExchange::builder("binance").build(),
        MockExchange::builder("kraken").start_disconnected().build(),
        MockExchange::builder("coinbase").start_disconnected().build(),
        MockExchange::builder("okx").start_disconnected().build(),
    ];
    let (monitor, _) = monitor_over(adapters, Duration::from_secs(60));

    let health = monitor.check_now();
    assert_eq!(health.overall, OverallHealth::Critical);
    assert_eq!(health.issues.len(), 3);
}

#[tokio::test]
async fn all_healthy_is_healthy() {
    let adapters = vec![
        MockExchange::builder("binance").build(),
        MockExchange::builder("kraken").build(),
    ];
    let (monitor, _) = monitor_over(adapters, Duration::from_secs(60));

    let health = monitor.check_now();
    assert_eq!(health.overall, OverallHealth::Healthy);
    assert!(health.issues.is_empty());
}

#[tokio::test]
async fn reconnection_retries_until_success_and_emits_one_connected_event() {
    let flaky = MockExchange::builder("okx")
        .start_disconnected()
        .failing_connects(2)
        .build();
    let probe = flaky.clone();
    let (monitor, recorder) = monitor_over(vec![flaky], Duration::from_millis(20));

    monitor.check_now();
    assert!(monitor.is_reconnecting(&ExchangeId::from("okx")));

    // Two scripted failures then success: three attempts at 20ms apart.
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(probe.connect_calls(), 3);
    let health = probe.health();
    assert_eq!(health.status, HealthState::Healthy);
    assert_eq!(
        health.consecutive_failures, 0,
        "retry counter resets on success"
    );
    assert_eq!(recorder.connected_count(&ExchangeId::from("okx")), 1);
    assert!(!monitor.is_reconnecting(&ExchangeId::from("okx")));
}

#[tokio::test]
async fn repeated_checks_do_not_stack_reconnection_tasks() {
    let down = MockExchange::builder("okx")
        .start_disconnected()
        .failing_connects(50)
        .build();
    let probe = down.clone();
    let (monitor, _) = monitor_over(vec![down], Duration::from_millis(50));

    monitor.check_now();
    monitor.check_now();
    monitor.check_now();

    tokio::time::sleep(Duration::from_millis(120)).await;
    // One task attempting every 50ms, not three.
    assert!(probe.connect_calls() <= 3);
    monitor.stop();
}

#[tokio::test]
async fn periodic_loop_emits_health_events() {
    let adapters = vec![MockExchange::builder("binance").build()];
    let registry = Arc::new(AdapterRegistry::new());
    for adapter in adapters {
        registry.insert(adapter, 1);
    }

    let recorder = RecordingNotifier::new();
    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(recorder.clone()));

    let monitor = HealthMonitor::new(
        registry,
        Arc::new(notifiers),
        HealthMonitorConfig {
            check_interval: Duration::from_millis(30),
            reconnect_delay: Duration::from_secs(60),
        },
    );
    monitor.start();

    tokio::time::sleep(Duration::from_millis(200)).await;
    monitor.stop();

    assert!(recorder.health_count() >= 2);
}
