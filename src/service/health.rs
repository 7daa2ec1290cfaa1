//! Periodic health classification and reconnection driving.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::{ExchangeId, SystemHealth};
use crate::exchange::AdapterRegistry;
use crate::service::events::{Event, NotifierRegistry};

/// Monitor settings, sourced from `ServiceConfig`.
#[derive(Debug, Clone)]
pub struct HealthMonitorConfig {
    /// Poll interval for the periodic loop.
    pub check_interval: Duration,
    /// Fixed delay before each reconnection attempt.
    pub reconnect_delay: Duration,
}

struct Inner {
    registry: Arc<AdapterRegistry>,
    notifiers: Arc<NotifierRegistry>,
    config: HealthMonitorConfig,
    /// Venues with a reconnection task in flight, so a venue that stays
    /// down across several polls gets exactly one task.
    reconnecting: Mutex<HashSet<ExchangeId>>,
}

/// Periodically polls adapter health, classifies overall system health,
/// and drives reconnection.
///
/// Shares no mutable state with in-flight routing calls except the
/// adapters' own connection words; everything else here is private
/// bookkeeping.
pub struct HealthMonitor {
    inner: Arc<Inner>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    /// Create a monitor over the given registry.
    pub fn new(
        registry: Arc<AdapterRegistry>,
        notifiers: Arc<NotifierRegistry>,
        config: HealthMonitorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                notifiers,
                config,
                reconnecting: Mutex::new(HashSet::new()),
            }),
            poll_task: Mutex::new(None),
        }
    }

    /// Start the periodic polling loop on its own task.
    pub fn start(&self) {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.config.check_interval);
            // The immediate first tick would re-check state initialize
            // just produced.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                check(&inner);
            }
        });
        *self.poll_task.lock() = Some(handle);
    }

    /// Stop the periodic loop. In-flight reconnection tasks keep running
    /// until they succeed.
    pub fn stop(&self) {
        if let Some(handle) = self.poll_task.lock().take() {
            handle.abort();
        }
    }

    /// Poll every enabled adapter once, classify, emit a health event,
    /// and schedule reconnections for unhealthy venues.
    ///
    /// Must run inside a tokio runtime (reconnection tasks are spawned).
    pub fn check_now(&self) -> SystemHealth {
        check(&self.inner)
    }

    /// Whether a reconnection task is currently in flight for a venue.
    pub fn is_reconnecting(&self, exchange: &ExchangeId) -> bool {
        self.inner.reconnecting.lock().contains(exchange)
    }
}

/// One monitoring pass over the registry.
fn check(inner: &Arc<Inner>) -> SystemHealth {
    let entries: Vec<_> = inner
        .registry
        .enabled_adapters()
        .iter()
        .map(|(_, adapter, _)| adapter.health())
        .collect();

    for entry in entries.iter().filter(|entry| !entry.is_healthy()) {
        schedule_reconnect(inner, &entry.exchange);
    }

    let health = SystemHealth::classify(entries);
    inner
        .notifiers
        .notify_all(Event::HealthStatus(health.clone()));
    health
}

/// Spawn the reconnection loop for a venue unless one is already in
/// flight: fixed delay per attempt, no retry bound, one `Connected`
/// event on success.
fn schedule_reconnect(inner: &Arc<Inner>, exchange: &ExchangeId) {
    if !inner.reconnecting.lock().insert(exchange.clone()) {
        return;
    }

    let Some(adapter) = inner.registry.get(exchange) else {
        inner.reconnecting.lock().remove(exchange);
        return;
    };

    let inner = inner.clone();
    let exchange = exchange.clone();
    tokio::spawn(async move {
        let mut attempt: u64 = 0;
        loop {
            sleep(inner.config.reconnect_delay).await;
            attempt += 1;
            match adapter.reconnect().await {
                Ok(()) => {
                    info!(exchange = %exchange, attempt, "Reconnected");
                    inner.notifiers.notify_all(Event::ExchangeConnected {
                        exchange: exchange.clone(),
                    });
                    break;
                }
                Err(error) => {
                    warn!(
                        exchange = %exchange,
                        attempt,
                        error = %error,
                        "Reconnection attempt failed, will retry"
                    );
                    inner.notifiers.notify_all(Event::ExchangeError {
                        exchange: exchange.clone(),
                        detail: error.to_string(),
                    });
                }
            }
        }
        inner.reconnecting.lock().remove(&exchange);
    });
}
