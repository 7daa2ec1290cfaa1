//! Rolling routing metrics and the service metrics snapshot.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Snapshot of routing performance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingMetrics {
    pub orders_routed: u64,
    pub orders_rejected: u64,
    /// Mean wall-clock time to produce a routing plan, in milliseconds.
    pub avg_execution_ms: f64,
    /// routed / (routed + rejected); 1.0 when nothing was attempted.
    pub success_rate: f64,
}

#[derive(Default)]
struct Counters {
    routed: u64,
    rejected: u64,
    total_execution: Duration,
}

/// Synchronized recorder updated after every completed routing call.
///
/// Concurrent order flow updates this from many tasks; the mutex keeps
/// the counters and the running total consistent with each other.
pub struct RoutingMetricsRecorder {
    counters: Mutex<Counters>,
}

impl RoutingMetricsRecorder {
    /// Create a recorder with zeroed counters.
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Record a routing call that produced a plan.
    pub fn record_routed(&self, elapsed: Duration) {
        let mut counters = self.counters.lock();
        counters.routed += 1;
        counters.total_execution += elapsed;
    }

    /// Record a routing call that was rejected (validation or liquidity).
    pub fn record_rejected(&self) {
        self.counters.lock().rejected += 1;
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> RoutingMetrics {
        let counters = self.counters.lock();
        let attempts = counters.routed + counters.rejected;
        RoutingMetrics {
            orders_routed: counters.routed,
            orders_rejected: counters.rejected,
            avg_execution_ms: if counters.routed == 0 {
                0.0
            } else {
                counters.total_execution.as_secs_f64() * 1_000.0 / counters.routed as f64
            },
            success_rate: if attempts == 0 {
                1.0
            } else {
                counters.routed as f64 / attempts as f64
            },
        }
    }
}

impl Default for RoutingMetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Service-level metrics exposed to external collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceMetrics {
    pub active_exchanges: usize,
    pub total_adapters: usize,
    pub routing: RoutingMetrics,
    /// Seconds since the service was initialized.
    pub uptime_secs: u64,
}
