//! Connection and health domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ExchangeId;

/// Adapter connection state machine.
///
/// Transitions: Disconnected -> Connecting -> Connected, and
/// Connected -> Disconnected on detected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Per-exchange health classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Disconnected,
    Error,
}

/// Cheap per-exchange health snapshot, derived from last known connection
/// state and heartbeat. Producing one must never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeHealth {
    pub exchange: ExchangeId,
    pub status: HealthState,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl ExchangeHealth {
    /// Whether this entry counts against system health.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Aggregate classification across all adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    Healthy,
    Degraded,
    Critical,
}

/// System-wide health report emitted by the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub overall: OverallHealth,
    pub exchanges: BTreeMap<ExchangeId, ExchangeHealth>,
    pub issues: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

impl SystemHealth {
    /// Classify a set of per-exchange entries.
    ///
    /// healthy: no unhealthy adapters; degraded: up to half unhealthy;
    /// critical: more than half unhealthy. An empty adapter set is
    /// critical - there is nothing to trade against.
    pub fn classify(entries: Vec<ExchangeHealth>) -> Self {
        let total = entries.len();
        let unhealthy: Vec<&ExchangeHealth> =
            entries.iter().filter(|entry| !entry.is_healthy()).collect();

        let overall = if total == 0 {
            OverallHealth::Critical
        } else if unhealthy.is_empty() {
            OverallHealth::Healthy
        } else if unhealthy.len() * 2 <= total {
            OverallHealth::Degraded
        } else {
            OverallHealth::Critical
        };

        let mut issues: Vec<String> = unhealthy
            .iter()
            .map(|entry| format!("{}: {:?}", entry.exchange, entry.status))
            .collect();
        if total == 0 {
            issues.push("no adapters registered".to_string());
        }

        Self {
            overall,
            exchanges: entries
                .into_iter()
                .map(|entry| (entry.exchange.clone(), entry))
                .collect(),
            issues,
            checked_at: Utc::now(),
        }
    }
}
