//! Composed connection-state helper shared by adapter implementations.
//!
//! Each adapter owns a [`ConnectionTracker`] instead of inheriting shared
//! lifecycle behavior. The state word is a single atomic: it is the one
//! point of truth the health monitor and in-flight fan-outs read while an
//! adapter updates it.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{ConnectionState, ExchangeHealth, ExchangeId, HealthState};

const DISCONNECTED: u8 = 0;
const CONNECTING: u8 = 1;
const CONNECTED: u8 = 2;

/// Tracks connection state, heartbeat, and consecutive failures for one
/// adapter.
pub struct ConnectionTracker {
    state: AtomicU8,
    consecutive_failures: AtomicU32,
    last_heartbeat: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
}

impl ConnectionTracker {
    /// Create a tracker starting in `Disconnected`.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(DISCONNECTED),
            consecutive_failures: AtomicU32::new(0),
            last_heartbeat: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        match self.state.load(Ordering::SeqCst) {
            CONNECTED => ConnectionState::Connected,
            CONNECTING => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Enter the `Connecting` state.
    pub fn set_connecting(&self) {
        self.state.store(CONNECTING, Ordering::SeqCst);
    }

    /// Mark a successful connection: state becomes `Connected`, the
    /// failure counter resets, and a heartbeat is recorded.
    pub fn mark_connected(&self) {
        self.state.store(CONNECTED, Ordering::SeqCst);
        self.consecutive_failures.store(0, Ordering::SeqCst);
        *self.last_error.write() = None;
        self.touch();
    }

    /// Mark a disconnect, voluntary or detected.
    pub fn mark_disconnected(&self) {
        self.state.store(DISCONNECTED, Ordering::SeqCst);
    }

    /// Record a failed connection attempt or transport fault.
    pub fn mark_failure(&self, error: impl Into<String>) {
        self.state.store(DISCONNECTED, Ordering::SeqCst);
        self.consecutive_failures.fetch_add(1, Ordering::SeqCst);
        *self.last_error.write() = Some(error.into());
    }

    /// Record a successful heartbeat (any completed venue call counts).
    pub fn touch(&self) {
        *self.last_heartbeat.write() = Some(Utc::now());
    }

    /// Consecutive failures since the last successful connection.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }

    /// Most recent failure detail, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Derive the health snapshot for `exchange`. Infallible by
    /// construction: every field comes from already-tracked state.
    pub fn health(&self, exchange: &ExchangeId) -> ExchangeHealth {
        let status = match self.state() {
            ConnectionState::Connected => HealthState::Healthy,
            ConnectionState::Connecting => HealthState::Disconnected,
            ConnectionState::Disconnected => {
                if self.last_error.read().is_some() {
                    HealthState::Error
                } else {
                    HealthState::Disconnected
                }
            }
        };
        ExchangeHealth {
            exchange: exchange.clone(),
            status,
            last_heartbeat: *self.last_heartbeat.read(),
            consecutive_failures: self.consecutive_failures(),
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
