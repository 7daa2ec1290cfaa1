//! Notification system for service events.
//!
//! The `Notifier` trait defines the interface for notification handlers.
//! Multiple notifiers can be registered with the `NotifierRegistry`.
//! Delivery is at-least-once and fire-and-forget; no ordering is
//! guaranteed across exchanges.

use rust_decimal::Decimal;

use crate::domain::{
    ArbitrageOpportunity, ExchangeId, OrderId, OrderStatus, Symbol, SystemHealth,
};

/// Events emitted by the integration service.
#[derive(Debug, Clone)]
pub enum Event {
    /// An adapter established (or re-established) its connection.
    ExchangeConnected { exchange: ExchangeId },
    /// An adapter lost or closed its connection.
    ExchangeDisconnected { exchange: ExchangeId },
    /// An adapter reported a transport or venue error.
    ExchangeError { exchange: ExchangeId, detail: String },
    /// A fused market view was produced.
    MarketDataUpdate(MarketDataEvent),
    /// The health monitor classified system health.
    HealthStatus(SystemHealth),
    /// A profitable arbitrage opportunity was detected.
    OpportunityDetected(ArbitrageOpportunity),
    /// An order changed state on a venue. Adapter implementations raise
    /// this through the registry; the core itself never places orders.
    OrderUpdate {
        exchange: ExchangeId,
        order_id: OrderId,
        status: OrderStatus,
    },
}

/// Summary payload for market-data updates.
#[derive(Debug, Clone)]
pub struct MarketDataEvent {
    pub symbol: Symbol,
    pub best_bid: Decimal,
    pub best_ask: Decimal,
    pub contributing_exchanges: usize,
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for tests or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {
        // Do nothing
    }
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::ExchangeConnected { exchange } => {
                info!(exchange = %exchange, "Exchange connected");
            }
            Event::ExchangeDisconnected { exchange } => {
                warn!(exchange = %exchange, "Exchange disconnected");
            }
            Event::ExchangeError { exchange, detail } => {
                warn!(exchange = %exchange, detail = %detail, "Exchange error");
            }
            Event::MarketDataUpdate(e) => {
                info!(
                    symbol = %e.symbol,
                    best_bid = %e.best_bid,
                    best_ask = %e.best_ask,
                    exchanges = e.contributing_exchanges,
                    "Market data update"
                );
            }
            Event::HealthStatus(health) => {
                info!(
                    overall = ?health.overall,
                    issues = health.issues.len(),
                    "Health status"
                );
            }
            Event::OpportunityDetected(opp) => {
                info!(
                    symbol = %opp.symbol,
                    buy = %opp.buy_exchange,
                    sell = %opp.sell_exchange,
                    net_spread = %opp.net_spread,
                    confidence = %opp.confidence,
                    "Opportunity detected"
                );
            }
            Event::OrderUpdate {
                exchange,
                order_id,
                status,
            } => {
                info!(
                    exchange = %exchange,
                    order_id = %order_id,
                    status = ?status,
                    "Order update"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier(Arc<AtomicUsize>);

    impl Notifier for CountingNotifier {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn notify_all_reaches_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(CountingNotifier(count.clone())));
        registry.register(Box::new(CountingNotifier(count.clone())));
        registry.register(Box::new(NullNotifier));
        assert_eq!(registry.len(), 3);

        registry.notify_all(Event::ExchangeConnected {
            exchange: ExchangeId::from("binance"),
        });
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
