//! Mock exchange adapter with scripted responses and failure injection.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::config::ExchangeConfig;
use crate::domain::{
    ConnectionState, ExchangeHealth, ExchangeId, OrderAck, OrderBook, OrderId, OrderRequest,
    OrderStatus, Quote, Symbol,
};
use crate::error::{ConfigError, ExchangeError};
use crate::exchange::{AdapterFactory, ConnectionTracker, ExchangeAdapter, FeeSchedule};

/// Scripted in-memory adapter.
///
/// Uses the same composed [`ConnectionTracker`] as a real adapter, so
/// lifecycle tests exercise the production state machine.
pub struct MockExchange {
    name: ExchangeId,
    tracker: ConnectionTracker,
    tickers: Mutex<HashMap<Symbol, Quote>>,
    books: Mutex<HashMap<Symbol, OrderBook>>,
    fees: Mutex<HashMap<Symbol, FeeSchedule>>,
    orders: Mutex<HashMap<OrderId, OrderStatus>>,
    /// Outcomes for upcoming connect calls; empty queue means success.
    connect_script: Mutex<VecDeque<Result<(), ExchangeError>>>,
    latency: Option<Duration>,
    fail_next_tickers: AtomicU32,
    fail_fees: AtomicBool,
    reject_orders: AtomicBool,
    connect_calls: AtomicU32,
    ticker_calls: AtomicU32,
    book_calls: AtomicU32,
}

impl MockExchange {
    /// Start building a mock for a venue name.
    pub fn builder(name: &str) -> MockExchangeBuilder {
        MockExchangeBuilder {
            name: ExchangeId::from(name),
            tickers: HashMap::new(),
            books: HashMap::new(),
            fees: HashMap::new(),
            connect_script: VecDeque::new(),
            latency: None,
            start_disconnected: false,
        }
    }

    /// Replace the scripted ticker for a symbol.
    pub fn set_ticker(&self, symbol: &str, quote: Quote) {
        self.tickers.lock().insert(Symbol::from(symbol), quote);
    }

    /// Replace the scripted order book for a symbol.
    pub fn set_order_book(&self, book: OrderBook) {
        self.books.lock().insert(book.symbol().clone(), book);
    }

    /// Fail the next `n` ticker calls with a connection error.
    pub fn fail_next_tickers(&self, n: u32) {
        self.fail_next_tickers.store(n, Ordering::SeqCst);
    }

    /// Make every fee call fail (exercises fee fallbacks).
    pub fn fail_fees(&self) {
        self.fail_fees.store(true, Ordering::SeqCst);
    }

    /// Reject every placed order.
    pub fn reject_orders(&self) {
        self.reject_orders.store(true, Ordering::SeqCst);
    }

    /// Number of connect attempts so far.
    pub fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// Number of ticker calls so far (cache tests).
    pub fn ticker_calls(&self) -> u32 {
        self.ticker_calls.load(Ordering::SeqCst)
    }

    /// Number of order-book calls so far.
    pub fn book_calls(&self) -> u32 {
        self.book_calls.load(Ordering::SeqCst)
    }

    async fn apply_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ExchangeAdapter for MockExchange {
    fn name(&self) -> &ExchangeId {
        &self.name
    }

    fn state(&self) -> ConnectionState {
        self.tracker.state()
    }

    async fn connect(&self) -> Result<(), ExchangeError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.tracker.set_connecting();
        self.apply_latency().await;

        let outcome = self.connect_script.lock().pop_front().unwrap_or(Ok(()));
        match outcome {
            Ok(()) => {
                self.tracker.mark_connected();
                Ok(())
            }
            Err(error) => {
                self.tracker.mark_failure(error.to_string());
                Err(error)
            }
        }
    }

    async fn disconnect(&self) -> Result<(), ExchangeError> {
        self.tracker.mark_disconnected();
        Ok(())
    }

    async fn order_book(&self, symbol: &Symbol) -> Result<OrderBook, ExchangeError> {
        self.book_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_latency().await;
        if self.state() != ConnectionState::Connected {
            return Err(ExchangeError::NotConnected);
        }
        let book = self
            .books
            .lock()
            .get(symbol)
            .cloned()
            .ok_or_else(|| ExchangeError::SymbolNotListed(symbol.clone()))?;
        self.tracker.touch();
        Ok(book)
    }

    async fn ticker(&self, symbol: &Symbol) -> Result<Quote, ExchangeError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_latency().await;
        if self.state() != ConnectionState::Connected {
            return Err(ExchangeError::NotConnected);
        }
        if self.fail_next_tickers.load(Ordering::SeqCst) > 0 {
            self.fail_next_tickers.fetch_sub(1, Ordering::SeqCst);
            return Err(ExchangeError::Connection("scripted failure".into()));
        }
        let quote = self
            .tickers
            .lock()
            .get(symbol)
            .cloned()
            .ok_or_else(|| ExchangeError::SymbolNotListed(symbol.clone()))?;
        self.tracker.touch();
        Ok(quote)
    }

    async fn trading_fees(&self, symbol: &Symbol) -> Result<FeeSchedule, ExchangeError> {
        self.apply_latency().await;
        if self.fail_fees.load(Ordering::SeqCst) {
            return Err(ExchangeError::Connection("fees unavailable".into()));
        }
        Ok(self
            .fees
            .lock()
            .get(symbol)
            .copied()
            .unwrap_or_default())
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError> {
        self.apply_latency().await;
        if self.state() != ConnectionState::Connected {
            return Err(ExchangeError::NotConnected);
        }
        if self.reject_orders.load(Ordering::SeqCst) {
            return Err(ExchangeError::OrderRejected("scripted rejection".into()));
        }
        self.orders
            .lock()
            .insert(order.id.clone(), OrderStatus::Open);
        Ok(OrderAck {
            order_id: order.id.clone(),
            exchange: self.name.clone(),
            status: OrderStatus::Open,
            accepted_at: Utc::now(),
        })
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<(), ExchangeError> {
        self.apply_latency().await;
        let mut orders = self.orders.lock();
        match orders.get_mut(order_id) {
            Some(status) if !status.is_terminal() => {
                *status = OrderStatus::Cancelled;
                Ok(())
            }
            Some(_) => Err(ExchangeError::OrderRejected(
                "order already terminal".into(),
            )),
            None => Err(ExchangeError::UnknownOrder(order_id.clone())),
        }
    }

    async fn order_status(&self, order_id: &OrderId) -> Result<OrderStatus, ExchangeError> {
        self.apply_latency().await;
        self.orders
            .lock()
            .get(order_id)
            .cloned()
            .ok_or_else(|| ExchangeError::UnknownOrder(order_id.clone()))
    }

    fn health(&self) -> ExchangeHealth {
        self.tracker.health(&self.name)
    }
}

/// Builder for [`MockExchange`].
pub struct MockExchangeBuilder {
    name: ExchangeId,
    tickers: HashMap<Symbol, Quote>,
    books: HashMap<Symbol, OrderBook>,
    fees: HashMap<Symbol, FeeSchedule>,
    connect_script: VecDeque<Result<(), ExchangeError>>,
    latency: Option<Duration>,
    start_disconnected: bool,
}

impl MockExchangeBuilder {
    /// Script the ticker for a symbol.
    pub fn ticker(mut self, symbol: &str, quote: Quote) -> Self {
        self.tickers.insert(Symbol::from(symbol), quote);
        self
    }

    /// Script the order book for a symbol.
    pub fn order_book(mut self, book: OrderBook) -> Self {
        self.books.insert(book.symbol().clone(), book);
        self
    }

    /// Script the fee schedule for a symbol.
    pub fn fees(mut self, symbol: &str, fees: FeeSchedule) -> Self {
        self.fees.insert(Symbol::from(symbol), fees);
        self
    }

    /// Script the next connect outcomes; once drained, connects succeed.
    pub fn connect_outcomes(mut self, outcomes: Vec<Result<(), ExchangeError>>) -> Self {
        self.connect_script = outcomes.into();
        self
    }

    /// Fail the next `n` connect attempts, then succeed.
    pub fn failing_connects(mut self, n: usize) -> Self {
        self.connect_script = (0..n)
            .map(|_| Err(ExchangeError::Connection("scripted refusal".into())))
            .collect();
        self
    }

    /// Add fixed latency to every call.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Leave the adapter disconnected instead of the default connected
    /// state.
    pub fn start_disconnected(mut self) -> Self {
        self.start_disconnected = true;
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Arc<MockExchange> {
        let tracker = ConnectionTracker::new();
        if !self.start_disconnected {
            tracker.mark_connected();
        }
        Arc::new(MockExchange {
            name: self.name,
            tracker,
            tickers: Mutex::new(self.tickers),
            books: Mutex::new(self.books),
            fees: Mutex::new(self.fees),
            orders: Mutex::new(HashMap::new()),
            connect_script: Mutex::new(self.connect_script),
            latency: self.latency,
            fail_next_tickers: AtomicU32::new(0),
            fail_fees: AtomicBool::new(false),
            reject_orders: AtomicBool::new(false),
            connect_calls: AtomicU32::new(0),
            ticker_calls: AtomicU32::new(0),
            book_calls: AtomicU32::new(0),
        })
    }
}

/// Factory over a fixed set of prepared mocks.
///
/// Unknown venue names fail with `UnsupportedExchange`, like a real
/// factory fed an unrecognized config entry.
#[derive(Default)]
pub struct MockFactory {
    adapters: Mutex<HashMap<ExchangeId, Arc<MockExchange>>>,
}

impl MockFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prepared mock; returns self for chaining.
    pub fn with(self, adapter: Arc<MockExchange>) -> Self {
        self.adapters
            .lock()
            .insert(adapter.name().clone(), adapter);
        self
    }
}

impl AdapterFactory for MockFactory {
    fn build(
        &self,
        config: &ExchangeConfig,
    ) -> Result<Arc<dyn ExchangeAdapter>, ConfigError> {
        self.adapters
            .lock()
            .get(&ExchangeId::from(config.name.as_str()))
            .map(|adapter| adapter.clone() as Arc<dyn ExchangeAdapter>)
            .ok_or_else(|| ConfigError::UnsupportedExchange {
                name: config.name.clone(),
            })
    }
}
