//! The integration service: the one component external collaborators see.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{
    AggregatedMarketView, ArbitrageOpportunity, ExchangeHealth, ExchangeId, OrderRequest,
    QuoteCache, RoutingPlan, Symbol, SystemHealth,
};
use crate::error::Result;
use crate::exchange::{AdapterFactory, AdapterRegistry};
use crate::service::aggregator::MarketDataAggregator;
use crate::service::arbitrage::{ArbitrageConfig, ArbitrageEngine};
use crate::service::events::{Event, MarketDataEvent, NotifierRegistry};
use crate::service::health::{HealthMonitor, HealthMonitorConfig};
use crate::service::metrics::{RoutingMetricsRecorder, ServiceMetrics};
use crate::service::router::SmartOrderRouter;

/// Presents one logical trading venue over N independently failing
/// exchanges.
///
/// Owns the adapter registry and composes the aggregator, router,
/// arbitrage engine, and health monitor over it.
pub struct IntegrationService {
    config: Config,
    factory: Arc<dyn AdapterFactory>,
    registry: Arc<AdapterRegistry>,
    cache: Arc<QuoteCache>,
    notifiers: Arc<NotifierRegistry>,
    router: SmartOrderRouter,
    aggregator: MarketDataAggregator,
    arbitrage: ArbitrageEngine,
    monitor: HealthMonitor,
    metrics: Arc<RoutingMetricsRecorder>,
    started_at: Instant,
}

impl IntegrationService {
    /// Wire up the service. Adapters are built and connected by
    /// [`initialize`](Self::initialize).
    pub fn new(
        config: Config,
        factory: Arc<dyn AdapterFactory>,
        notifiers: NotifierRegistry,
    ) -> Self {
        let registry = Arc::new(AdapterRegistry::new());
        let cache = Arc::new(QuoteCache::new(config.service.quote_ttl()));
        let notifiers = Arc::new(notifiers);

        let router = SmartOrderRouter::new(registry.clone(), config.service.request_timeout());
        let aggregator = MarketDataAggregator::new(
            registry.clone(),
            cache.clone(),
            config.service.request_timeout(),
        );
        let arbitrage = ArbitrageEngine::new(
            registry.clone(),
            cache.clone(),
            notifiers.clone(),
            ArbitrageConfig {
                threshold: config.service.arbitrage_threshold,
                stale_window: config.service.max_stale_window(),
                request_timeout: config.service.request_timeout(),
            },
        );
        let monitor = HealthMonitor::new(
            registry.clone(),
            notifiers.clone(),
            HealthMonitorConfig {
                check_interval: config.service.health_check_interval(),
                reconnect_delay: config.service.reconnect_delay(),
            },
        );

        Self {
            config,
            factory,
            registry,
            cache,
            notifiers,
            router,
            aggregator,
            arbitrage,
            monitor,
            metrics: Arc::new(RoutingMetricsRecorder::new()),
            started_at: Instant::now(),
        }
    }

    /// Build one adapter per configured venue, connect them, and start
    /// the health monitor.
    ///
    /// Fails soft: a venue whose adapter cannot be built is logged and
    /// excluded; a venue whose initial connect fails stays registered as
    /// disconnected for the monitor to recover. Only an empty registry
    /// after all of that is an error.
    pub async fn initialize(&self) -> Result<()> {
        for exchange_config in &self.config.exchanges {
            match self.factory.build(exchange_config) {
                Ok(adapter) => {
                    let name = adapter.name().clone();
                    self.registry.insert(adapter, exchange_config.priority);
                    if !exchange_config.enabled {
                        self.registry.disable(&name);
                    }
                }
                Err(err) => {
                    error!(
                        exchange = %exchange_config.name,
                        error = %err,
                        "Failed to build adapter, excluding venue"
                    );
                }
            }
        }

        if self.registry.is_empty() {
            return Err(crate::error::ConfigError::MissingField { field: "exchanges" }.into());
        }

        for (name, adapter, _) in self.registry.enabled_adapters() {
            match adapter.connect().await {
                Ok(()) => {
                    info!(exchange = %name, "Adapter connected");
                    self.notifiers
                        .notify_all(Event::ExchangeConnected { exchange: name });
                }
                Err(err) => {
                    warn!(
                        exchange = %name,
                        error = %err,
                        "Initial connect failed, monitor will reconnect"
                    );
                    self.notifiers.notify_all(Event::ExchangeError {
                        exchange: name,
                        detail: err.to_string(),
                    });
                }
            }
        }

        self.monitor.start();
        info!(
            adapters = self.registry.len(),
            enabled = self.registry.enabled_names().len(),
            "Integration service initialized"
        );
        Ok(())
    }

    /// Route an order to the venue with the best effective price.
    ///
    /// Blocks for the full market-analysis fan-out (bounded by the
    /// per-adapter timeout); holds no lock across that wait.
    pub async fn route_order(&self, request: OrderRequest) -> Result<RoutingPlan> {
        if let Err(err) = request.validate() {
            self.metrics.record_rejected();
            return Err(err.into());
        }

        let started = Instant::now();
        let analysis = self.router.analyze_market(&request.symbol).await;
        match self.router.find_optimal_routing(&request, &analysis) {
            Ok(plan) => {
                self.metrics.record_routed(started.elapsed());
                Ok(plan)
            }
            Err(err) => {
                self.metrics.record_rejected();
                Err(err)
            }
        }
    }

    /// Detect cross-venue arbitrage opportunities for a symbol, sorted
    /// by net spread descending.
    pub async fn detect_arbitrage(&self, symbol: &Symbol) -> Vec<ArbitrageOpportunity> {
        self.arbitrage.detect(symbol).await
    }

    /// Build the fused multi-venue market view for a symbol.
    pub async fn aggregated_market_data(&self, symbol: &Symbol) -> Result<AggregatedMarketView> {
        let view = self.aggregator.aggregate(symbol).await?;
        self.notifiers
            .notify_all(Event::MarketDataUpdate(MarketDataEvent {
                symbol: view.symbol.clone(),
                best_bid: view.best.bid,
                best_ask: view.best.ask,
                contributing_exchanges: view.quotes.len(),
            }));
        Ok(view)
    }

    /// Names of enabled venues, in priority order.
    pub fn active_exchanges(&self) -> Vec<ExchangeId> {
        self.registry.enabled_names()
    }

    /// Health snapshot for one venue.
    pub fn exchange_status(&self, name: &ExchangeId) -> Result<ExchangeHealth> {
        self.registry
            .get(name)
            .map(|adapter| adapter.health())
            .ok_or_else(|| crate::error::Error::UnknownExchange(name.clone()))
    }

    /// Health snapshots for every registered venue.
    pub fn exchange_statuses(&self) -> BTreeMap<ExchangeId, ExchangeHealth> {
        self.registry
            .all_adapters()
            .into_iter()
            .map(|(name, adapter)| (name, adapter.health()))
            .collect()
    }

    /// Classify system health right now (also emits a health event).
    pub fn check_health(&self) -> SystemHealth {
        self.monitor.check_now()
    }

    /// Service-level metrics.
    pub fn service_metrics(&self) -> ServiceMetrics {
        ServiceMetrics {
            active_exchanges: self.registry.enabled_names().len(),
            total_adapters: self.registry.len(),
            routing: self.metrics.snapshot(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }

    /// The adapter registry, for enable/disable control.
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// The shared quote cache.
    pub fn quote_cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Stop the monitor and disconnect every adapter.
    pub async fn shutdown(&self) {
        self.monitor.stop();
        for (name, adapter) in self.registry.all_adapters() {
            if let Err(err) = adapter.disconnect().await {
                warn!(exchange = %name, error = %err, "Disconnect failed during shutdown");
            }
            self.notifiers
                .notify_all(Event::ExchangeDisconnected { exchange: name });
        }
        info!("Integration service shut down");
    }
}
