//! Registry of active exchange adapters.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::ExchangeId;

use super::traits::ExchangeAdapter;

struct Entry {
    adapter: Arc<dyn ExchangeAdapter>,
    priority: u32,
    enabled: bool,
}

/// Owns the active set of adapters keyed by exchange name.
///
/// Explicitly owned collection, constructed by the integration service;
/// no global state. Priority is the tie-break order for routing (lower
/// wins).
pub struct AdapterRegistry {
    entries: RwLock<HashMap<ExchangeId, Entry>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register an adapter under its own name. Replaces any previous
    /// adapter with the same name.
    pub fn insert(&self, adapter: Arc<dyn ExchangeAdapter>, priority: u32) {
        let name = adapter.name().clone();
        self.entries.write().insert(
            name,
            Entry {
                adapter,
                priority,
                enabled: true,
            },
        );
    }

    /// Look up an adapter by name, enabled or not.
    pub fn get(&self, name: &ExchangeId) -> Option<Arc<dyn ExchangeAdapter>> {
        self.entries
            .read()
            .get(name)
            .map(|entry| entry.adapter.clone())
    }

    /// Routing priority for a venue (lower wins ties).
    pub fn priority_of(&self, name: &ExchangeId) -> Option<u32> {
        self.entries.read().get(name).map(|entry| entry.priority)
    }

    /// Re-enable a disabled venue. Returns false for unknown names.
    pub fn enable(&self, name: &ExchangeId) -> bool {
        self.set_enabled(name, true)
    }

    /// Take a venue out of every candidate set. Returns false for
    /// unknown names.
    pub fn disable(&self, name: &ExchangeId) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &ExchangeId, enabled: bool) -> bool {
        match self.entries.write().get_mut(name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Whether a venue is currently enabled.
    pub fn is_enabled(&self, name: &ExchangeId) -> bool {
        self.entries
            .read()
            .get(name)
            .is_some_and(|entry| entry.enabled)
    }

    /// Snapshot of enabled adapters with their priorities, sorted by
    /// priority then name for deterministic iteration.
    pub fn enabled_adapters(&self) -> Vec<(ExchangeId, Arc<dyn ExchangeAdapter>, u32)> {
        let mut adapters: Vec<_> = self
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(name, entry)| (name.clone(), entry.adapter.clone(), entry.priority))
            .collect();
        adapters.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
        adapters
    }

    /// Snapshot of every registered adapter, enabled or not.
    pub fn all_adapters(&self) -> Vec<(ExchangeId, Arc<dyn ExchangeAdapter>)> {
        let mut adapters: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.adapter.clone()))
            .collect();
        adapters.sort_by(|a, b| a.0.cmp(&b.0));
        adapters
    }

    /// Names of enabled venues, in priority order.
    pub fn enabled_names(&self) -> Vec<ExchangeId> {
        self.enabled_adapters()
            .into_iter()
            .map(|(name, _, _)| name)
            .collect()
    }

    /// Total number of registered adapters.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
