//! # Store Boundary
//!
//! Traits for the two external collaborators the engine consumes: the
//! config source and the history sink. The real implementations live in
//! the hosting application (a remote document store reached over a network
//! API); the engine only ever reads configs and fire-and-forgets history
//! records.
//!
//! [`MemoryStore`] and [`MemoryHistory`] are complete in-process
//! implementations used by the CLI and the test suite.

use std::sync::Mutex;

use crate::config::{CalculatorConfig, HistoryRecord};
use crate::errors::{CalcError, CalcResult};

/// Read-only source of calculator configs.
pub trait ConfigStore {
    /// All active configs, newest created first.
    fn fetch_active(&self) -> CalcResult<Vec<CalculatorConfig>>;

    /// Lookup by slug (case-sensitive). Inactive configs are still
    /// reachable by direct slug, matching the listing/detail split.
    fn fetch_by_slug(&self, slug: &str) -> CalcResult<Option<CalculatorConfig>>;
}

/// Fire-and-forget sink for evaluation history.
pub trait HistorySink {
    fn record(&self, record: HistoryRecord) -> CalcResult<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    fn fetch_active(&self) -> CalcResult<Vec<CalculatorConfig>> {
        (**self).fetch_active()
    }

    fn fetch_by_slug(&self, slug: &str) -> CalcResult<Option<CalculatorConfig>> {
        (**self).fetch_by_slug(slug)
    }
}

impl<T: HistorySink + ?Sized> HistorySink for &T {
    fn record(&self, record: HistoryRecord) -> CalcResult<()> {
        (**self).record(record)
    }
}

/// In-memory config store.
///
/// Configs are validated on insert, so anything fetched from here is
/// structurally sound.
#[derive(Debug, Default)]
pub struct MemoryStore {
    configs: Vec<CalculatorConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Insert a config, rejecting structurally invalid definitions.
    pub fn insert(&mut self, config: CalculatorConfig) -> CalcResult<()> {
        config.validate()?;
        if self.configs.iter().any(|c| c.slug == config.slug) {
            return Err(CalcError::invalid_config(
                &config.slug,
                "slug already in use",
            ));
        }
        self.configs.push(config);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn fetch_active(&self) -> CalcResult<Vec<CalculatorConfig>> {
        let mut active: Vec<CalculatorConfig> = self
            .configs
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    fn fetch_by_slug(&self, slug: &str) -> CalcResult<Option<CalculatorConfig>> {
        Ok(self.configs.iter().find(|c| c.slug == slug).cloned())
    }
}

/// In-memory history sink, for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        MemoryHistory::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl HistorySink for MemoryHistory {
    fn record(&self, record: HistoryRecord) -> CalcResult<()> {
        self.records
            .lock()
            .map_err(|_| CalcError::store("record", "history lock poisoned"))?
            .push(record);
        Ok(())
    }
}

/// A sink that drops every record. For hosts that opt out of history.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHistory;

impl HistorySink for NullHistory {
    fn record(&self, _record: HistoryRecord) -> CalcResult<()> {
        Ok(())
    }
}
