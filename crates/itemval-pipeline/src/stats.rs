//! # Validation Statistics
//!
//! The dispatcher reports what it sees through a [`ValidationStatsManager`],
//! which names each counter under the `spidermon/validation/` prefix and
//! writes it to a [`StatsSink`].
//!
//! ## Counters
//!
//! | Event | Key (after the prefix) |
//! |---|---|
//! | validator registered | `validators`, `validators/{type}/{name}` |
//! | item seen | `items` |
//! | fields seen | `fields` (by the field count) |
//! | field error | `fields/errors`, `fields/errors/{message}/{field}` |
//! | item had errors | `items/errors` (once per failing validator) |
//! | item dropped | `items/dropped` |

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use itemval_core::JsonSerializable;

/// Default prefix for every validation counter.
pub const STATS_PREFIX: &str = "spidermon/validation/";

const STATS_VALIDATORS: &str = "validators";
const STATS_ITEMS: &str = "items";
const STATS_ITEMS_ERRORS: &str = "items/errors";
const STATS_ITEMS_DROPPED: &str = "items/dropped";
const STATS_FIELDS: &str = "fields";
const STATS_FIELDS_ERRORS: &str = "fields/errors";

/// A write-mostly counter store.
pub trait StatsSink: Send + Sync {
    /// Add `count` to `key`, starting from zero if unset.
    fn inc_value(&self, key: &str, count: u64);

    /// Overwrite `key` with `value`.
    fn set_value(&self, key: &str, value: u64);

    /// Current value of `key`, if set.
    fn get_value(&self, key: &str) -> Option<u64>;
}

/// Thread-safe in-memory [`StatsSink`].
#[derive(Debug, Default)]
pub struct MemoryStats {
    values: Mutex<BTreeMap<String, u64>>,
}

impl MemoryStats {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot(self.values.lock().clone())
    }
}

impl StatsSink for MemoryStats {
    fn inc_value(&self, key: &str, count: u64) {
        *self.values.lock().entry(key.to_string()).or_insert(0) += count;
    }

    fn set_value(&self, key: &str, value: u64) {
        self.values.lock().insert(key.to_string(), value);
    }

    fn get_value(&self, key: &str) -> Option<u64> {
        self.values.lock().get(key).copied()
    }
}

/// Point-in-time copy of a [`MemoryStats`] store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsSnapshot(pub BTreeMap<String, u64>);

impl StatsSnapshot {
    /// Value of `key`, treating unset counters as zero.
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }
}

impl JsonSerializable for StatsSnapshot {}

/// Names validation events and forwards them to a sink.
#[derive(Clone)]
pub struct ValidationStatsManager {
    stats: Arc<dyn StatsSink>,
    prefix: String,
}

impl std::fmt::Debug for ValidationStatsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationStatsManager")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ValidationStatsManager {
    /// Wrap `stats` using the default prefix and zero the item and field
    /// counters.
    pub fn new(stats: Arc<dyn StatsSink>) -> Self {
        Self::with_prefix(stats, STATS_PREFIX)
    }

    /// Wrap `stats` using a custom key prefix.
    pub fn with_prefix(stats: Arc<dyn StatsSink>, prefix: impl Into<String>) -> Self {
        let manager = Self {
            stats,
            prefix: prefix.into(),
        };
        manager.init();
        manager
    }

    fn init(&self) {
        for key in [
            STATS_ITEMS,
            STATS_ITEMS_ERRORS,
            STATS_ITEMS_DROPPED,
            STATS_FIELDS,
            STATS_FIELDS_ERRORS,
        ] {
            self.stats.set_value(&self.key(key), 0);
        }
    }

    /// Full key for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// A validator named `name` was registered for `type_key`.
    pub fn add_validator(&self, type_key: &str, name: &str) {
        self.stats.inc_value(&self.key(STATS_VALIDATORS), 1);
        self.stats
            .inc_value(&self.key(&format!("{STATS_VALIDATORS}/{type_key}/{name}")), 1);
    }

    /// One record entered validation.
    pub fn add_item(&self) {
        self.stats.inc_value(&self.key(STATS_ITEMS), 1);
    }

    /// A record with `count` fields entered validation.
    pub fn add_fields(&self, count: usize) {
        self.stats
            .inc_value(&self.key(STATS_FIELDS), count as u64);
    }

    /// One message was reported for `field`.
    pub fn add_field_error(&self, field: &str, message: &str) {
        self.stats.inc_value(&self.key(STATS_FIELDS_ERRORS), 1);
        self.stats.inc_value(
            &self.key(&format!("{STATS_FIELDS_ERRORS}/{message}/{field}")),
            1,
        );
    }

    /// A validator failed a record.
    pub fn add_item_with_errors(&self) {
        self.stats.inc_value(&self.key(STATS_ITEMS_ERRORS), 1);
    }

    /// A record was rejected.
    pub fn add_dropped_item(&self) {
        self.stats.inc_value(&self.key(STATS_ITEMS_DROPPED), 1);
    }
}
