use moka::sync::Cache;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::HistoryConfig;
use crate::error::{EngineError, Result};
use crate::history::{HistoryEntry, HistoryKey, VelocityHistory};

type Slot = Arc<Mutex<Option<HistoryEntry>>>;

/// Bounded in-memory history.
///
/// Each key owns its own mutex slot inside a moka cache, so a read-modify-write
/// on one key serializes only against calls for that key. The cache evicts by
/// size (TinyLFU admission with LRU eviction) and by idle time.
pub struct MemoryHistory {
    slots: Cache<HistoryKey, Slot>,
}

impl MemoryHistory {
    pub fn new(capacity: u64, idle_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(capacity);
        if let Some(idle_ttl) = idle_ttl {
            builder = builder.time_to_idle(idle_ttl);
        }
        Self {
            slots: builder.build(),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        let idle_ttl = (config.idle_ttl_secs > 0).then(|| Duration::from_secs(config.idle_ttl_secs));
        Self::new(config.capacity, idle_ttl)
    }

    /// Seeds the store, typically from a persisted snapshot.
    pub fn seed(&self, entries: impl IntoIterator<Item = (HistoryKey, HistoryEntry)>) {
        for (key, entry) in entries {
            self.slots.insert(key, Arc::new(Mutex::new(Some(entry))));
        }
    }

    /// Every populated key, in no particular order.
    pub fn entries(&self) -> Vec<(HistoryKey, HistoryEntry)> {
        self.slots
            .iter()
            .filter_map(|(key, slot)| {
                let guard = slot.lock().ok()?;
                guard.clone().map(|entry| ((*key).clone(), entry))
            })
            .collect()
    }

    pub fn len(&self) -> u64 {
        self.slots.run_pending_tasks();
        self.slots.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.invalidate_all();
        self.slots.run_pending_tasks();
    }

    fn slot(&self, key: &HistoryKey) -> Slot {
        self.slots
            .get_with(key.clone(), || Arc::new(Mutex::new(None)))
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

impl VelocityHistory for MemoryHistory {
    fn previous(&self, key: &HistoryKey) -> Result<Option<HistoryEntry>> {
        let Some(slot) = self.slots.get(key) else {
            return Ok(None);
        };
        let guard = slot
            .lock()
            .map_err(|_| EngineError::HistoryUnavailable(format!("poisoned slot for {:?}", key)))?;
        Ok(guard.clone())
    }

    fn swap(&self, key: &HistoryKey, entry: HistoryEntry) -> Result<Option<HistoryEntry>> {
        let slot = self.slot(key);
        let mut guard = slot
            .lock()
            .map_err(|_| EngineError::HistoryUnavailable(format!("poisoned slot for {:?}", key)))?;
        Ok(guard.replace(entry))
    }
}
