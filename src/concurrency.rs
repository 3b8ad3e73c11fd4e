//! Per-key locking for inventory records
//!
//! Record files have no cross-record transactions, so callers that share a
//! store serialize writes per node identity or per override file. Lookups on
//! one key take a shared lock; mutations take the exclusive one.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Lazily created read-write lock per string key.
pub struct KeyedLockManager {
    locks: RwLock<HashMap<String, Arc<RwLock<()>>>>,
}

impl KeyedLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock guarding `key`.
    pub fn get_lock(&self, key: &str) -> Arc<RwLock<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(key) {
                return lock.clone();
            }
        }

        // Another thread may have inserted between the two acquisitions.
        let mut map = self.locks.write();
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Number of keys that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeyedLockManager {
    fn default() -> Self {
        Self::new()
    }
}
