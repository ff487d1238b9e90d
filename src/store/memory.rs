//! In-memory storage implementation

use super::{Backend, Entry};
use crate::error::BackendError;
use crate::pattern::LikePattern;
use bytes::Bytes;
use parking_lot::RwLock;
use regex::bytes::Regex;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered map keyed by the raw key bytes
type StoreMap = BTreeMap<Bytes, Entry>;

/// In-memory backing store
///
/// Keys are kept ordered so pattern scans can start at the literal prefix
/// of the pattern instead of walking the whole map.
pub struct MemoryBackend {
    store: RwLock<StoreMap>,
}

impl MemoryBackend {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryBackend {
            store: RwLock::new(BTreeMap::new()),
        }
    }

    /// Remove matching entries and hand back their keys
    pub fn remove_matching(&self, predicate: &dyn Fn(&Entry) -> bool) -> Vec<Bytes> {
        let mut store = self.store.write();
        let doomed: Vec<Bytes> = store
            .values()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &doomed {
            store.remove(key);
        }
        doomed
    }

    /// Copy of every entry, in key order
    pub fn snapshot(&self) -> Vec<Entry> {
        self.store.read().values().cloned().collect()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Entry>, BackendError> {
        Ok(self.store.read().get(key).cloned())
    }

    fn upsert(&self, entry: Entry) -> Result<(), BackendError> {
        self.store.write().insert(entry.key.clone(), entry);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<bool, BackendError> {
        Ok(self.store.write().remove(key).is_some())
    }

    fn delete_where(&self, predicate: &dyn Fn(&Entry) -> bool) -> Result<usize, BackendError> {
        Ok(self.remove_matching(predicate).len())
    }

    fn scan_like(&self, pattern: &LikePattern) -> Result<Vec<Bytes>, BackendError> {
        let prefix = pattern.literal_prefix();
        let store = self.store.read();

        if pattern.is_exact() {
            return Ok(store
                .get_key_value(prefix.as_slice())
                .map(|(key, _)| vec![key.clone()])
                .unwrap_or_default());
        }

        let start = Bytes::from(prefix.clone());
        Ok(store
            .range::<Bytes, _>((Bound::Included(start), Bound::Unbounded))
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix))
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect())
    }

    fn scan_regex(&self, regex: &Regex) -> Result<Vec<Bytes>, BackendError> {
        Ok(self
            .store
            .read()
            .keys()
            .filter(|key| regex.is_match(key))
            .cloned()
            .collect())
    }

    fn len(&self) -> Result<usize, BackendError> {
        Ok(self.store.read().len())
    }

    fn clear(&self) -> Result<usize, BackendError> {
        let mut store = self.store.write();
        let removed = store.len();
        store.clear();
        Ok(removed)
    }
}
