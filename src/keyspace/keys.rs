//! Key directory commands (DEL, EXISTS, TYPE, KEYS, DBSIZE, FLUSHALL)

use super::Keyspace;
use crate::error::Result;
use crate::pattern::{self, GlobStrategy};
use crate::store::KeyType;
use bytes::Bytes;
use tracing::{debug, info};

impl Keyspace {
    /// Delete keys, returns how many live keys were removed
    pub fn del<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<usize> {
        let now = self.now();
        let mut removed = 0;

        for key in keys {
            let key = key.as_ref();
            let _guard = self.locks.lock(key);
            if self.load(key, now)?.is_some() && self.backend.delete(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count live keys; a key listed twice counts twice
    pub fn exists<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<usize> {
        let now = self.now();
        let mut found = 0;

        for key in keys {
            let key = key.as_ref();
            let _guard = self.locks.lock(key);
            if self.load(key, now)?.is_some() {
                found += 1;
            }
        }
        Ok(found)
    }

    /// Type of the value at `key`, `None` when absent
    pub fn key_type(&self, key: &[u8]) -> Result<Option<KeyType>> {
        let now = self.now();
        let _guard = self.locks.lock(key);
        Ok(self.load(key, now)?.map(|entry| entry.key_type()))
    }

    /// Live keys matching a glob pattern, in ascending byte order
    ///
    /// Expired entries are swept first so the scan only sees live keys.
    /// Patterns made of literals, `?` and `*` go through the backend's
    /// wildcard scan; anything with a character class falls back to a
    /// regex.
    pub fn keys(&self, pattern: &[u8]) -> Result<Vec<Bytes>> {
        let now = self.now();
        self.sweep(now)?;

        let keys = match pattern::compile(pattern) {
            GlobStrategy::Like(like) => self.backend.scan_like(&like)?,
            GlobStrategy::RequiresRegex => {
                debug!("KEYS pattern needs a regex scan");
                let regex = pattern::glob_to_regex(pattern)?;
                self.backend.scan_regex(&regex)?
            }
        };
        Ok(keys)
    }

    /// Number of live keys
    pub fn dbsize(&self) -> Result<usize> {
        let now = self.now();
        self.sweep(now)?;
        Ok(self.backend.len()?)
    }

    /// Remove every key
    pub fn flushall(&self) -> Result<()> {
        let removed = self.backend.clear()?;
        info!("Flushed {} keys", removed);
        Ok(())
    }
}
