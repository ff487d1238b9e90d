//! Expiration: lazy deletion on access, the bulk sweep, and the TTL
//! commands (EXPIRE, TTL, PTTL, PERSIST)

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::Entry;
use tracing::{debug, info};

/// An entry is live while it has no deadline or its deadline is still ahead
pub fn is_live(entry: &Entry, now: u64) -> bool {
    !entry.is_expired(now)
}

impl Keyspace {
    /// Drop a loaded entry that has expired, deleting it from the backend
    pub(super) fn lazy_expire(&self, entry: Option<Entry>, now: u64) -> Result<Option<Entry>> {
        match entry {
            Some(entry) if !is_live(&entry, now) => {
                debug!("Lazily expiring key {:?}", String::from_utf8_lossy(&entry.key));
                self.backend.delete(&entry.key)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete every expired entry in one pass
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        let now = self.now();
        self.sweep(now)
    }

    pub(super) fn sweep(&self, now: u64) -> Result<usize> {
        let removed = self.backend.delete_where(&|entry| !is_live(entry, now))?;
        if removed > 0 {
            info!("Swept {} expired keys", removed);
        }
        Ok(removed)
    }

    /// Set a timeout on a key
    ///
    /// A non-positive timeout deletes the key. Returns false if the key
    /// does not exist.
    pub fn expire(&self, key: &[u8], seconds: i64) -> Result<bool> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        let Some(mut entry) = self.load(key, now)? else {
            return Ok(false);
        };

        if seconds <= 0 {
            self.backend.delete(key)?;
            return Ok(true);
        }

        let deadline = seconds
            .checked_mul(1000)
            .and_then(|ms| u64::try_from(ms).ok())
            .and_then(|ms| now.checked_add(ms))
            .ok_or_else(|| KvError::invalid("invalid expire time in 'expire' command"))?;

        entry.expires_at = Some(deadline);
        self.commit(entry, now)?;
        Ok(true)
    }

    /// Remaining time to live in seconds
    ///
    /// Returns -2 if the key does not exist and -1 if it has no expiration.
    pub fn ttl(&self, key: &[u8]) -> Result<i64> {
        Ok(match self.remaining(key)? {
            Remaining::Missing => -2,
            Remaining::Forever => -1,
            Remaining::Millis(ms) => ((ms + 500) / 1000) as i64,
        })
    }

    /// Same as [`ttl`](Self::ttl) in milliseconds
    pub fn pttl(&self, key: &[u8]) -> Result<i64> {
        Ok(match self.remaining(key)? {
            Remaining::Missing => -2,
            Remaining::Forever => -1,
            Remaining::Millis(ms) => ms as i64,
        })
    }

    /// Remove the timeout of a key, returns true if one was removed
    pub fn persist(&self, key: &[u8]) -> Result<bool> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        match self.load(key, now)? {
            Some(mut entry) if entry.expires_at.is_some() => {
                entry.expires_at = None;
                self.commit(entry, now)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remaining(&self, key: &[u8]) -> Result<Remaining> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        Ok(match self.load(key, now)? {
            None => Remaining::Missing,
            Some(entry) => match entry.ttl_millis(now) {
                None => Remaining::Forever,
                Some(ms) => Remaining::Millis(ms),
            },
        })
    }
}

enum Remaining {
    Missing,
    Forever,
    Millis(u64),
}
