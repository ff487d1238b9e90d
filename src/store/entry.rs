//! Entry structure for key-value pairs

use super::value::{KeyType, Value};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Represents a single entry in the store
///
/// Timestamps are milliseconds since the UNIX epoch, as produced by a
/// [`Clock`](super::Clock). The type tag is derived from `value`, so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The key
    pub key: Bytes,

    /// The value
    pub value: Value,

    /// Absolute expiration time; `None` means the entry never expires
    pub expires_at: Option<u64>,

    /// When the key was first written
    pub created_at: u64,

    /// Last mutation
    pub updated_at: u64,
}

impl Entry {
    /// Create a new entry without expiration
    pub fn new(key: impl Into<Bytes>, value: Value, now: u64) -> Self {
        Entry {
            key: key.into(),
            value,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Type tag of the held value
    pub fn key_type(&self) -> KeyType {
        self.value.key_type()
    }

    /// Check if the entry has expired at `now`
    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    /// Remaining time to live in milliseconds
    /// Returns:
    /// - Some(n) where n >= 0: remaining TTL
    /// - None: no expiration
    pub fn ttl_millis(&self, now: u64) -> Option<u64> {
        self.expires_at.map(|at| at.saturating_sub(now))
    }

    /// Record a mutation
    pub fn touch(&mut self, now: u64) {
        self.updated_at = now;
    }
}
