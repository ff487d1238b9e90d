//! Storage layer
//!
//! Defines the entry model and the narrow interface the keyspace consumes
//! from a backing store. This module knows nothing about commands.

mod clock;
mod entry;
mod memory;
mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::Entry;
pub use memory::MemoryBackend;
pub use value::{parse_integer, KeyType, Scalar, Value};

use crate::error::BackendError;
use crate::pattern::LikePattern;
use bytes::Bytes;
use regex::bytes::Regex;

/// Backing store adapter
///
/// Each call is atomic on its own. Scans return keys in ascending byte
/// order and do not look at expiry; callers sweep first when they need
/// only live keys.
pub trait Backend: Send + Sync {
    /// Point read
    fn get(&self, key: &[u8]) -> Result<Option<Entry>, BackendError>;

    /// Insert or replace by key
    fn upsert(&self, entry: Entry) -> Result<(), BackendError>;

    /// Remove a key, returns true if it was present
    fn delete(&self, key: &[u8]) -> Result<bool, BackendError>;

    /// Remove every entry matching the predicate, returns how many went
    fn delete_where(&self, predicate: &dyn Fn(&Entry) -> bool) -> Result<usize, BackendError>;

    /// Keys matched by a wildcard pattern
    fn scan_like(&self, pattern: &LikePattern) -> Result<Vec<Bytes>, BackendError>;

    /// Keys matched by a regex
    fn scan_regex(&self, regex: &Regex) -> Result<Vec<Bytes>, BackendError>;

    /// Number of stored entries, expired ones included
    fn len(&self) -> Result<usize, BackendError>;

    /// Remove everything, returns how many entries went
    fn clear(&self) -> Result<usize, BackendError>;
}
