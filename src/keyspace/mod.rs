//! The command facade
//!
//! `Keyspace` exposes one method per command. Every single-key command
//! follows the same path:
//!
//! 1. sample the clock once,
//! 2. take the key's lock stripe,
//! 3. load the entry, deleting it first if it has expired,
//! 4. check its type,
//! 5. compute the new value,
//! 6. write it back, or delete the key if the collection became empty.
//!
//! The lock is held from step 3 to step 6 so read-modify-write commands on
//! the same key never interleave. Commands over several keys take the locks
//! one key at a time and are atomic per key only.

mod expiry;
mod hash;
mod keys;
mod list;
mod set;
mod string;
mod zset;

pub use expiry::is_live;
pub use zset::ScoredMember;

use crate::aof::{AofBackend, AofConfig};
use crate::error::{BackendError, KvError, Result};
use crate::store::{Backend, Clock, Entry, KeyType, MemoryBackend, SystemClock, Value};
use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;
use std::sync::Arc;

/// Number of lock stripes shared by all keys
const LOCK_STRIPES: usize = 64;

/// Striped per-key locks
struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    fn new() -> Self {
        KeyLocks {
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    fn lock(&self, key: &[u8]) -> MutexGuard<'_, ()> {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        let idx = (hasher.finish() % LOCK_STRIPES as u64) as usize;
        self.stripes[idx].lock()
    }
}

/// Typed command engine over a backing store
pub struct Keyspace {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
    locks: KeyLocks,
}

impl Keyspace {
    /// Create a keyspace over the given backend and clock
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Keyspace {
            backend,
            clock,
            locks: KeyLocks::new(),
        }
    }

    /// Volatile keyspace on the wall clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), Arc::new(SystemClock))
    }

    /// Keyspace on the wall clock, durable when the AOF is enabled
    pub fn open(aof: &AofConfig) -> Result<Self, BackendError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let backend: Arc<dyn Backend> = if aof.enabled {
            Arc::new(AofBackend::open_with_clock(aof, clock.clone())?)
        } else {
            Arc::new(MemoryBackend::new())
        };
        Ok(Self::new(backend, clock))
    }

    /// The backing store
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Load a live entry. An expired entry is deleted and reported absent.
    fn load(&self, key: &[u8], now: u64) -> Result<Option<Entry>> {
        let entry = self.backend.get(key)?;
        self.lazy_expire(entry, now)
    }

    /// Load a live entry and check it holds `expected`
    fn load_typed(&self, key: &[u8], expected: KeyType, now: u64) -> Result<Option<Entry>> {
        let entry = self.load(key, now)?;
        require_type(entry.as_ref(), expected)?;
        Ok(entry)
    }

    /// Write an entry back; an emptied collection deletes the key instead
    fn commit(&self, mut entry: Entry, now: u64) -> Result<()> {
        if entry.value.is_empty_collection() {
            self.backend.delete(&entry.key)?;
        } else {
            entry.touch(now);
            self.backend.upsert(entry)?;
        }
        Ok(())
    }

    /// Read-only access to the collection at `key`; `None` when absent
    fn read_as<C, T>(
        &self,
        key: &[u8],
        expected: KeyType,
        access: fn(&Value) -> Option<&C>,
        f: impl FnOnce(&C) -> T,
    ) -> Result<Option<T>> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        let Some(entry) = self.load_typed(key, expected, now)? else {
            return Ok(None);
        };
        let inner = access(&entry.value).ok_or(KvError::WrongType)?;
        Ok(Some(f(inner)))
    }

    /// Read-modify-write of the collection at `key`
    ///
    /// With `create`, an absent key starts as an empty collection; without
    /// it the closure is skipped and `None` returned. The closure returns
    /// its result and whether it changed the collection. Nothing is written
    /// when it fails or reports no change.
    fn update_as<C, T>(
        &self,
        key: &[u8],
        expected: KeyType,
        create: bool,
        access: fn(&mut Value) -> Option<&mut C>,
        f: impl FnOnce(&mut C) -> Result<(T, bool)>,
    ) -> Result<Option<T>> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        let mut entry = match self.load_typed(key, expected, now)? {
            Some(entry) => entry,
            None if create => Entry::new(Bytes::copy_from_slice(key), Value::empty(expected), now),
            None => return Ok(None),
        };

        let inner = access(&mut entry.value).ok_or(KvError::WrongType)?;
        let (out, changed) = f(inner)?;
        if changed {
            self.commit(entry, now)?;
        }
        Ok(Some(out))
    }
}

/// Fails with `WrongType` when a live entry holds another type. An absent
/// entry always passes: the caller then starts from an empty value.
pub fn require_type(entry: Option<&Entry>, expected: KeyType) -> Result<()> {
    match entry {
        Some(entry) if entry.key_type() != expected => Err(KvError::WrongType),
        _ => Ok(()),
    }
}
