//! Durable backend
//!
//! Keeps the live data in a [`MemoryBackend`] and appends every mutation
//! to the log before it is applied. All mutations go through the writer
//! lock, so the log order is the order the map saw them in.

use super::{replay_records, AofConfig, AofReader, AofRecord, AofWriter, SyncPolicy};
use crate::error::BackendError;
use crate::pattern::LikePattern;
use crate::store::{Backend, Clock, Entry, MemoryBackend, SystemClock};
use bytes::Bytes;
use parking_lot::Mutex;
use regex::bytes::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Backend persisted through an append-only log
pub struct AofBackend {
    memory: MemoryBackend,
    writer: Mutex<AofWriter>,
    path: PathBuf,
    sync_policy: SyncPolicy,
    clock: Arc<dyn Clock>,
}

impl AofBackend {
    /// Open the log at `config.path` on the wall clock
    pub fn open(config: &AofConfig) -> Result<Self, BackendError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Open the log at `config.path`, replaying it if it exists
    ///
    /// `clock` stamps delete records and decides liveness during
    /// compaction. A log with a corrupt tail is rewritten right away so new
    /// records never land behind unreadable bytes.
    pub fn open_with_clock(config: &AofConfig, clock: Arc<dyn Clock>) -> Result<Self, BackendError> {
        let memory = MemoryBackend::new();
        let path = config.path.clone();

        let mut torn = false;
        if path.exists() {
            let reader = AofReader::load(&path)?;
            let (records, valid) = reader.parse_records();
            replay_records(&memory, &records)?;
            torn = valid < reader.size();
        } else {
            info!("No AOF at {}, starting empty", path.display());
        }

        let backend = AofBackend {
            memory,
            writer: Mutex::new(AofWriter::new(&path, config.sync_policy)?),
            path,
            sync_policy: config.sync_policy,
            clock,
        };

        if torn {
            warn!("Rewriting {} to drop its corrupt tail", backend.path.display());
            backend.compact()?;
        }

        Ok(backend)
    }

    /// Location of the log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the log as one `Upsert` per live entry
    ///
    /// The new log is written next to the old one and renamed over it.
    /// Returns the number of entries kept.
    pub fn compact(&self) -> Result<usize, BackendError> {
        let mut writer = self.writer.lock();
        let now = self.clock.now_millis();

        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(".rewrite");
        let tmp_path = PathBuf::from(tmp_name);

        let mut fresh = AofWriter::create(&tmp_path, SyncPolicy::No)?;
        let mut kept = 0;
        for entry in self.memory.snapshot().iter().filter(|e| !e.is_expired(now)) {
            fresh.write(&AofRecord::upsert(entry)?)?;
            kept += 1;
        }
        fresh.sync()?;
        drop(fresh);

        fs::rename(&tmp_path, &self.path)?;
        *writer = AofWriter::new(&self.path, self.sync_policy)?;

        info!("Compacted {} to {} entries", self.path.display(), kept);
        Ok(kept)
    }

    /// Force the log to disk
    pub fn sync(&self) -> Result<(), BackendError> {
        Ok(self.writer.lock().sync()?)
    }
}

impl Backend for AofBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Entry>, BackendError> {
        self.memory.get(key)
    }

    fn upsert(&self, entry: Entry) -> Result<(), BackendError> {
        let record = AofRecord::upsert(&entry)?;
        let mut writer = self.writer.lock();
        writer.write(&record)?;
        self.memory.upsert(entry)
    }

    fn delete(&self, key: &[u8]) -> Result<bool, BackendError> {
        let mut writer = self.writer.lock();
        if self.memory.get(key)?.is_none() {
            return Ok(false);
        }
        writer.write(&AofRecord::delete(key, self.clock.now_millis()))?;
        self.memory.delete(key)
    }

    fn delete_where(&self, predicate: &dyn Fn(&Entry) -> bool) -> Result<usize, BackendError> {
        let mut writer = self.writer.lock();
        let removed = self.memory.remove_matching(predicate);
        let now = self.clock.now_millis();
        for key in &removed {
            writer.write(&AofRecord::delete(key, now))?;
        }
        Ok(removed.len())
    }

    fn scan_like(&self, pattern: &LikePattern) -> Result<Vec<Bytes>, BackendError> {
        self.memory.scan_like(pattern)
    }

    fn scan_regex(&self, regex: &Regex) -> Result<Vec<Bytes>, BackendError> {
        self.memory.scan_regex(regex)
    }

    fn len(&self) -> Result<usize, BackendError> {
        self.memory.len()
    }

    fn clear(&self) -> Result<usize, BackendError> {
        let mut writer = self.writer.lock();
        writer.write(&AofRecord::clear(self.clock.now_millis()))?;
        self.memory.clear()
    }
}
