//! AOF writer
//!
//! Appends records to the log and applies the sync policy.

use super::{AofRecord, SyncPolicy};
use crate::error::BackendError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// AOF writer
pub struct AofWriter {
    file: File,
    sync_policy: SyncPolicy,
    last_sync: Instant,
}

impl AofWriter {
    /// Open `path` for appending, creating it if needed
    pub fn new<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_file(file, sync_policy))
    }

    /// Create `path`, truncating anything already there
    pub fn create<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_file(file, sync_policy))
    }

    fn from_file(file: File, sync_policy: SyncPolicy) -> Self {
        AofWriter {
            file,
            sync_policy,
            last_sync: Instant::now(),
        }
    }

    /// Append one record
    pub fn write(&mut self, record: &AofRecord) -> Result<(), BackendError> {
        self.file.write_all(&record.to_bytes()?)?;

        match self.sync_policy {
            SyncPolicy::Always => self.file.sync_all()?,
            SyncPolicy::EverySecond => {
                if self.last_sync.elapsed() >= Duration::from_secs(1) {
                    self.sync()?;
                }
            }
            SyncPolicy::No => {}
        }

        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()?;
        self.last_sync = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.aof");

        let record = AofRecord::delete(b"testkey", 1);
        let size = record.to_bytes().unwrap().len() as u64;

        let mut writer = AofWriter::new(&path, SyncPolicy::Always).unwrap();
        writer.write(&record).unwrap();
        drop(writer);

        let mut writer = AofWriter::new(&path, SyncPolicy::No).unwrap();
        writer.write(&record).unwrap();
        writer.sync().unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), size * 2);
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.aof");
        fs::write(&path, b"stale bytes").unwrap();

        let mut writer = AofWriter::create(&path, SyncPolicy::EverySecond).unwrap();
        writer.sync().unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }
}
