//! AOF reader
//!
//! Loads a log file and splits it into records.

use super::AofRecord;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// AOF reader
pub struct AofReader {
    data: Vec<u8>,
}

impl AofReader {
    /// Load AOF file
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(AofReader {
            data: fs::read(path)?,
        })
    }

    /// Wrap bytes already in memory
    pub fn from_bytes(data: Vec<u8>) -> Self {
        AofReader { data }
    }

    /// Parse every record up to the first corrupt one
    ///
    /// Anything after a corrupt record is ignored, so a torn final write
    /// only loses that write. Also returns how many leading bytes were valid.
    pub fn parse_records(&self) -> (Vec<AofRecord>, usize) {
        let mut records = Vec::new();
        let mut pos = 0;

        while pos < self.data.len() {
            match AofRecord::from_bytes(&self.data[pos..]) {
                Ok((record, size)) => {
                    records.push(record);
                    pos += size;
                }
                Err(e) => {
                    warn!(
                        "AOF corrupt at byte {}: {}. Ignoring the remaining {} bytes, {} records recovered.",
                        pos,
                        e,
                        self.data.len() - pos,
                        records.len()
                    );
                    return (records, pos);
                }
            }
        }

        info!("AOF loaded: {} records", records.len());
        (records, pos)
    }

    /// Get the total size of the AOF data
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aof::{AofWriter, SyncPolicy};
    use bytes::Bytes;

    #[test]
    fn test_load_and_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.aof");

        let mut writer = AofWriter::new(&path, SyncPolicy::Always).unwrap();
        writer.write(&AofRecord::delete(b"key1", 1)).unwrap();
        writer.write(&AofRecord::delete(b"key2", 2)).unwrap();

        let (records, valid) = AofReader::load(&path).unwrap().parse_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, Bytes::from("key1"));
        assert_eq!(records[1].key, Bytes::from("key2"));
        assert_eq!(valid, std::fs::metadata(&path).unwrap().len() as usize);
    }

    #[test]
    fn test_stops_at_first_corrupt_record() {
        let mut data = AofRecord::delete(b"a", 1).to_bytes().unwrap();
        let mut bad = AofRecord::delete(b"b", 2).to_bytes().unwrap();
        bad[5] ^= 0xFF;
        data.extend_from_slice(&bad);
        data.extend_from_slice(&AofRecord::delete(b"c", 3).to_bytes().unwrap());

        let first_len = AofRecord::delete(b"a", 1).to_bytes().unwrap().len();
        let reader = AofReader::from_bytes(data);
        let (records, valid) = reader.parse_records();

        assert_eq!(records.len(), 1);
        assert_eq!(valid, first_len);
        assert_eq!(records[0].key, Bytes::from("a"));
    }

    #[test]
    fn test_torn_tail() {
        let mut data = AofRecord::clear(1).to_bytes().unwrap();
        data.extend_from_slice(&[3, 0, 0]);

        let reader = AofReader::from_bytes(data);
        let (records, valid) = reader.parse_records();
        assert_eq!(records.len(), 1);
        assert_eq!(valid, reader.size() - 3);
    }
}
