//! AOF replay
//!
//! Rebuilds the in-memory map from parsed records.

use super::{AofOp, AofRecord};
use crate::error::BackendError;
use crate::store::{Backend, MemoryBackend};
use tracing::{info, warn};

/// Apply records in log order, returns how many were applied
///
/// An `Upsert` whose payload no longer decodes is skipped with a warning.
pub fn replay_records(memory: &MemoryBackend, records: &[AofRecord]) -> Result<usize, BackendError> {
    let mut replayed = 0;

    for record in records {
        match replay_record(memory, record) {
            Ok(()) => replayed += 1,
            Err(BackendError::Serialize(e)) => {
                warn!("Skipping AOF upsert for {:?}: {}", record.key, e);
            }
            Err(e) => return Err(e),
        }
    }

    info!("Replayed {} AOF records", replayed);
    Ok(replayed)
}

fn replay_record(memory: &MemoryBackend, record: &AofRecord) -> Result<(), BackendError> {
    match record.op {
        AofOp::Upsert => memory.upsert(record.entry()?),
        AofOp::Delete => memory.delete(&record.key).map(|_| ()),
        AofOp::Clear => memory.clear().map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Entry, Value};
    use bytes::Bytes;

    #[test]
    fn test_replay_in_order() {
        let memory = MemoryBackend::new();
        let a = Entry::new("a", Value::string("1"), 1);
        let b = Entry::new("b", Value::string("2"), 2);

        let records = vec![
            AofRecord::upsert(&a).unwrap(),
            AofRecord::clear(3),
            AofRecord::upsert(&b).unwrap(),
            AofRecord::upsert(&a).unwrap(),
            AofRecord::delete(b"a", 4),
        ];

        assert_eq!(replay_records(&memory, &records).unwrap(), 5);
        assert_eq!(memory.get(b"a").unwrap(), None);
        assert_eq!(memory.get(b"b").unwrap(), Some(b));
    }

    #[test]
    fn test_undecodable_upsert_is_skipped() {
        let memory = MemoryBackend::new();
        let mut bad = AofRecord::upsert(&Entry::new("x", Value::string("v"), 1)).unwrap();
        bad.payload = Bytes::from_static(b"{not json");

        let records = vec![bad, AofRecord::upsert(&Entry::new("y", Value::string("v"), 2)).unwrap()];

        assert_eq!(replay_records(&memory, &records).unwrap(), 1);
        assert_eq!(memory.len().unwrap(), 1);
    }
}
