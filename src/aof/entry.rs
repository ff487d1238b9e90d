//! AOF record format
//!
//! Binary format: [op(u8)] [timestamp(u64)] [key_len(u32)] [key] [payload_len(u32)] [payload] [checksum(u64)]
//!
//! Integers are little-endian. The checksum is the xxh64 of every byte
//! before it.

use crate::error::BackendError;
use crate::store::Entry;
use bytes::Bytes;

/// Fixed overhead of a record with an empty key and payload
const HEADER_LEN: usize = 1 + 8 + 4 + 4 + 8;

/// AOF operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AofOp {
    /// Whole entry written, payload is its JSON form
    Upsert = 1,
    /// Key removed
    Delete = 2,
    /// Every key removed
    Clear = 3,
}

impl AofOp {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AofOp::Upsert),
            2 => Some(AofOp::Delete),
            3 => Some(AofOp::Clear),
            _ => None,
        }
    }
}

/// One logged mutation
#[derive(Debug, Clone, PartialEq)]
pub struct AofRecord {
    /// Operation type
    pub op: AofOp,
    /// Milliseconds since the UNIX epoch
    pub timestamp: u64,
    /// Key, empty for `Clear`
    pub key: Bytes,
    /// Serialized entry for `Upsert`, empty otherwise
    pub payload: Bytes,
}

impl AofRecord {
    /// Record replacing `entry` as a whole
    pub fn upsert(entry: &Entry) -> Result<Self, BackendError> {
        Ok(AofRecord {
            op: AofOp::Upsert,
            timestamp: entry.updated_at,
            key: entry.key.clone(),
            payload: Bytes::from(serde_json::to_vec(entry)?),
        })
    }

    /// Record removing one key
    pub fn delete(key: &[u8], timestamp: u64) -> Self {
        AofRecord {
            op: AofOp::Delete,
            timestamp,
            key: Bytes::copy_from_slice(key),
            payload: Bytes::new(),
        }
    }

    /// Record removing everything
    pub fn clear(timestamp: u64) -> Self {
        AofRecord {
            op: AofOp::Clear,
            timestamp,
            key: Bytes::new(),
            payload: Bytes::new(),
        }
    }

    /// Decode the entry carried by an `Upsert`
    pub fn entry(&self) -> Result<Entry, BackendError> {
        if self.op != AofOp::Upsert {
            return Err(BackendError::Corrupt(format!("{:?} record carries no entry", self.op)));
        }
        Ok(serde_json::from_slice(&self.payload)?)
    }

    /// Serialize to bytes with checksum
    ///
    /// Fails when the key or payload is too long for its u32 length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BackendError> {
        let key_len = encode_len(self.key.len(), "key")?;
        let payload_len = encode_len(self.payload.len(), "payload")?;

        let mut buf = Vec::with_capacity(HEADER_LEN + self.key.len() + self.payload.len());

        buf.push(self.op as u8);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());

        buf.extend_from_slice(&key_len);
        buf.extend_from_slice(&self.key);

        buf.extend_from_slice(&payload_len);
        buf.extend_from_slice(&self.payload);

        let checksum = xxhash_rust::xxh64::xxh64(&buf, 0);
        buf.extend_from_slice(&checksum.to_le_bytes());

        Ok(buf)
    }

    /// Deserialize one record from the front of `data`
    ///
    /// Returns the record and the number of bytes it used.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), BackendError> {
        if data.len() < HEADER_LEN {
            return Err(corrupt("truncated header"));
        }

        let mut pos = 0;

        let op = AofOp::from_u8(data[pos])
            .ok_or_else(|| corrupt(format!("unknown operation {}", data[pos])))?;
        pos += 1;

        let timestamp = read_u64(data, &mut pos)?;

        let key_len = read_u32(data, &mut pos)? as usize;
        let key = read_slice(data, &mut pos, key_len, "key")?;

        let payload_len = read_u32(data, &mut pos)? as usize;
        let payload = read_slice(data, &mut pos, payload_len, "payload")?;

        let body_len = pos;
        let stored = read_u64(data, &mut pos)?;
        let calculated = xxhash_rust::xxh64::xxh64(&data[..body_len], 0);
        if stored != calculated {
            return Err(corrupt(format!(
                "checksum mismatch: expected {}, got {}",
                stored, calculated
            )));
        }

        Ok((
            AofRecord {
                op,
                timestamp,
                key: Bytes::copy_from_slice(key),
                payload: Bytes::copy_from_slice(payload),
            },
            pos,
        ))
    }
}

fn corrupt(msg: impl Into<String>) -> BackendError {
    BackendError::Corrupt(msg.into())
}

fn encode_len(len: usize, what: &str) -> Result<[u8; 4], BackendError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| BackendError::TooLarge { what: what.to_string(), len })
}

fn read_slice<'a>(
    data: &'a [u8],
    pos: &mut usize,
    len: usize,
    what: &str,
) -> Result<&'a [u8], BackendError> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| corrupt(format!("invalid {} length", what)))?;
    let slice = &data[*pos..end];
    *pos = end;
    Ok(slice)
}

fn read_u32(data: &[u8], pos: &mut usize) -> Result<u32, BackendError> {
    let bytes = read_slice(data, pos, 4, "length")?;
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(raw))
}

fn read_u64(data: &[u8], pos: &mut usize) -> Result<u64, BackendError> {
    let bytes = read_slice(data, pos, 8, "u64")?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_upsert_carries_entry() {
        let mut entry = Entry::new("mykey", Value::string("myvalue"), 42);
        entry.expires_at = Some(5_000);

        let bytes = AofRecord::upsert(&entry).unwrap().to_bytes().unwrap();
        let (decoded, size) = AofRecord::from_bytes(&bytes).unwrap();

        assert_eq!(size, bytes.len());
        assert_eq!(decoded.op, AofOp::Upsert);
        assert_eq!(decoded.timestamp, 42);
        assert_eq!(decoded.key, Bytes::from("mykey"));
        assert_eq!(decoded.entry().unwrap(), entry);
    }

    #[test]
    fn test_consecutive_records() {
        let mut buf = AofRecord::delete(b"gone", 7).to_bytes().unwrap();
        buf.extend_from_slice(&AofRecord::clear(8).to_bytes().unwrap());

        let (first, used) = AofRecord::from_bytes(&buf).unwrap();
        assert_eq!(first.op, AofOp::Delete);
        assert_eq!(first.key, Bytes::from("gone"));
        assert!(first.entry().is_err());

        let (second, rest) = AofRecord::from_bytes(&buf[used..]).unwrap();
        assert_eq!(second.op, AofOp::Clear);
        assert_eq!(used + rest, buf.len());
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = AofRecord::delete(b"key", 1).to_bytes().unwrap();

        let len = bytes.len();
        bytes[len - 1] ^= 0xFF;

        let err = AofRecord::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_length_fields_reject_oversized_parts() {
        assert_eq!(encode_len(3, "key").unwrap(), [3, 0, 0, 0]);
        assert_eq!(encode_len(u32::MAX as usize, "key").unwrap(), [0xFF; 4]);

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            encode_len(u32::MAX as usize + 1, "payload"),
            Err(BackendError::TooLarge { len, .. }) if len == u32::MAX as usize + 1
        ));
    }

    #[test]
    fn test_truncated_and_unknown_records() {
        let bytes = AofRecord::delete(b"key", 1).to_bytes().unwrap();
        assert!(matches!(
            AofRecord::from_bytes(&bytes[..bytes.len() - 3]),
            Err(BackendError::Corrupt(_))
        ));

        let mut bogus = bytes.clone();
        bogus[0] = 99;
        assert!(matches!(AofRecord::from_bytes(&bogus), Err(BackendError::Corrupt(_))));
    }
}
