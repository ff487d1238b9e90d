//! String commands

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::{Entry, KeyType, Scalar, Value};
use crate::types::string as strings;
use bytes::Bytes;
use std::time::Duration;

impl Keyspace {
    /// Value of a string key
    pub fn get(&self, key: &[u8]) -> Result<Option<Scalar>> {
        self.read_as(key, KeyType::String, Value::as_scalar, Scalar::clone)
    }

    /// Store a string, replacing any value of any type
    ///
    /// The previous TTL is discarded; `ttl` sets a new one.
    pub fn set(&self, key: &[u8], value: impl Into<Scalar>, ttl: Option<Duration>) -> Result<()> {
        self.set_with(key, value, ttl, false).map(|_| ())
    }

    /// Store a string only if the key does not exist
    pub fn setnx(&self, key: &[u8], value: impl Into<Scalar>) -> Result<bool> {
        self.set_with(key, value, None, true)
    }

    /// SET with all of its options, applied under one key lock
    ///
    /// With `only_if_absent`, a live key is left untouched and `false` is
    /// returned. Otherwise the value and its expiry are written together.
    pub fn set_with(
        &self,
        key: &[u8],
        value: impl Into<Scalar>,
        ttl: Option<Duration>,
        only_if_absent: bool,
    ) -> Result<bool> {
        let now = self.now();
        let expires_at = match ttl {
            Some(ttl) if ttl.is_zero() => {
                return Err(KvError::invalid("invalid expire time in 'set' command"))
            }
            Some(ttl) => Some(
                u64::try_from(ttl.as_millis())
                    .ok()
                    .and_then(|ms| now.checked_add(ms))
                    .ok_or_else(|| KvError::invalid("invalid expire time in 'set' command"))?,
            ),
            None => None,
        };

        let _guard = self.locks.lock(key);
        let previous = self.load(key, now)?;
        if only_if_absent && previous.is_some() {
            return Ok(false);
        }

        let mut entry = Entry::new(Bytes::copy_from_slice(key), Value::Str(value.into()), now);
        entry.created_at = previous.map_or(now, |previous| previous.created_at);
        entry.expires_at = expires_at;
        self.commit(entry, now)?;
        Ok(true)
    }

    /// Values of several keys; keys that are absent or hold another type
    /// come back as `None`
    pub fn mget<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<Vec<Option<Scalar>>> {
        keys.into_iter()
            .map(|key| match self.get(key.as_ref()) {
                Err(KvError::WrongType) => Ok(None),
                other => other,
            })
            .collect()
    }

    /// Store several strings, each as a plain SET
    pub fn mset<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: Into<Scalar>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_none() {
            return Err(KvError::wrong_arity("mset"));
        }
        for (key, value) in pairs {
            self.set(key.as_ref(), value, None)?;
        }
        Ok(())
    }

    /// Increment the integer at `key` by one
    pub fn incr(&self, key: &[u8]) -> Result<i64> {
        self.incr_by(key, 1)
    }

    /// Decrement the integer at `key` by one
    pub fn decr(&self, key: &[u8]) -> Result<i64> {
        self.incr_by(key, -1)
    }

    /// Decrement the integer at `key` by `delta`
    pub fn decr_by(&self, key: &[u8], delta: i64) -> Result<i64> {
        let delta = delta.checked_neg().ok_or(KvError::Overflow)?;
        self.incr_by(key, delta)
    }

    /// Add `delta` to the integer at `key`, an absent key counting as 0
    pub fn incr_by(&self, key: &[u8], delta: i64) -> Result<i64> {
        self.modify_string(key, |current| {
            let next = strings::incr(current, delta)?;
            Ok((Scalar::Integer(next), next))
        })
    }

    /// Append to a string, returns the new length
    pub fn append(&self, key: &[u8], suffix: &[u8]) -> Result<usize> {
        self.modify_string(key, |current| {
            let mut text = current.map(|s| s.as_bytes().into_owned()).unwrap_or_default();
            text.extend_from_slice(suffix);
            let len = text.len();
            Ok((Scalar::from(text), len))
        })
    }

    /// Length of the string at `key`, 0 when absent
    pub fn strlen(&self, key: &[u8]) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::String, Value::as_scalar, Scalar::len)?
            .unwrap_or(0))
    }

    /// Substring with inclusive, possibly negative bounds
    pub fn getrange(&self, key: &[u8], start: i64, end: i64) -> Result<Bytes> {
        let range = self.read_as(key, KeyType::String, Value::as_scalar, |s| {
            Bytes::copy_from_slice(strings::get_range(&s.as_bytes(), start, end))
        })?;
        Ok(range.unwrap_or_default())
    }

    /// Overwrite part of a string starting at `offset`, returns the new length
    ///
    /// An empty `value` leaves the key untouched, and does not create it.
    pub fn setrange(&self, key: &[u8], offset: i64, value: &[u8]) -> Result<usize> {
        if offset < 0 {
            return Err(KvError::invalid("offset is out of range"));
        }
        if value.is_empty() {
            return self.strlen(key);
        }
        self.modify_string(key, |current| {
            let text = current.map(|s| s.as_bytes().into_owned()).unwrap_or_default();
            let spliced = strings::set_range(&text, offset, value)?;
            let len = spliced.len();
            Ok((Scalar::from(spliced), len))
        })
    }

    /// Read-modify-write of a string, keeping its TTL and creation time
    fn modify_string<T>(
        &self,
        key: &[u8],
        f: impl FnOnce(Option<&Scalar>) -> Result<(Scalar, T)>,
    ) -> Result<T> {
        let now = self.now();
        let _guard = self.locks.lock(key);

        let existing = self.load_typed(key, KeyType::String, now)?;
        let (next, out) = f(existing.as_ref().and_then(|e| e.value.as_scalar()))?;

        let entry = match existing {
            Some(mut entry) => {
                entry.value = Value::Str(next);
                entry
            }
            None => Entry::new(Bytes::copy_from_slice(key), Value::Str(next), now),
        };
        self.commit(entry, now)?;
        Ok(out)
    }
}
