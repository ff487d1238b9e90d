//! Hash commands
//!
//! Replies that list fields come back sorted by field name.

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::{KeyType, Scalar, Value};
use crate::types::string as strings;
use bytes::Bytes;
use std::collections::HashMap;

impl Keyspace {
    /// Set fields, returns how many were new
    pub fn hset<F, V>(&self, key: &[u8], pairs: impl IntoIterator<Item = (F, V)>) -> Result<usize>
    where
        F: AsRef<[u8]>,
        V: Into<Scalar>,
    {
        let pairs: Vec<(Bytes, Scalar)> = pairs
            .into_iter()
            .map(|(f, v)| (Bytes::copy_from_slice(f.as_ref()), v.into()))
            .collect();
        if pairs.is_empty() {
            return Err(KvError::wrong_arity("hset"));
        }

        let added = self.update_as(key, KeyType::Hash, true, Value::as_hash_mut, |h| {
            let added = pairs
                .into_iter()
                .filter(|(field, value)| h.insert(field.clone(), value.clone()).is_none())
                .count();
            Ok((added, true))
        })?;
        Ok(added.unwrap_or(0))
    }

    /// Value of a field
    pub fn hget(&self, key: &[u8], field: impl AsRef<[u8]>) -> Result<Option<Scalar>> {
        let field = field.as_ref();
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| h.get(field).cloned())?
            .flatten())
    }

    /// Values of several fields, `None` for each missing one
    pub fn hmget<F: AsRef<[u8]>>(
        &self,
        key: &[u8],
        fields: impl IntoIterator<Item = F>,
    ) -> Result<Vec<Option<Scalar>>> {
        let fields: Vec<F> = fields.into_iter().collect();
        let values = self.read_as(key, KeyType::Hash, Value::as_hash, |h| {
            fields.iter().map(|f| h.get(f.as_ref()).cloned()).collect::<Vec<_>>()
        })?;
        Ok(values.unwrap_or_else(|| vec![None; fields.len()]))
    }

    /// Every field and value
    pub fn hgetall(&self, key: &[u8]) -> Result<Vec<(Bytes, Scalar)>> {
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| {
                sorted_fields(h)
                    .into_iter()
                    .map(|(f, v)| (f.clone(), v.clone()))
                    .collect()
            })?
            .unwrap_or_default())
    }

    /// Remove fields, returns how many were present
    pub fn hdel<F: AsRef<[u8]>>(&self, key: &[u8], fields: impl IntoIterator<Item = F>) -> Result<usize> {
        let fields: Vec<F> = fields.into_iter().collect();
        let removed = self.update_as(key, KeyType::Hash, false, Value::as_hash_mut, |h| {
            let removed = fields.iter().filter(|f| h.remove(f.as_ref()).is_some()).count();
            Ok((removed, removed > 0))
        })?;
        Ok(removed.unwrap_or(0))
    }

    /// Field existence test
    pub fn hexists(&self, key: &[u8], field: impl AsRef<[u8]>) -> Result<bool> {
        let field = field.as_ref();
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| h.contains_key(field))?
            .unwrap_or(false))
    }

    /// Number of fields, 0 when absent
    pub fn hlen(&self, key: &[u8]) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| h.len())?
            .unwrap_or(0))
    }

    /// Field names
    pub fn hkeys(&self, key: &[u8]) -> Result<Vec<Bytes>> {
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| {
                sorted_fields(h).into_iter().map(|(f, _)| f.clone()).collect()
            })?
            .unwrap_or_default())
    }

    /// Values, in field-name order
    pub fn hvals(&self, key: &[u8]) -> Result<Vec<Scalar>> {
        Ok(self
            .read_as(key, KeyType::Hash, Value::as_hash, |h| {
                sorted_fields(h).into_iter().map(|(_, v)| v.clone()).collect()
            })?
            .unwrap_or_default())
    }

    /// Add `delta` to an integer field, a missing field counting as 0
    pub fn hincrby(&self, key: &[u8], field: impl AsRef<[u8]>, delta: i64) -> Result<i64> {
        let field = Bytes::copy_from_slice(field.as_ref());
        let next = self.update_as(key, KeyType::Hash, true, Value::as_hash_mut, |h| {
            let next = strings::incr(h.get(&field), delta)?;
            h.insert(field, Scalar::Integer(next));
            Ok((next, true))
        })?;
        next.ok_or(KvError::NoSuchKey)
    }
}

fn sorted_fields(hash: &HashMap<Bytes, Scalar>) -> Vec<(&Bytes, &Scalar)> {
    let mut fields: Vec<_> = hash.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::tests::keyspace;

    #[test]
    fn test_hset_hget() {
        let (ks, _) = keyspace();
        assert_eq!(ks.hset(b"h", [("name", "alice"), ("age", "30")]).unwrap(), 2);
        assert_eq!(ks.hset(b"h", [("age", "31"), ("city", "paris")]).unwrap(), 1);

        assert_eq!(ks.hget(b"h", "age").unwrap().unwrap(), "31");
        assert_eq!(ks.hget(b"h", "missing").unwrap(), None);
        assert_eq!(ks.hget(b"nope", "age").unwrap(), None);
        assert_eq!(ks.hlen(b"h").unwrap(), 3);
    }

    #[test]
    fn test_hmget() {
        let (ks, _) = keyspace();
        ks.hset(b"h", [("a", "1"), ("b", "2")]).unwrap();

        let values = ks.hmget(b"h", ["a", "x", "b"]).unwrap();
        assert_eq!(values[0].as_ref().unwrap(), &"1");
        assert!(values[1].is_none());
        assert_eq!(values[2].as_ref().unwrap(), &"2");

        assert_eq!(ks.hmget(b"nope", ["a", "b"]).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_listing_is_sorted() {
        let (ks, _) = keyspace();
        ks.hset(b"h", [("b", "2"), ("c", "3"), ("a", "1")]).unwrap();

        let all = ks.hgetall(b"h").unwrap();
        let fields: Vec<String> = all
            .iter()
            .map(|(f, _)| String::from_utf8_lossy(f).into_owned())
            .collect();
        assert_eq!(fields, vec!["a", "b", "c"]);

        assert_eq!(ks.hkeys(b"h").unwrap(), vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")]);
        let vals: Vec<String> = ks.hvals(b"h").unwrap().iter().map(|v| v.to_string()).collect();
        assert_eq!(vals, vec!["1", "2", "3"]);
        assert!(ks.hgetall(b"nope").unwrap().is_empty());
    }

    #[test]
    fn test_hdel_hexists() {
        let (ks, _) = keyspace();
        ks.hset(b"h", [("a", "1"), ("b", "2")]).unwrap();

        assert!(ks.hexists(b"h", "a").unwrap());
        assert_eq!(ks.hdel(b"h", ["a", "zz"]).unwrap(), 1);
        assert!(!ks.hexists(b"h", "a").unwrap());

        assert_eq!(ks.hdel(b"h", ["b"]).unwrap(), 1);
        assert_eq!(ks.exists([b"h"]).unwrap(), 0);
        assert_eq!(ks.hdel(b"h", ["b"]).unwrap(), 0);
    }

    #[test]
    fn test_hincrby() {
        let (ks, _) = keyspace();
        assert_eq!(ks.hincrby(b"h", "n", 5).unwrap(), 5);
        assert_eq!(ks.hincrby(b"h", "n", -7).unwrap(), -2);

        ks.hset(b"h", [("s", "text")]).unwrap();
        assert!(matches!(ks.hincrby(b"h", "s", 1), Err(KvError::NotInteger)));

        ks.hset(b"h", [("big", i64::MAX)]).unwrap();
        assert!(matches!(ks.hincrby(b"h", "big", 1), Err(KvError::Overflow)));
    }
}
