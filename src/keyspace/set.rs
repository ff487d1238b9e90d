//! Set commands

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::{KeyType, Scalar, Value};
use crate::types::set as algebra;
use std::collections::HashSet;

impl Keyspace {
    /// Add members, returns how many were new
    pub fn sadd<V: Into<Scalar>>(&self, key: &[u8], members: impl IntoIterator<Item = V>) -> Result<usize> {
        let members: Vec<Scalar> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(KvError::wrong_arity("sadd"));
        }

        let added = self.update_as(key, KeyType::Set, true, Value::as_set_mut, |s| {
            let added = members.into_iter().filter(|m| s.insert(m.clone())).count();
            Ok((added, added > 0))
        })?;
        Ok(added.unwrap_or(0))
    }

    /// Remove members, returns how many were present
    pub fn srem<V: Into<Scalar>>(&self, key: &[u8], members: impl IntoIterator<Item = V>) -> Result<usize> {
        let members: Vec<Scalar> = members.into_iter().map(Into::into).collect();
        let removed = self.update_as(key, KeyType::Set, false, Value::as_set_mut, |s| {
            let removed = members.iter().filter(|m| s.remove(*m)).count();
            Ok((removed, removed > 0))
        })?;
        Ok(removed.unwrap_or(0))
    }

    /// All members, sorted by byte order
    pub fn smembers(&self, key: &[u8]) -> Result<Vec<Scalar>> {
        Ok(self
            .read_as(key, KeyType::Set, Value::as_set, |s| algebra::sorted(s.clone()))?
            .unwrap_or_default())
    }

    /// Membership test
    pub fn sismember(&self, key: &[u8], member: impl Into<Scalar>) -> Result<bool> {
        let member = member.into();
        Ok(self
            .read_as(key, KeyType::Set, Value::as_set, |s| s.contains(&member))?
            .unwrap_or(false))
    }

    /// Number of members, 0 when absent
    pub fn scard(&self, key: &[u8]) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::Set, Value::as_set, |s| s.len())?
            .unwrap_or(0))
    }

    /// Members present in every set; any absent key makes the result empty
    pub fn sinter<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<Vec<Scalar>> {
        let sets = self.load_sets(keys, "sinter")?;
        if sets.iter().any(Option::is_none) {
            return Ok(Vec::new());
        }
        let sets: Vec<&HashSet<Scalar>> = sets.iter().flatten().collect();
        Ok(algebra::sorted(algebra::intersect(&sets)))
    }

    /// Members present in any set
    pub fn sunion<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<Vec<Scalar>> {
        let sets = self.load_sets(keys, "sunion")?;
        let sets: Vec<&HashSet<Scalar>> = sets.iter().flatten().collect();
        Ok(algebra::sorted(algebra::union(&sets)))
    }

    /// Members of the first set absent from all the others
    pub fn sdiff<K: AsRef<[u8]>>(&self, keys: impl IntoIterator<Item = K>) -> Result<Vec<Scalar>> {
        let mut sets = self.load_sets(keys, "sdiff")?.into_iter();
        let Some(first) = sets.next().flatten() else {
            return Ok(Vec::new());
        };
        let rest: Vec<HashSet<Scalar>> = sets.flatten().collect();
        let rest: Vec<&HashSet<Scalar>> = rest.iter().collect();
        Ok(algebra::sorted(algebra::difference(&first, &rest)))
    }

    /// Snapshot of every listed set, type-checking all of them first
    fn load_sets<K: AsRef<[u8]>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        command: &str,
    ) -> Result<Vec<Option<HashSet<Scalar>>>> {
        let sets = keys
            .into_iter()
            .map(|key| self.read_as(key.as_ref(), KeyType::Set, Value::as_set, HashSet::clone))
            .collect::<Result<Vec<_>>>()?;

        if sets.is_empty() {
            return Err(KvError::wrong_arity(command));
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::tests::keyspace;

    fn texts(items: Vec<Scalar>) -> Vec<String> {
        items.into_iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sadd_srem() {
        let (ks, _) = keyspace();
        assert_eq!(ks.sadd(b"s", ["a", "b", "a"]).unwrap(), 2);
        assert_eq!(ks.sadd(b"s", ["b", "c"]).unwrap(), 1);
        assert_eq!(ks.scard(b"s").unwrap(), 3);

        assert_eq!(ks.srem(b"s", ["a", "z"]).unwrap(), 1);
        assert_eq!(ks.srem(b"missing", ["a"]).unwrap(), 0);
        assert_eq!(texts(ks.smembers(b"s").unwrap()), vec!["b", "c"]);
    }

    #[test]
    fn test_sismember() {
        let (ks, _) = keyspace();
        ks.sadd(b"s", ["a"]).unwrap();
        assert!(ks.sismember(b"s", "a").unwrap());
        assert!(!ks.sismember(b"s", "b").unwrap());
        assert!(!ks.sismember(b"missing", "a").unwrap());
    }

    #[test]
    fn test_integer_and_text_members_coincide() {
        let (ks, _) = keyspace();
        ks.sadd(b"s", [Scalar::Integer(7)]).unwrap();
        assert_eq!(ks.sadd(b"s", ["7"]).unwrap(), 0);
        assert!(ks.sismember(b"s", "7").unwrap());
    }

    #[test]
    fn test_algebra() {
        let (ks, _) = keyspace();
        ks.sadd(b"s1", ["a", "b", "c"]).unwrap();
        ks.sadd(b"s2", ["b", "c", "d"]).unwrap();

        assert_eq!(texts(ks.sinter([b"s1", b"s2"]).unwrap()), vec!["b", "c"]);
        assert_eq!(texts(ks.sunion([b"s1", b"s2"]).unwrap()), vec!["a", "b", "c", "d"]);
        assert_eq!(texts(ks.sdiff([b"s1", b"s2"]).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_algebra_with_missing_keys() {
        let (ks, _) = keyspace();
        ks.sadd(b"s1", ["a", "b"]).unwrap();

        let keys: [&[u8]; 2] = [b"s1", b"nope"];
        assert!(ks.sinter(keys).unwrap().is_empty());
        assert_eq!(texts(ks.sunion(keys).unwrap()), vec!["a", "b"]);
        assert_eq!(texts(ks.sdiff(keys).unwrap()), vec!["a", "b"]);

        let keys: [&[u8]; 2] = [b"nope", b"s1"];
        assert!(ks.sdiff(keys).unwrap().is_empty());
    }

    #[test]
    fn test_algebra_checks_every_type() {
        let (ks, _) = keyspace();
        ks.sadd(b"s1", ["a"]).unwrap();
        ks.set(b"str", "v", None).unwrap();

        let keys: [&[u8]; 3] = [b"s1", b"nope", b"str"];
        assert!(matches!(ks.sinter(keys), Err(KvError::WrongType)));
        assert!(matches!(ks.sunion(keys), Err(KvError::WrongType)));
        assert!(matches!(ks.sdiff(keys), Err(KvError::WrongType)));
    }
}
