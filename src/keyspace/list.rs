//! List commands

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::{KeyType, Scalar, Value};
use crate::types::list::{self, End};

impl Keyspace {
    /// Push values on the head, returns the new length
    pub fn lpush<V: Into<Scalar>>(&self, key: &[u8], values: impl IntoIterator<Item = V>) -> Result<usize> {
        self.push(key, End::Left, values, "lpush")
    }

    /// Push values on the tail, returns the new length
    pub fn rpush<V: Into<Scalar>>(&self, key: &[u8], values: impl IntoIterator<Item = V>) -> Result<usize> {
        self.push(key, End::Right, values, "rpush")
    }

    /// Pop up to `count` values from the head
    pub fn lpop(&self, key: &[u8], count: usize) -> Result<Vec<Scalar>> {
        self.pop(key, End::Left, count)
    }

    /// Pop up to `count` values from the tail
    pub fn rpop(&self, key: &[u8], count: usize) -> Result<Vec<Scalar>> {
        self.pop(key, End::Right, count)
    }

    /// Length of the list, 0 when absent
    pub fn llen(&self, key: &[u8]) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::List, Value::as_list, |l| l.len())?
            .unwrap_or(0))
    }

    /// Elements between two inclusive, possibly negative positions
    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Scalar>> {
        Ok(self
            .read_as(key, KeyType::List, Value::as_list, |l| list::range(l, start, stop))?
            .unwrap_or_default())
    }

    /// Element at a position, `None` when absent or out of range
    pub fn lindex(&self, key: &[u8], index: i64) -> Result<Option<Scalar>> {
        Ok(self
            .read_as(key, KeyType::List, Value::as_list, |l| list::index(l, index).cloned())?
            .flatten())
    }

    /// Overwrite the element at a position
    pub fn lset(&self, key: &[u8], index: i64, value: impl Into<Scalar>) -> Result<()> {
        let value = value.into();
        self.update_as(key, KeyType::List, false, Value::as_list_mut, |l| {
            list::set_at(l, index, value).map(|()| ((), true))
        })?
        .ok_or(KvError::NoSuchKey)
    }

    /// Keep only the elements between two positions
    pub fn ltrim(&self, key: &[u8], start: i64, stop: i64) -> Result<()> {
        self.update_as(key, KeyType::List, false, Value::as_list_mut, |l| {
            let before = l.len();
            list::trim(l, start, stop);
            Ok(((), l.len() != before))
        })?;
        Ok(())
    }

    /// Remove elements equal to `value`, returns how many went
    ///
    /// A positive `count` scans from the head, a negative one from the
    /// tail, and 0 removes every match.
    pub fn lrem(&self, key: &[u8], count: i64, value: impl Into<Scalar>) -> Result<usize> {
        let value = value.into();
        Ok(self
            .update_as(key, KeyType::List, false, Value::as_list_mut, |l| {
                let removed = list::remove(l, count, &value);
                Ok((removed, removed > 0))
            })?
            .unwrap_or(0))
    }

    fn push<V: Into<Scalar>>(
        &self,
        key: &[u8],
        end: End,
        values: impl IntoIterator<Item = V>,
        command: &str,
    ) -> Result<usize> {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(KvError::wrong_arity(command));
        }

        let len = self.update_as(key, KeyType::List, true, Value::as_list_mut, |l| {
            list::push(l, end, values);
            Ok((l.len(), true))
        })?;
        Ok(len.unwrap_or(0))
    }

    fn pop(&self, key: &[u8], end: End, count: usize) -> Result<Vec<Scalar>> {
        Ok(self
            .update_as(key, KeyType::List, false, Value::as_list_mut, |l| {
                let popped = list::pop(l, end, count);
                let changed = !popped.is_empty();
                Ok((popped, changed))
            })?
            .unwrap_or_default())
    }
}
