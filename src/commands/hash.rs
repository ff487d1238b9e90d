//! Hash commands (HSET, HGET, HMGET, HGETALL, HDEL, HEXISTS, HLEN, HKEYS, HVALS, HINCRBY)

use super::{arg_integer, arg_pairs, Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// HSET command - Set the value of one or more fields in a hash
///
/// Syntax: HSET key field value [field value ...]
///
/// Returns the number of fields that were added.
pub struct HSetCommand;

impl Command for HSetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let pairs = arg_pairs(self.name(), &args[1..])?;
        let added = ks.hset(&args[0], pairs.into_iter().map(|(f, v)| (f, v.clone())))?;
        Ok(Reply::integer(added))
    }

    fn name(&self) -> &'static str {
        "HSET"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// HGET command - Get the value of a field in a hash
///
/// Syntax: HGET key field
pub struct HGetCommand;

impl Command for HGetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::optional(ks.hget(&args[0], &args[1])?))
    }

    fn name(&self) -> &'static str {
        "HGET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HMGET command - Get the values of several fields
///
/// Syntax: HMGET key field [field ...]
pub struct HMGetCommand;

impl Command for HMGetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::optionals(ks.hmget(&args[0], &args[1..])?))
    }

    fn name(&self) -> &'static str {
        "HMGET"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HGETALL command - Get all fields and values in a hash
///
/// Syntax: HGETALL key
pub struct HGetAllCommand;

impl Command for HGetAllCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let mut items = Vec::new();
        for (field, value) in ks.hgetall(&args[0])? {
            items.push(Reply::Bulk(field));
            items.push(Reply::scalar(&value));
        }
        Ok(Reply::Array(items))
    }

    fn name(&self) -> &'static str {
        "HGETALL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HDEL command - Delete one or more fields from a hash
///
/// Syntax: HDEL key field [field ...]
pub struct HDelCommand;

impl Command for HDelCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.hdel(&args[0], &args[1..])?))
    }

    fn name(&self) -> &'static str {
        "HDEL"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HEXISTS command - Check whether a field exists
///
/// Syntax: HEXISTS key field
pub struct HExistsCommand;

impl Command for HExistsCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::flag(ks.hexists(&args[0], &args[1])?))
    }

    fn name(&self) -> &'static str {
        "HEXISTS"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HLEN command - Number of fields in a hash
///
/// Syntax: HLEN key
pub struct HLenCommand;

impl Command for HLenCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.hlen(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "HLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HKEYS command - Get all field names in a hash
///
/// Syntax: HKEYS key
pub struct HKeysCommand;

impl Command for HKeysCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::bulks(ks.hkeys(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "HKEYS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HVALS command - Get all values in a hash
///
/// Syntax: HVALS key
pub struct HValsCommand;

impl Command for HValsCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::scalars(ks.hvals(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "HVALS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HINCRBY command - Increment the integer value of a hash field
///
/// Syntax: HINCRBY key field increment
pub struct HIncrByCommand;

impl Command for HIncrByCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let delta = arg_integer(&args[2])?;
        Ok(Reply::Integer(ks.hincrby(&args[0], &args[1], delta)?))
    }

    fn name(&self) -> &'static str {
        "HINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{args, keyspace};
    use crate::error::KvError;

    #[test]
    fn test_hset_hget() {
        let ks = keyspace();
        assert_eq!(
            HSetCommand.execute(&ks, &args(&["user:1", "name", "Alice", "age", "30"])).unwrap(),
            Reply::integer(2)
        );
        assert_eq!(HGetCommand.execute(&ks, &args(&["user:1", "name"])).unwrap(), Reply::bulk("Alice"));
        assert_eq!(HGetCommand.execute(&ks, &args(&["user:1", "city"])).unwrap(), Reply::Nil);
    }

    #[test]
    fn test_hset_odd_pairs() {
        let ks = keyspace();
        let err = HSetCommand.execute(&ks, &args(&["h", "f1", "v1", "f2"])).unwrap_err();
        assert!(matches!(err, KvError::InvalidArgument(_)));
        assert_eq!(ks.exists([b"h"]).unwrap(), 0);
    }

    #[test]
    fn test_hgetall_flattens_sorted() {
        let ks = keyspace();
        HSetCommand.execute(&ks, &args(&["h", "b", "2", "a", "1"])).unwrap();

        assert_eq!(
            HGetAllCommand.execute(&ks, &args(&["h"])).unwrap(),
            Reply::Array(vec![Reply::bulk("a"), Reply::bulk("1"), Reply::bulk("b"), Reply::bulk("2")])
        );
        assert_eq!(
            HKeysCommand.execute(&ks, &args(&["h"])).unwrap(),
            Reply::Array(vec![Reply::bulk("a"), Reply::bulk("b")])
        );
        assert_eq!(
            HMGetCommand.execute(&ks, &args(&["h", "a", "zz"])).unwrap(),
            Reply::Array(vec![Reply::bulk("1"), Reply::Nil])
        );
    }

    #[test]
    fn test_hdel_hincrby() {
        let ks = keyspace();
        assert_eq!(HIncrByCommand.execute(&ks, &args(&["h", "n", "5"])).unwrap(), Reply::Integer(5));
        assert_eq!(HExistsCommand.execute(&ks, &args(&["h", "n"])).unwrap(), Reply::integer(1));
        assert_eq!(HDelCommand.execute(&ks, &args(&["h", "n"])).unwrap(), Reply::integer(1));
        assert_eq!(HLenCommand.execute(&ks, &args(&["h"])).unwrap(), Reply::integer(0));
    }
}
