//! List commands (LPUSH, RPUSH, LPOP, RPOP, LLEN, LRANGE, LINDEX, LSET, LTRIM, LREM)

use super::{arg_count, arg_integer, Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use crate::store::Scalar;
use bytes::Bytes;

/// LPUSH command - Prepend one or multiple values to a list
///
/// Syntax: LPUSH key value [value ...]
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.lpush(&args[0], args[1..].iter())?))
    }

    fn name(&self) -> &'static str {
        "LPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// RPUSH command - Append one or multiple values to a list
///
/// Syntax: RPUSH key value [value ...]
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.rpush(&args[0], args[1..].iter())?))
    }

    fn name(&self) -> &'static str {
        "RPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// Shape a pop result: one bulk without a count, an array with one
fn pop_reply(popped: Vec<Scalar>, count: Option<usize>) -> Reply {
    match count {
        None => Reply::optional(popped.into_iter().next()),
        Some(n) if n > 0 && popped.is_empty() => Reply::Nil,
        Some(_) => Reply::scalars(popped),
    }
}

/// LPOP command - Remove and return the first elements of a list
///
/// Syntax: LPOP key [count]
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let count = args.get(1).map(arg_count).transpose()?;
        let popped = ks.lpop(&args[0], count.unwrap_or(1))?;
        Ok(pop_reply(popped, count))
    }

    fn name(&self) -> &'static str {
        "LPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// RPOP command - Remove and return the last elements of a list
///
/// Syntax: RPOP key [count]
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let count = args.get(1).map(arg_count).transpose()?;
        let popped = ks.rpop(&args[0], count.unwrap_or(1))?;
        Ok(pop_reply(popped, count))
    }

    fn name(&self) -> &'static str {
        "RPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LLEN command - Get the length of a list
///
/// Syntax: LLEN key
pub struct LLenCommand;

impl Command for LLenCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.llen(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "LLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LRANGE command - Get a range of elements from a list
///
/// Syntax: LRANGE key start stop
pub struct LRangeCommand;

impl Command for LRangeCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let start = arg_integer(&args[1])?;
        let stop = arg_integer(&args[2])?;
        Ok(Reply::scalars(ks.lrange(&args[0], start, stop)?))
    }

    fn name(&self) -> &'static str {
        "LRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LINDEX command - Get an element by its position
///
/// Syntax: LINDEX key index
pub struct LIndexCommand;

impl Command for LIndexCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let index = arg_integer(&args[1])?;
        Ok(Reply::optional(ks.lindex(&args[0], index)?))
    }

    fn name(&self) -> &'static str {
        "LINDEX"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LSET command - Set the element at a position
///
/// Syntax: LSET key index value
pub struct LSetCommand;

impl Command for LSetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let index = arg_integer(&args[1])?;
        ks.lset(&args[0], index, args[2].clone())?;
        Ok(Reply::ok())
    }

    fn name(&self) -> &'static str {
        "LSET"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LTRIM command - Trim a list to the given range
///
/// Syntax: LTRIM key start stop
pub struct LTrimCommand;

impl Command for LTrimCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let start = arg_integer(&args[1])?;
        let stop = arg_integer(&args[2])?;
        ks.ltrim(&args[0], start, stop)?;
        Ok(Reply::ok())
    }

    fn name(&self) -> &'static str {
        "LTRIM"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LREM command - Remove elements equal to a value
///
/// Syntax: LREM key count value
pub struct LRemCommand;

impl Command for LRemCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let count = arg_integer(&args[1])?;
        Ok(Reply::integer(ks.lrem(&args[0], count, args[2].clone())?))
    }

    fn name(&self) -> &'static str {
        "LREM"
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

    fn bulks(items: &[&str]) -> Reply {
        Reply::Array(items.iter().map(|s| Reply::bulk(s.to_string())).collect())
    }

    #[test]
    fn test_lpush_lrange() {
        let ks = keyspace();
        assert_eq!(LPushCommand.execute(&ks, &args(&["mylist", "a", "b", "c"])).unwrap(), Reply::integer(3));
        assert_eq!(
            LRangeCommand.execute(&ks, &args(&["mylist", "0", "-1"])).unwrap(),
            bulks(&["c", "b", "a"])
        );
        assert_eq!(LLenCommand.execute(&ks, &args(&["mylist"])).unwrap(), Reply::integer(3));
    }

    #[test]
    fn test_pop_shapes() {
        let ks = keyspace();
        RPushCommand.execute(&ks, &args(&["l", "a", "b", "c"])).unwrap();

        assert_eq!(LPopCommand.execute(&ks, &args(&["l"])).unwrap(), Reply::bulk("a"));
        assert_eq!(RPopCommand.execute(&ks, &args(&["l", "5"])).unwrap(), bulks(&["c", "b"]));
        assert_eq!(LPopCommand.execute(&ks, &args(&["l"])).unwrap(), Reply::Nil);
        assert_eq!(LPopCommand.execute(&ks, &args(&["l", "2"])).unwrap(), Reply::Nil);
        assert!(matches!(
            LPopCommand.execute(&ks, &args(&["l", "-1"])),
            Err(KvError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_positional() {
        let ks = keyspace();
        RPushCommand.execute(&ks, &args(&["l", "x", "y", "z"])).unwrap();

        assert_eq!(LIndexCommand.execute(&ks, &args(&["l", "-1"])).unwrap(), Reply::bulk("z"));
        assert_eq!(LSetCommand.execute(&ks, &args(&["l", "0", "w"])).unwrap(), Reply::ok());
        assert!(matches!(
            LSetCommand.execute(&ks, &args(&["l", "9", "w"])),
            Err(KvError::IndexOutOfRange)
        ));
        assert!(matches!(
            LSetCommand.execute(&ks, &args(&["missing", "0", "w"])),
            Err(KvError::NoSuchKey)
        ));

        LTrimCommand.execute(&ks, &args(&["l", "0", "1"])).unwrap();
        assert_eq!(LRangeCommand.execute(&ks, &args(&["l", "0", "-1"])).unwrap(), bulks(&["w", "y"]));
    }

    #[test]
    fn test_lrem() {
        let ks = keyspace();
        RPushCommand.execute(&ks, &args(&["l", "a", "b", "a"])).unwrap();
        assert_eq!(LRemCommand.execute(&ks, &args(&["l", "0", "a"])).unwrap(), Reply::integer(2));
        assert_eq!(LRangeCommand.execute(&ks, &args(&["l", "0", "-1"])).unwrap(), bulks(&["b"]));
    }

    #[test]
    fn test_wrong_type() {
        let ks = keyspace();
        ks.set(b"s", "v", None).unwrap();
        let err = LPushCommand.execute(&ks, &args(&["s", "x"])).unwrap_err();
        assert!(err.to_string().starts_with("WRONGTYPE"));
    }
}
