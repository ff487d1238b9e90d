//! String commands (GET, SET, SETNX, MGET, MSET, APPEND, STRLEN, GETRANGE, SETRANGE)

use super::{arg_integer, arg_pairs, is_keyword, Command, Reply};
use crate::error::{KvError, Result};
use crate::keyspace::Keyspace;
use bytes::Bytes;
use std::time::Duration;

/// GET command - Get the value of a key
///
/// Syntax: GET key
pub struct GetCommand;

impl Command for GetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::optional(ks.get(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "GET"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SET command - Set the string value of a key
///
/// Syntax: SET key value [EX seconds | PX milliseconds] [NX]
pub struct SetCommand;

impl Command for SetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let (key, value) = (&args[0], &args[1]);
        let mut ttl = None;
        let mut only_if_absent = false;

        let mut options = args[2..].iter();
        while let Some(option) = options.next() {
            if is_keyword(option, "NX") {
                only_if_absent = true;
                continue;
            }
            let unit = if is_keyword(option, "EX") {
                1000
            } else if is_keyword(option, "PX") {
                1
            } else {
                return Err(KvError::invalid("syntax error"));
            };
            if ttl.is_some() {
                return Err(KvError::invalid("syntax error"));
            }
            let amount = arg_integer(options.next().ok_or_else(|| KvError::invalid("syntax error"))?)?;
            let millis = u64::try_from(amount)
                .ok()
                .and_then(|n| n.checked_mul(unit))
                .filter(|ms| *ms > 0)
                .ok_or_else(|| KvError::invalid("invalid expire time in 'set' command"))?;
            ttl = Some(Duration::from_millis(millis));
        }

        Ok(if ks.set_with(key, value.clone(), ttl, only_if_absent)? {
            Reply::ok()
        } else {
            Reply::Nil
        })
    }

    fn name(&self) -> &'static str {
        "SET"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SETNX command - Set a key only if it does not exist
///
/// Syntax: SETNX key value
pub struct SetNxCommand;

impl Command for SetNxCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::flag(ks.setnx(&args[0], args[1].clone())?))
    }

    fn name(&self) -> &'static str {
        "SETNX"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// MGET command - Get the values of several keys
///
/// Syntax: MGET key [key ...]
pub struct MGetCommand;

impl Command for MGetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::optionals(ks.mget(args)?))
    }

    fn name(&self) -> &'static str {
        "MGET"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// MSET command - Set several keys at once
///
/// Syntax: MSET key value [key value ...]
pub struct MSetCommand;

impl Command for MSetCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let pairs = arg_pairs(self.name(), args)?;
        ks.mset(pairs.into_iter().map(|(k, v)| (k, v.clone())))?;
        Ok(Reply::ok())
    }

    fn name(&self) -> &'static str {
        "MSET"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// APPEND command - Append a value to a string
///
/// Syntax: APPEND key value
pub struct AppendCommand;

impl Command for AppendCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.append(&args[0], &args[1])?))
    }

    fn name(&self) -> &'static str {
        "APPEND"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// STRLEN command - Length of a string
///
/// Syntax: STRLEN key
pub struct StrLenCommand;

impl Command for StrLenCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.strlen(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "STRLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// GETRANGE command - Substring of a string
///
/// Syntax: GETRANGE key start end
pub struct GetRangeCommand;

impl Command for GetRangeCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let start = arg_integer(&args[1])?;
        let end = arg_integer(&args[2])?;
        Ok(Reply::Bulk(ks.getrange(&args[0], start, end)?))
    }

    fn name(&self) -> &'static str {
        "GETRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// SETRANGE command - Overwrite part of a string
///
/// Syntax: SETRANGE key offset value
pub struct SetRangeCommand;

impl Command for SetRangeCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let offset = arg_integer(&args[1])?;
        Ok(Reply::integer(ks.setrange(&args[0], offset, &args[2])?))
    }

    fn name(&self) -> &'static str {
        "SETRANGE"
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

    #[test]
    fn test_set_get() {
        let ks = keyspace();
        assert_eq!(SetCommand.execute(&ks, &args(&["k", "v"])).unwrap(), Reply::ok());
        assert_eq!(GetCommand.execute(&ks, &args(&["k"])).unwrap(), Reply::bulk("v"));
        assert_eq!(GetCommand.execute(&ks, &args(&["nope"])).unwrap(), Reply::Nil);
    }

    #[test]
    fn test_set_options() {
        let ks = keyspace();
        SetCommand.execute(&ks, &args(&["k", "v", "EX", "10"])).unwrap();
        assert_eq!(ks.ttl(b"k").unwrap(), 10);

        SetCommand.execute(&ks, &args(&["p", "v", "px", "2500"])).unwrap();
        assert_eq!(ks.pttl(b"p").unwrap(), 2500);

        assert_eq!(SetCommand.execute(&ks, &args(&["k", "w", "NX"])).unwrap(), Reply::Nil);
        assert_eq!(ks.get(b"k").unwrap().unwrap(), "v");

        assert!(SetCommand.execute(&ks, &args(&["k", "v", "EX", "0"])).is_err());
        assert!(SetCommand.execute(&ks, &args(&["k", "v", "EX"])).is_err());
        assert!(SetCommand.execute(&ks, &args(&["k", "v", "BOGUS"])).is_err());
    }

    #[test]
    fn test_mset_mget() {
        let ks = keyspace();
        MSetCommand.execute(&ks, &args(&["a", "1", "b", "2"])).unwrap();
        ks.rpush(b"l", ["x"]).unwrap();

        let reply = MGetCommand.execute(&ks, &args(&["a", "l", "nope", "b"])).unwrap();
        assert_eq!(
            reply,
            Reply::Array(vec![Reply::bulk("1"), Reply::Nil, Reply::Nil, Reply::bulk("2")])
        );

        let err = MSetCommand.execute(&ks, &args(&["a", "1", "b"])).unwrap_err();
        assert_eq!(err.to_string(), "ERR wrong number of arguments for 'mset' command");
    }

    #[test]
    fn test_string_editing() {
        let ks = keyspace();
        assert_eq!(AppendCommand.execute(&ks, &args(&["k", "Hello World"])).unwrap(), Reply::integer(11));
        assert_eq!(
            GetRangeCommand.execute(&ks, &args(&["k", "-5", "-1"])).unwrap(),
            Reply::bulk("World")
        );
        assert_eq!(
            SetRangeCommand.execute(&ks, &args(&["k", "6", "Redis"])).unwrap(),
            Reply::integer(11)
        );
        assert_eq!(StrLenCommand.execute(&ks, &args(&["k"])).unwrap(), Reply::integer(11));
        assert!(matches!(
            GetRangeCommand.execute(&ks, &args(&["k", "x", "1"])),
            Err(KvError::NotInteger)
        ));
    }
}
