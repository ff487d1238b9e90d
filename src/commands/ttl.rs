//! TTL commands (EXPIRE, TTL, PTTL, PERSIST)

use super::{arg_integer, Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// EXPIRE command - Set a timeout on a key
///
/// Syntax: EXPIRE key seconds
pub struct ExpireCommand;

impl Command for ExpireCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let seconds = arg_integer(&args[1])?;
        Ok(Reply::flag(ks.expire(&args[0], seconds)?))
    }

    fn name(&self) -> &'static str {
        "EXPIRE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// TTL command - Get the time to live for a key
///
/// Syntax: TTL key
///
/// Returns:
/// - The TTL in seconds
/// - -1 if the key exists but has no expiration
/// - -2 if the key does not exist
pub struct TtlCommand;

impl Command for TtlCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::Integer(ks.ttl(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "TTL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// PTTL command - Like TTL in milliseconds
///
/// Syntax: PTTL key
pub struct PTtlCommand;

impl Command for PTtlCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::Integer(ks.pttl(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "PTTL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// PERSIST command - Remove the timeout of a key
///
/// Syntax: PERSIST key
pub struct PersistCommand;

impl Command for PersistCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::flag(ks.persist(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "PERSIST"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{args, keyspace};

    #[test]
    fn test_expire_ttl() {
        let ks = keyspace();
        ks.set(b"key1", "value1", None).unwrap();

        assert_eq!(TtlCommand.execute(&ks, &args(&["key1"])).unwrap(), Reply::Integer(-1));
        assert_eq!(ExpireCommand.execute(&ks, &args(&["key1", "100"])).unwrap(), Reply::Integer(1));
        assert_eq!(TtlCommand.execute(&ks, &args(&["key1"])).unwrap(), Reply::Integer(100));
        assert_eq!(PTtlCommand.execute(&ks, &args(&["key1"])).unwrap(), Reply::Integer(100_000));

        assert_eq!(PersistCommand.execute(&ks, &args(&["key1"])).unwrap(), Reply::Integer(1));
        assert_eq!(TtlCommand.execute(&ks, &args(&["key1"])).unwrap(), Reply::Integer(-1));
    }

    #[test]
    fn test_missing_key() {
        let ks = keyspace();
        assert_eq!(ExpireCommand.execute(&ks, &args(&["nope", "10"])).unwrap(), Reply::Integer(0));
        assert_eq!(TtlCommand.execute(&ks, &args(&["nope"])).unwrap(), Reply::Integer(-2));
        assert_eq!(PersistCommand.execute(&ks, &args(&["nope"])).unwrap(), Reply::Integer(0));
    }
}
