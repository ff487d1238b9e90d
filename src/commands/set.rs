//! Set commands (SADD, SREM, SMEMBERS, SISMEMBER, SCARD, SINTER, SUNION, SDIFF)

use super::{Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// SADD command - Add one or more members to a set
///
/// Syntax: SADD key member [member ...]
pub struct SAddCommand;

impl Command for SAddCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.sadd(&args[0], args[1..].iter())?))
    }

    fn name(&self) -> &'static str {
        "SADD"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SREM command - Remove one or more members from a set
///
/// Syntax: SREM key member [member ...]
pub struct SRemCommand;

impl Command for SRemCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.srem(&args[0], args[1..].iter())?))
    }

    fn name(&self) -> &'static str {
        "SREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SMEMBERS command - Get all members of a set
///
/// Syntax: SMEMBERS key
pub struct SMembersCommand;

impl Command for SMembersCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::scalars(ks.smembers(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "SMEMBERS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SISMEMBER command - Check whether a value is a member of a set
///
/// Syntax: SISMEMBER key member
pub struct SIsMemberCommand;

impl Command for SIsMemberCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::flag(ks.sismember(&args[0], &args[1])?))
    }

    fn name(&self) -> &'static str {
        "SISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SCARD command - Get the number of members in a set
///
/// Syntax: SCARD key
pub struct SCardCommand;

impl Command for SCardCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.scard(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "SCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SINTER command - Intersect sets
///
/// Syntax: SINTER key [key ...]
pub struct SInterCommand;

impl Command for SInterCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::scalars(ks.sinter(args)?))
    }

    fn name(&self) -> &'static str {
        "SINTER"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// SUNION command - Union of sets
///
/// Syntax: SUNION key [key ...]
pub struct SUnionCommand;

impl Command for SUnionCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::scalars(ks.sunion(args)?))
    }

    fn name(&self) -> &'static str {
        "SUNION"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// SDIFF command - Members of the first set missing from the others
///
/// Syntax: SDIFF key [key ...]
pub struct SDiffCommand;

impl Command for SDiffCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::scalars(ks.sdiff(args)?))
    }

    fn name(&self) -> &'static str {
        "SDIFF"
    }

    fn min_args(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{args, keyspace};

    fn bulks(items: &[&str]) -> Reply {
        Reply::Array(items.iter().map(|s| Reply::bulk(s.to_string())).collect())
    }

    #[test]
    fn test_sadd_uniqueness() {
        let ks = keyspace();
        assert_eq!(SAddCommand.execute(&ks, &args(&["s", "x"])).unwrap(), Reply::integer(1));
        assert_eq!(SAddCommand.execute(&ks, &args(&["s", "x"])).unwrap(), Reply::integer(0));
        assert_eq!(SCardCommand.execute(&ks, &args(&["s"])).unwrap(), Reply::integer(1));
        assert_eq!(SIsMemberCommand.execute(&ks, &args(&["s", "x"])).unwrap(), Reply::integer(1));
    }

    #[test]
    fn test_algebra_replies() {
        let ks = keyspace();
        SAddCommand.execute(&ks, &args(&["s1", "c", "a", "b"])).unwrap();
        SAddCommand.execute(&ks, &args(&["s2", "b", "c", "d"])).unwrap();

        assert_eq!(SInterCommand.execute(&ks, &args(&["s1", "s2"])).unwrap(), bulks(&["b", "c"]));
        assert_eq!(SUnionCommand.execute(&ks, &args(&["s1", "s2"])).unwrap(), bulks(&["a", "b", "c", "d"]));
        assert_eq!(SDiffCommand.execute(&ks, &args(&["s1", "s2"])).unwrap(), bulks(&["a"]));
        assert_eq!(SMembersCommand.execute(&ks, &args(&["s1"])).unwrap(), bulks(&["a", "b", "c"]));
    }

    #[test]
    fn test_srem_last_member() {
        let ks = keyspace();
        SAddCommand.execute(&ks, &args(&["s", "only"])).unwrap();
        assert_eq!(SRemCommand.execute(&ks, &args(&["s", "only", "ghost"])).unwrap(), Reply::integer(1));
        assert_eq!(SMembersCommand.execute(&ks, &args(&["s"])).unwrap(), Reply::Array(vec![]));
        assert_eq!(ks.exists([b"s"]).unwrap(), 0);
    }
}
