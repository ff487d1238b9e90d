//! Search commands (KEYS)

use super::{Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// KEYS command - Find all keys matching a pattern
///
/// Syntax: KEYS pattern
///
/// Supported patterns:
/// - `*` : any run of bytes, including none
/// - `?` : exactly one byte
/// - `[abc]`, `[a-z]`, `[^a]` : one byte from (or outside) a class
/// - `\x` : the byte `x` literally
pub struct KeysCommand;

impl Command for KeysCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::bulks(ks.keys(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "KEYS"
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
    fn test_keys_pattern() {
        let ks = keyspace();
        ks.set(b"user:1", "alice", None).unwrap();
        ks.set(b"user:2", "bob", None).unwrap();
        ks.set(b"session:1", "xyz", None).unwrap();

        assert_eq!(
            KeysCommand.execute(&ks, &args(&["user:*"])).unwrap(),
            Reply::Array(vec![Reply::bulk("user:1"), Reply::bulk("user:2")])
        );
        assert_eq!(
            KeysCommand.execute(&ks, &args(&["*:[1]"])).unwrap(),
            Reply::Array(vec![Reply::bulk("session:1"), Reply::bulk("user:1")])
        );
        assert_eq!(KeysCommand.execute(&ks, &args(&["nope*"])).unwrap(), Reply::Array(vec![]));
    }
}
