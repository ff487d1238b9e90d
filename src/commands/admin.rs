//! Admin commands (PING, DBSIZE, FLUSHALL, SWEEP)

use super::{Command, Reply};
use crate::error::Result;
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// PING command - Liveness check
///
/// Syntax: PING [message]
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, _ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(match args.first() {
            Some(message) => Reply::Bulk(message.clone()),
            None => Reply::Status("PONG".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// DBSIZE command - Number of live keys
///
/// Syntax: DBSIZE
pub struct DbSizeCommand;

impl Command for DbSizeCommand {
    fn execute(&self, ks: &Keyspace, _args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.dbsize()?))
    }

    fn name(&self) -> &'static str {
        "DBSIZE"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// FLUSHALL command - Remove every key
///
/// Syntax: FLUSHALL
pub struct FlushAllCommand;

impl Command for FlushAllCommand {
    fn execute(&self, ks: &Keyspace, _args: &[Bytes]) -> Result<Reply> {
        ks.flushall()?;
        Ok(Reply::ok())
    }

    fn name(&self) -> &'static str {
        "FLUSHALL"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// SWEEP command - Delete every expired key now
///
/// Syntax: SWEEP
///
/// Returns the number of keys removed.
pub struct SweepCommand;

impl Command for SweepCommand {
    fn execute(&self, ks: &Keyspace, _args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.cleanup_expired()?))
    }

    fn name(&self) -> &'static str {
        "SWEEP"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{args, keyspace};
    use crate::store::{ManualClock, MemoryBackend};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_ping() {
        let ks = keyspace();
        assert_eq!(PingCommand.execute(&ks, &[]).unwrap(), Reply::Status("PONG".into()));
        assert_eq!(PingCommand.execute(&ks, &args(&["hi"])).unwrap(), Reply::bulk("hi"));
    }

    #[test]
    fn test_dbsize_flushall() {
        let ks = keyspace();
        ks.mset([("a", "1"), ("b", "2")]).unwrap();

        assert_eq!(DbSizeCommand.execute(&ks, &[]).unwrap(), Reply::integer(2));
        assert_eq!(FlushAllCommand.execute(&ks, &[]).unwrap(), Reply::ok());
        assert_eq!(DbSizeCommand.execute(&ks, &[]).unwrap(), Reply::integer(0));
    }

    #[test]
    fn test_sweep_counts_expired() {
        let clock = Arc::new(ManualClock::new(0));
        let ks = Keyspace::new(Arc::new(MemoryBackend::new()), clock.clone());
        ks.set(b"a", "1", Some(Duration::from_secs(1))).unwrap();
        ks.set(b"b", "2", None).unwrap();

        clock.advance_secs(2);
        assert_eq!(SweepCommand.execute(&ks, &[]).unwrap(), Reply::integer(1));
        assert_eq!(SweepCommand.execute(&ks, &[]).unwrap(), Reply::integer(0));
    }
}
