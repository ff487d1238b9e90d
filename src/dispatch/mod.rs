//! Command dispatcher
//!
//! Routes an argv (`[name, args...]`) to the matching command, checks its
//! arity and turns any error into an error reply.

use crate::commands::{CommandRegistry, Reply};
use crate::error::KvError;
use crate::keyspace::Keyspace;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

/// Command dispatcher
pub struct Dispatcher {
    /// Command registry
    registry: CommandRegistry,

    /// Keyspace every command runs against
    keyspace: Arc<Keyspace>,
}

impl Dispatcher {
    /// Create a dispatcher over an existing keyspace
    pub fn new(keyspace: Arc<Keyspace>) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            keyspace,
        }
    }

    /// Create a dispatcher over a fresh in-memory keyspace
    pub fn in_memory() -> Self {
        Self::new(Arc::new(Keyspace::in_memory()))
    }

    /// Dispatch a command
    ///
    /// The first element is the command name, the rest its arguments.
    pub fn dispatch(&self, argv: &[Bytes]) -> Reply {
        let Some((name, args)) = argv.split_first() else {
            return Reply::error("ERR empty command");
        };

        let cmd_name = match std::str::from_utf8(name) {
            Ok(s) => s,
            Err(_) => return Reply::error("ERR invalid command name encoding"),
        };

        debug!("Dispatching command: {}", cmd_name);

        // Look up the command
        let command = match self.registry.get(cmd_name) {
            Some(cmd) => cmd,
            None => {
                warn!("Unknown command: {}", cmd_name);
                return Reply::error(format!("ERR unknown command '{}'", cmd_name));
            }
        };

        // Validate argument count
        let too_few = args.len() < command.min_args();
        let too_many = command.max_args().is_some_and(|max| args.len() > max);
        if too_few || too_many {
            return KvError::wrong_arity(command.name()).into();
        }

        match command.execute(&self.keyspace, args) {
            Ok(reply) => reply,
            Err(err) => {
                if let KvError::Backend(ref cause) = err {
                    warn!("{} failed in the backend: {}", command.name(), cause);
                } else {
                    debug!("{} rejected: {}", command.name(), err);
                }
                err.into()
            }
        }
    }

    /// The keyspace commands run against
    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }

    /// The registered commands
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ManualClock, MemoryBackend};

    fn argv(items: &[&str]) -> Vec<Bytes> {
        items.iter().map(|s| Bytes::copy_from_slice(s.as_bytes())).collect()
    }

    fn dispatcher() -> (Dispatcher, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let ks = Keyspace::new(Arc::new(MemoryBackend::new()), clock.clone());
        (Dispatcher::new(Arc::new(ks)), clock)
    }

    #[test]
    fn test_dispatch_set_get() {
        let (d, _) = dispatcher();

        assert_eq!(d.dispatch(&argv(&["SET", "mykey", "myvalue"])), Reply::ok());
        assert_eq!(d.dispatch(&argv(&["get", "mykey"])), Reply::bulk("myvalue"));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let (d, _) = dispatcher();
        assert_eq!(
            d.dispatch(&argv(&["UNKNOWN"])),
            Reply::error("ERR unknown command 'UNKNOWN'")
        );
        assert!(d.dispatch(&[]).is_error());
    }

    #[test]
    fn test_dispatch_invalid_args() {
        let (d, _) = dispatcher();

        assert_eq!(
            d.dispatch(&argv(&["GET"])),
            Reply::error("ERR wrong number of arguments for 'get' command")
        );
        assert!(d.dispatch(&argv(&["GET", "a", "b"])).is_error());
        assert!(d.dispatch(&argv(&["MSET", "a", "1", "b"])).is_error());
    }

    #[test]
    fn test_errors_become_replies() {
        let (d, _) = dispatcher();
        d.dispatch(&argv(&["SET", "s", "v"]));

        assert_eq!(
            d.dispatch(&argv(&["LPUSH", "s", "x"])),
            Reply::error("WRONGTYPE Operation against a key holding the wrong kind of value")
        );
        assert_eq!(
            d.dispatch(&argv(&["INCR", "s"])),
            Reply::error("ERR value is not an integer or out of range")
        );
    }

    #[test]
    fn test_lazy_expiry_through_commands() {
        let (d, clock) = dispatcher();
        d.dispatch(&argv(&["SET", "k", "v", "EX", "5"]));
        assert_eq!(d.dispatch(&argv(&["TTL", "k"])), Reply::Integer(5));

        clock.advance_secs(5);
        assert_eq!(d.dispatch(&argv(&["GET", "k"])), Reply::Nil);
        assert_eq!(d.dispatch(&argv(&["TTL", "k"])), Reply::Integer(-2));
        assert_eq!(d.dispatch(&argv(&["EXISTS", "k"])), Reply::Integer(0));
    }
}
