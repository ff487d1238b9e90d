//! Error types shared by the keyspace, the backends and the command layer

use thiserror::Error;

/// Errors raised by a command
///
/// Every error aborts the command before anything is written back, so a
/// caller never observes a partial mutation.
#[derive(Debug, Error)]
pub enum KvError {
    /// The live entry holds a different type than the command needs
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// The command requires the key to exist
    #[error("ERR no such key")]
    NoSuchKey,

    /// A position is outside the collection after negative-index normalization
    #[error("ERR index out of range")]
    IndexOutOfRange,

    /// Malformed arguments (odd pair lists, negative offsets, bad expire times...)
    #[error("ERR {0}")]
    InvalidArgument(String),

    /// A stored value or an argument could not be parsed as an i64
    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    /// A score could not be parsed as a float, or the result is NaN
    #[error("ERR value is not a valid float")]
    NotFloat,

    /// An integer counter left the i64 range
    #[error("ERR increment or decrement would overflow")]
    Overflow,

    /// The backing store failed
    #[error("ERR backend failure: {0}")]
    Backend(#[from] BackendError),
}

impl KvError {
    /// Shorthand for `InvalidArgument`
    pub fn invalid(msg: impl Into<String>) -> Self {
        KvError::InvalidArgument(msg.into())
    }

    /// Argument-count error in the Redis wording
    pub fn wrong_arity(command: &str) -> Self {
        KvError::InvalidArgument(format!(
            "wrong number of arguments for '{}' command",
            command.to_lowercase()
        ))
    }
}

/// Errors raised by a backing store adapter
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filesystem failure in a durable backend
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A persisted record failed validation
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// A record part does not fit its u32 length field
    #[error("{what} of {len} bytes is too large for a log record")]
    TooLarge { what: String, len: usize },
}

/// Result alias used by every command
pub type Result<T, E = KvError> = std::result::Result<T, E>;
