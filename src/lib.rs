//! FerrumKV - A typed, Redis-compatible key-value engine
//!
//! Five value types (string, list, set, hash, sorted set) with per-key
//! expiry, layered over a narrow backing-store interface:
//! - `store` holds the entry model and the `Backend` trait
//! - `keyspace` implements every command on top of a backend
//! - `commands` and `dispatch` expose them as argv commands with replies
//! - `aof` makes a backend durable

pub mod aof;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod keyspace;
pub mod pattern;
pub mod store;
pub mod types;

/// Re-export commonly used types
pub use commands::{Command, CommandRegistry, Reply};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{BackendError, KvError, Result};
pub use keyspace::Keyspace;
pub use store::{Backend, Entry, KeyType, MemoryBackend, Scalar, Value};
