//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Each command family lives in its own file; every command parses its
//! argv, calls one [`Keyspace`] method and shapes the result as a [`Reply`].

mod reply;
mod registry;

// Command implementations
mod admin;
mod counter;
mod hash;
mod key;
mod list;
mod search;
mod set;
mod string;
mod ttl;
mod zset;

pub use registry::CommandRegistry;
pub use reply::{format_score, Reply};

use crate::error::{KvError, Result};
use crate::keyspace::{Keyspace, ScoredMember};
use crate::store::parse_integer;
use bytes::Bytes;

/// Command execution trait
///
/// Arity is declared through `min_args`/`max_args` and checked by the
/// dispatcher before `execute` runs, so implementations index their
/// required arguments directly.
pub trait Command: Send + Sync {
    /// Execute the command
    ///
    /// Arguments:
    /// - ks: the keyspace to run against
    /// - args: command arguments (excluding the command name itself)
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply>;

    /// Get the command name (for lookup and logging)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }
}

/// Parse an i64 argument
pub(crate) fn arg_integer(arg: &Bytes) -> Result<i64> {
    parse_integer(arg)
}

/// Parse a non-negative count argument
pub(crate) fn arg_count(arg: &Bytes) -> Result<usize> {
    let n = arg_integer(arg)?;
    usize::try_from(n).map_err(|_| KvError::invalid("value is out of range, must be positive"))
}

/// Parse a score; accepts `inf`, `+inf` and `-inf`, rejects NaN
pub(crate) fn arg_score(arg: &Bytes) -> Result<f64> {
    let text = std::str::from_utf8(arg).map_err(|_| KvError::NotFloat)?;
    let score = match text.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        other => other.parse::<f64>().map_err(|_| KvError::NotFloat)?,
    };
    if score.is_nan() {
        return Err(KvError::NotFloat);
    }
    Ok(score)
}

/// Split `a b a b ...` into pairs; an odd count is an arity error
pub(crate) fn arg_pairs<'a>(command: &str, args: &'a [Bytes]) -> Result<Vec<(&'a Bytes, &'a Bytes)>> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(KvError::wrong_arity(command));
    }
    Ok(args.chunks_exact(2).map(|pair| (&pair[0], &pair[1])).collect())
}

/// True when `arg` is the given keyword, ignoring case
pub(crate) fn is_keyword(arg: &Bytes, keyword: &str) -> bool {
    arg.eq_ignore_ascii_case(keyword.as_bytes())
}

/// Flatten scored members into `member [score] ...`
pub(crate) fn scored_reply(members: Vec<ScoredMember>) -> Reply {
    let mut items = Vec::with_capacity(members.len() * 2);
    for (member, score) in members {
        items.push(Reply::Bulk(member));
        if let Some(score) = score {
            items.push(Reply::score(score));
        }
    }
    Reply::Array(items)
}
