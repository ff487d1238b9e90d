//! Sorted set commands (ZADD, ZREM, ZRANGE, ZREVRANGE, ZRANGEBYSCORE, ZSCORE,
//! ZCARD, ZRANK, ZREVRANK, ZINCRBY, ZCOUNT)

use super::{arg_integer, arg_pairs, arg_score, is_keyword, scored_reply, Command, Reply};
use crate::error::{KvError, Result};
use crate::keyspace::Keyspace;
use bytes::Bytes;

/// Optional trailing WITHSCORES flag at `args[3]`
fn with_scores(args: &[Bytes]) -> Result<bool> {
    match args.get(3) {
        None => Ok(false),
        Some(arg) if is_keyword(arg, "WITHSCORES") => Ok(true),
        Some(_) => Err(KvError::invalid("syntax error")),
    }
}

/// ZADD command - Add members with scores, or update their scores
///
/// Syntax: ZADD key score member [score member ...]
pub struct ZAddCommand;

impl Command for ZAddCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let pairs = arg_pairs(self.name(), &args[1..])?
            .into_iter()
            .map(|(score, member)| Ok((arg_score(score)?, member)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Reply::integer(ks.zadd(&args[0], pairs)?))
    }

    fn name(&self) -> &'static str {
        "ZADD"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZREM command - Remove members
///
/// Syntax: ZREM key member [member ...]
pub struct ZRemCommand;

impl Command for ZRemCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.zrem(&args[0], &args[1..])?))
    }

    fn name(&self) -> &'static str {
        "ZREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// ZRANGE command - Members by ascending rank
///
/// Syntax: ZRANGE key start stop [WITHSCORES]
pub struct ZRangeCommand;

impl Command for ZRangeCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let start = arg_integer(&args[1])?;
        let stop = arg_integer(&args[2])?;
        let scores = with_scores(args)?;
        Ok(scored_reply(ks.zrange(&args[0], start, stop, scores)?))
    }

    fn name(&self) -> &'static str {
        "ZRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// ZREVRANGE command - Members by descending rank
///
/// Syntax: ZREVRANGE key start stop [WITHSCORES]
pub struct ZRevRangeCommand;

impl Command for ZRevRangeCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let start = arg_integer(&args[1])?;
        let stop = arg_integer(&args[2])?;
        let scores = with_scores(args)?;
        Ok(scored_reply(ks.zrevrange(&args[0], start, stop, scores)?))
    }

    fn name(&self) -> &'static str {
        "ZREVRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// ZRANGEBYSCORE command - Members with a score in an inclusive range
///
/// Syntax: ZRANGEBYSCORE key min max [WITHSCORES]
pub struct ZRangeByScoreCommand;

impl Command for ZRangeByScoreCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let min = arg_score(&args[1])?;
        let max = arg_score(&args[2])?;
        let scores = with_scores(args)?;
        Ok(scored_reply(ks.zrangebyscore(&args[0], min, max, scores)?))
    }

    fn name(&self) -> &'static str {
        "ZRANGEBYSCORE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// ZSCORE command - Score of a member
///
/// Syntax: ZSCORE key member
pub struct ZScoreCommand;

impl Command for ZScoreCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(ks.zscore(&args[0], &args[1])?.map_or(Reply::Nil, Reply::score))
    }

    fn name(&self) -> &'static str {
        "ZSCORE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZCARD command - Number of members
///
/// Syntax: ZCARD key
pub struct ZCardCommand;

impl Command for ZCardCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(Reply::integer(ks.zcard(&args[0])?))
    }

    fn name(&self) -> &'static str {
        "ZCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// ZRANK command - Ascending rank of a member
///
/// Syntax: ZRANK key member
pub struct ZRankCommand;

impl Command for ZRankCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(ks.zrank(&args[0], &args[1])?.map_or(Reply::Nil, Reply::integer))
    }

    fn name(&self) -> &'static str {
        "ZRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZREVRANK command - Descending rank of a member
///
/// Syntax: ZREVRANK key member
pub struct ZRevRankCommand;

impl Command for ZRevRankCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        Ok(ks.zrevrank(&args[0], &args[1])?.map_or(Reply::Nil, Reply::integer))
    }

    fn name(&self) -> &'static str {
        "ZREVRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZINCRBY command - Increment the score of a member
///
/// Syntax: ZINCRBY key increment member
pub struct ZIncrByCommand;

impl Command for ZIncrByCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let delta = arg_score(&args[1])?;
        Ok(Reply::score(ks.zincrby(&args[0], delta, &args[2])?))
    }

    fn name(&self) -> &'static str {
        "ZINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZCOUNT command - Number of members with a score in an inclusive range
///
/// Syntax: ZCOUNT key min max
pub struct ZCountCommand;

impl Command for ZCountCommand {
    fn execute(&self, ks: &Keyspace, args: &[Bytes]) -> Result<Reply> {
        let min = arg_score(&args[1])?;
        let max = arg_score(&args[2])?;
        Ok(Reply::integer(ks.zcount(&args[0], min, max)?))
    }

    fn name(&self) -> &'static str {
        "ZCOUNT"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}
