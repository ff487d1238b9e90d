//! Reply values
//!
//! The shape of what a command hands back, independent of any wire format.
//! `Display` renders the way redis-cli prints replies.

use crate::error::KvError;
use crate::store::Scalar;
use bytes::Bytes;
use std::fmt;

/// Command reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status line such as `OK`
    Status(String),

    /// Error message, already prefixed (`ERR ...`, `WRONGTYPE ...`)
    Error(String),

    /// Integer reply
    Integer(i64),

    /// Binary-safe string
    Bulk(Bytes),

    /// Absent value
    Nil,

    /// Ordered list of replies
    Array(Vec<Reply>),
}

impl Reply {
    /// The `OK` status
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Create an error reply
    pub fn error(msg: impl Into<String>) -> Self {
        Reply::Error(msg.into())
    }

    /// Create an integer reply from any count
    pub fn integer(n: impl TryInto<i64>) -> Self {
        Reply::Integer(n.try_into().unwrap_or(i64::MAX))
    }

    /// Create a bulk reply
    pub fn bulk(b: impl Into<Bytes>) -> Self {
        Reply::Bulk(b.into())
    }

    /// 1 for true, 0 for false
    pub fn flag(b: bool) -> Self {
        Reply::Integer(b as i64)
    }

    /// Bulk reply holding a scalar's text
    pub fn scalar(s: &Scalar) -> Self {
        Reply::Bulk(s.to_bytes())
    }

    /// Bulk or nil
    pub fn optional(s: Option<Scalar>) -> Self {
        s.map_or(Reply::Nil, |s| Reply::scalar(&s))
    }

    /// Bulk reply holding a formatted score
    pub fn score(score: f64) -> Self {
        Reply::Bulk(Bytes::from(format_score(score)))
    }

    /// Array of scalars
    pub fn scalars(items: impl IntoIterator<Item = Scalar>) -> Self {
        Reply::Array(items.into_iter().map(|s| Reply::scalar(&s)).collect())
    }

    /// Array of optional scalars, nil for each `None`
    pub fn optionals(items: impl IntoIterator<Item = Option<Scalar>>) -> Self {
        Reply::Array(items.into_iter().map(Reply::optional).collect())
    }

    /// Array of raw byte strings
    pub fn bulks(items: impl IntoIterator<Item = Bytes>) -> Self {
        Reply::Array(items.into_iter().map(Reply::Bulk).collect())
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl From<KvError> for Reply {
    fn from(err: KvError) -> Self {
        Reply::Error(err.to_string())
    }
}

/// Render a score the way Redis does: integral values without a decimal
/// point, infinities as `inf`/`-inf`
pub fn format_score(score: f64) -> String {
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if score.fract() == 0.0 && score.abs() < 1e17 {
        return format!("{}", score as i64);
    }
    format!("{}", score)
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl Reply {
    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(e) => write!(f, "(error) {}", e),
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::Bulk(b) => write!(f, "\"{}\"", b.escape_ascii()),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                let width = items.len().to_string().len();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        write!(f, "{:indent$}", "", indent = indent)?;
                    }
                    let label = format!("{:>width$})", i + 1, width = width);
                    write!(f, "{} ", label)?;
                    item.render(f, indent + label.len() + 1)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1.0), "1");
        assert_eq!(format_score(-3.0), "-3");
        assert_eq!(format_score(1.5), "1.5");
        assert_eq!(format_score(f64::INFINITY), "inf");
        assert_eq!(format_score(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_from_error() {
        let reply = Reply::from(KvError::WrongType);
        assert!(reply.is_error());
        assert_eq!(
            reply,
            Reply::error("WRONGTYPE Operation against a key holding the wrong kind of value")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Reply::ok().to_string(), "OK");
        assert_eq!(Reply::integer(3usize).to_string(), "(integer) 3");
        assert_eq!(Reply::bulk("hi").to_string(), "\"hi\"");
        assert_eq!(Reply::Nil.to_string(), "(nil)");
        assert_eq!(Reply::Array(vec![]).to_string(), "(empty array)");
        assert_eq!(
            Reply::bulks([Bytes::from("a"), Bytes::from("b")]).to_string(),
            "1) \"a\"\n2) \"b\""
        );
        assert_eq!(Reply::error("ERR boom").to_string(), "(error) ERR boom");
    }

    #[test]
    fn test_nested_display() {
        let reply = Reply::Array(vec![
            Reply::bulk("x"),
            Reply::Array(vec![Reply::integer(1), Reply::Nil]),
        ]);
        assert_eq!(reply.to_string(), "1) \"x\"\n2) 1) (integer) 1\n   2) (nil)");
    }
}
