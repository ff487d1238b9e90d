//! Value types for the key-value store

use crate::error::KvError;
use crate::types::sorted_set::SortedSet;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single string-typed value: raw text or an integer counter
///
/// Two scalars are equal when their textual forms are equal, so
/// `Integer(7)` and `Text("7")` are the same set member. Ordering follows
/// the same byte representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    /// Binary-safe text
    Text(Bytes),

    /// Integer produced by INCR-style commands
    Integer(i64),
}

impl Scalar {
    /// Create a text scalar
    pub fn text(bytes: impl Into<Bytes>) -> Self {
        Scalar::Text(bytes.into())
    }

    /// Textual form of the scalar
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Scalar::Text(b) => Cow::Borrowed(b.as_ref()),
            Scalar::Integer(i) => Cow::Owned(i.to_string().into_bytes()),
        }
    }

    /// Textual form as owned `Bytes`
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Scalar::Text(b) => b.clone(),
            Scalar::Integer(i) => Bytes::from(i.to_string()),
        }
    }

    /// Length of the textual form
    pub fn len(&self) -> usize {
        match self {
            Scalar::Text(b) => b.len(),
            Scalar::Integer(i) => i.to_string().len(),
        }
    }

    /// Check if the textual form is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interpret the scalar as an i64
    pub fn to_integer(&self) -> Result<i64, KvError> {
        match self {
            Scalar::Integer(i) => Ok(*i),
            Scalar::Text(b) => parse_integer(b),
        }
    }
}

/// Strict i64 parsing: no sign prefix other than `-`, no whitespace
pub fn parse_integer(bytes: &[u8]) -> Result<i64, KvError> {
    if bytes.first() == Some(&b'+') {
        return Err(KvError::NotInteger);
    }
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(KvError::NotInteger)
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => self.as_bytes() == other.as_bytes(),
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(&other.as_bytes())
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes().as_ref() == other.as_bytes()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Scalar::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<Bytes> for Scalar {
    fn from(b: Bytes) -> Self {
        Scalar::Text(b)
    }
}

impl From<&Bytes> for Scalar {
    fn from(b: &Bytes) -> Self {
        Scalar::Text(b.clone())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(Bytes::from(s))
    }
}

impl From<&[u8]> for Scalar {
    fn from(b: &[u8]) -> Self {
        Scalar::Text(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(b: Vec<u8>) -> Self {
        Scalar::Text(Bytes::from(b))
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

/// Type tag of a stored value, as reported by TYPE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    String,
    List,
    Set,
    Hash,
    SortedSet,
}

impl KeyType {
    /// Name used by the TYPE command
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::Hash => "hash",
            KeyType::SortedSet => "zset",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the different types of values that can be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// String value (text or integer)
    Str(Scalar),

    /// List of values (ordered)
    List(VecDeque<Scalar>),

    /// Set of unique values (unordered)
    Set(HashSet<Scalar>),

    /// Hash map (field -> value)
    #[serde(with = "field_pairs")]
    Hash(HashMap<Bytes, Scalar>),

    /// Members ordered by (score, member)
    SortedSet(SortedSet),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<Scalar>) -> Self {
        Value::Str(s.into())
    }

    /// Empty container of the given type; strings start as empty text
    pub fn empty(kind: KeyType) -> Self {
        match kind {
            KeyType::String => Value::Str(Scalar::Text(Bytes::new())),
            KeyType::List => Value::List(VecDeque::new()),
            KeyType::Set => Value::Set(HashSet::new()),
            KeyType::Hash => Value::Hash(HashMap::new()),
            KeyType::SortedSet => Value::SortedSet(SortedSet::new()),
        }
    }

    /// Type tag matching the variant
    pub fn key_type(&self) -> KeyType {
        match self {
            Value::Str(_) => KeyType::String,
            Value::List(_) => KeyType::List,
            Value::Set(_) => KeyType::Set,
            Value::Hash(_) => KeyType::Hash,
            Value::SortedSet(_) => KeyType::SortedSet,
        }
    }

    /// True for a collection with no elements. Strings are never "empty"
    /// in this sense: an empty string is a valid stored value.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Value::Str(_) => false,
            Value::List(l) => l.is_empty(),
            Value::Set(s) => s.is_empty(),
            Value::Hash(h) => h.is_empty(),
            Value::SortedSet(z) => z.is_empty(),
        }
    }

    /// Try to get as string scalar
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list reference
    pub fn as_list(&self) -> Option<&VecDeque<Scalar>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut VecDeque<Scalar>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as set reference
    pub fn as_set(&self) -> Option<&HashSet<Scalar>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as mutable set
    pub fn as_set_mut(&mut self) -> Option<&mut HashSet<Scalar>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as hash reference
    pub fn as_hash(&self) -> Option<&HashMap<Bytes, Scalar>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as mutable hash
    pub fn as_hash_mut(&mut self) -> Option<&mut HashMap<Bytes, Scalar>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as sorted set reference
    pub fn as_sorted_set(&self) -> Option<&SortedSet> {
        match self {
            Value::SortedSet(z) => Some(z),
            _ => None,
        }
    }

    /// Try to get as mutable sorted set
    pub fn as_sorted_set_mut(&mut self) -> Option<&mut SortedSet> {
        match self {
            Value::SortedSet(z) => Some(z),
            _ => None,
        }
    }
}

/// JSON maps need string keys, so hash fields travel as a list of pairs
mod field_pairs {
    use super::Scalar;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        map: &HashMap<Bytes, Scalar>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&Bytes, &Scalar)> = map.iter().collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Bytes, Scalar>, D::Error> {
        let pairs: Vec<(Bytes, Scalar)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality_uses_text_form() {
        assert_eq!(Scalar::Integer(42), Scalar::from("42"));
        assert_ne!(Scalar::Integer(42), Scalar::from("042"));

        let mut set = HashSet::new();
        set.insert(Scalar::Integer(7));
        assert!(set.contains(&Scalar::from("7")));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(Scalar::from("-12").to_integer().unwrap(), -12);
        assert!(matches!(Scalar::from("+1").to_integer(), Err(KvError::NotInteger)));
        assert!(matches!(Scalar::from("1.5").to_integer(), Err(KvError::NotInteger)));
        assert!(matches!(Scalar::from(" 1").to_integer(), Err(KvError::NotInteger)));
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::empty(KeyType::SortedSet).key_type().as_str(), "zset");
        assert_eq!(Value::string("x").key_type(), KeyType::String);
        assert!(Value::empty(KeyType::List).is_empty_collection());
        assert!(!Value::empty(KeyType::String).is_empty_collection());
    }

    #[test]
    fn test_hash_survives_json() {
        let mut map = HashMap::new();
        map.insert(Bytes::from("f"), Scalar::Integer(3));
        let value = Value::Hash(map);

        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
