//! Glob pattern compilation for KEYS
//!
//! A glob compiles to one of two strategies:
//! - [`GlobStrategy::Like`]: `*`, `?` and literals only. Backends can drive
//!   a prefix scan from [`LikePattern::literal_prefix`] and filter with
//!   [`LikePattern::matches`], or hand [`LikePattern::to_like`] to a
//!   SQL-style `LIKE ... ESCAPE '\'` matcher.
//! - [`GlobStrategy::RequiresRegex`]: the glob has a character class, so the
//!   caller builds a regex with [`glob_to_regex`] and scans every key.
//!
//! Matching is byte-wise: `?` consumes exactly one byte.

use crate::error::KvError;
use regex::bytes::Regex;

/// Result of compiling a glob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobStrategy {
    /// Expressible with wildcards and literals only
    Like(LikePattern),

    /// Contains a `[...]` class; needs a full regex
    RequiresRegex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    Literal(u8),
    AnyOne,
    AnyRun,
}

/// Wildcard pattern without character classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    atoms: Vec<Atom>,
    prefix_len: usize,
}

/// Compile a glob, scanning left to right
///
/// A backslash turns the next byte into a literal. The first unescaped `[`
/// aborts compilation with [`GlobStrategy::RequiresRegex`].
pub fn compile(glob: &[u8]) -> GlobStrategy {
    let mut atoms = Vec::with_capacity(glob.len());
    let mut iter = glob.iter().copied();

    while let Some(c) = iter.next() {
        match c {
            b'\\' => atoms.push(Atom::Literal(iter.next().unwrap_or(b'\\'))),
            b'*' => {
                if atoms.last() != Some(&Atom::AnyRun) {
                    atoms.push(Atom::AnyRun);
                }
            }
            b'?' => atoms.push(Atom::AnyOne),
            b'[' => return GlobStrategy::RequiresRegex,
            other => atoms.push(Atom::Literal(other)),
        }
    }

    let prefix_len = atoms
        .iter()
        .take_while(|a| matches!(a, Atom::Literal(_)))
        .count();

    GlobStrategy::Like(LikePattern { atoms, prefix_len })
}

impl LikePattern {
    /// Literal bytes every match must start with
    pub fn literal_prefix(&self) -> Vec<u8> {
        self.atoms[..self.prefix_len]
            .iter()
            .filter_map(|a| match a {
                Atom::Literal(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// True when the pattern has no wildcard at all
    pub fn is_exact(&self) -> bool {
        self.prefix_len == self.atoms.len()
    }

    /// Render as a SQL `LIKE` pattern with `\` as the escape character
    pub fn to_like(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.atoms.len());
        for atom in &self.atoms {
            match atom {
                Atom::AnyRun => out.push(b'%'),
                Atom::AnyOne => out.push(b'_'),
                Atom::Literal(b @ (b'%' | b'_' | b'\\')) => {
                    out.push(b'\\');
                    out.push(*b);
                }
                Atom::Literal(b) => out.push(*b),
            }
        }
        out
    }

    /// Match a whole key
    pub fn matches(&self, text: &[u8]) -> bool {
        let atoms = &self.atoms;
        let (mut p, mut t) = (0, 0);
        // last `*` seen and the text position it is currently absorbing up to
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match atoms.get(p) {
                Some(Atom::AnyRun) => {
                    backtrack = Some((p, t));
                    p += 1;
                }
                Some(Atom::AnyOne) => {
                    p += 1;
                    t += 1;
                }
                Some(Atom::Literal(b)) if *b == text[t] => {
                    p += 1;
                    t += 1;
                }
                _ => match backtrack {
                    Some((star, absorbed)) => {
                        p = star + 1;
                        t = absorbed + 1;
                        backtrack = Some((star, absorbed + 1));
                    }
                    None => return false,
                },
            }
        }

        atoms[p..].iter().all(|a| *a == Atom::AnyRun)
    }
}

/// Translate a glob, character classes included, into an anchored byte regex
///
/// Classes follow Redis: `[abc]`, `[a-z]`, `[^a]`, backslash escapes inside
/// the class, and an unterminated class closes at the end of the pattern.
pub fn glob_to_regex(glob: &[u8]) -> Result<Regex, KvError> {
    let mut re = String::from("(?s-u)^");
    let mut i = 0;

    while i < glob.len() {
        match glob[i] {
            b'\\' if i + 1 < glob.len() => {
                push_byte(&mut re, glob[i + 1]);
                i += 2;
            }
            b'*' => {
                re.push_str(".*");
                i += 1;
            }
            b'?' => {
                re.push('.');
                i += 1;
            }
            b'[' => {
                i = push_class(&mut re, glob, i + 1);
            }
            other => {
                push_byte(&mut re, other);
                i += 1;
            }
        }
    }
    re.push('$');

    Regex::new(&re).map_err(|e| KvError::invalid(format!("invalid pattern: {}", e)))
}

/// Emit one class starting right after `[`; returns the index after `]`
fn push_class(re: &mut String, glob: &[u8], mut i: usize) -> usize {
    let negate = glob.get(i) == Some(&b'^');
    if negate {
        i += 1;
    }

    let mut items = String::new();
    while i < glob.len() && glob[i] != b']' {
        let mut lo = glob[i];
        if lo == b'\\' && i + 1 < glob.len() {
            i += 1;
            lo = glob[i];
        }
        if i + 2 < glob.len() && glob[i + 1] == b'-' && glob[i + 2] != b']' {
            let hi = glob[i + 2];
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            items.push_str(&format!("\\x{:02X}-\\x{:02X}", lo, hi));
            i += 3;
        } else {
            items.push_str(&format!("\\x{:02X}", lo));
            i += 1;
        }
    }
    // skip the closing bracket when present
    if i < glob.len() {
        i += 1;
    }

    match (items.is_empty(), negate) {
        (true, true) => re.push('.'),
        (true, false) => re.push_str("$.^"),
        (false, true) => re.push_str(&format!("[^{}]", items)),
        (false, false) => re.push_str(&format!("[{}]", items)),
    }
    i
}

fn push_byte(re: &mut String, b: u8) {
    if b.is_ascii_alphanumeric() {
        re.push(b as char);
    } else {
        re.push_str(&format!("\\x{:02X}", b));
    }
}
