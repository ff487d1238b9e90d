//! String algorithms: counters, substrings and splicing

use crate::error::KvError;
use crate::store::Scalar;

/// Largest string SETRANGE is allowed to produce (512 MiB)
pub const MAX_STRING_LEN: usize = 512 * 1024 * 1024;

/// Add `delta` to the integer held by `current` (absent counts as 0)
pub fn incr(current: Option<&Scalar>, delta: i64) -> Result<i64, KvError> {
    let base = match current {
        Some(scalar) => scalar.to_integer()?,
        None => 0,
    };
    base.checked_add(delta).ok_or(KvError::Overflow)
}

/// Substring with inclusive, possibly negative bounds, both clamped into
/// `[0, len-1]`. Inverted or empty input yields an empty slice.
pub fn get_range(text: &[u8], start: i64, end: i64) -> &[u8] {
    let len = text.len() as i64;
    if len == 0 {
        return &[];
    }

    let clamp = |i: i64| {
        let i = if i < 0 { len + i } else { i };
        i.clamp(0, len - 1)
    };
    let (start, end) = (clamp(start), clamp(end));

    if start > end {
        return &[];
    }
    &text[start as usize..=end as usize]
}

/// Splice `value` into `text` at `offset`, padding any gap with zero bytes
pub fn set_range(text: &[u8], offset: i64, value: &[u8]) -> Result<Vec<u8>, KvError> {
    if offset < 0 {
        return Err(KvError::invalid("offset is out of range"));
    }
    let offset = offset as usize;
    let end = offset
        .checked_add(value.len())
        .filter(|end| *end <= MAX_STRING_LEN)
        .ok_or_else(|| KvError::invalid("string exceeds maximum allowed size"))?;

    let mut out = Vec::with_capacity(end.max(text.len()));
    out.extend_from_slice(text);
    if out.len() < end {
        out.resize(end, 0);
    }
    out[offset..end].copy_from_slice(value);
    Ok(out)
}
