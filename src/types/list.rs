//! List algorithms over `VecDeque<Scalar>`

use super::{normalize_index, normalize_range};
use crate::error::KvError;
use crate::store::Scalar;
use std::collections::VecDeque;

/// Which end of the list an operation works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Left,
    Right,
}

/// Push values one at a time; on the left this leaves them in reverse
/// argument order (`a b c` becomes `c b a ...`).
pub fn push(list: &mut VecDeque<Scalar>, end: End, values: impl IntoIterator<Item = Scalar>) {
    for value in values {
        match end {
            End::Left => list.push_front(value),
            End::Right => list.push_back(value),
        }
    }
}

/// Pop up to `count` values in removal order
pub fn pop(list: &mut VecDeque<Scalar>, end: End, count: usize) -> Vec<Scalar> {
    let take = count.min(list.len());
    let mut popped = Vec::with_capacity(take);
    for _ in 0..take {
        let value = match end {
            End::Left => list.pop_front(),
            End::Right => list.pop_back(),
        };
        popped.extend(value);
    }
    popped
}

/// Inclusive window in storage order
pub fn range(list: &VecDeque<Scalar>, start: i64, stop: i64) -> Vec<Scalar> {
    match normalize_range(start, stop, list.len()) {
        Some((s, e)) => list.range(s..=e).cloned().collect(),
        None => Vec::new(),
    }
}

/// Element at a (possibly negative) position
pub fn index(list: &VecDeque<Scalar>, idx: i64) -> Option<&Scalar> {
    normalize_index(idx, list.len()).and_then(|i| list.get(i))
}

/// Overwrite the element at a position; out of range is an error
pub fn set_at(list: &mut VecDeque<Scalar>, idx: i64, value: Scalar) -> Result<(), KvError> {
    let i = normalize_index(idx, list.len()).ok_or(KvError::IndexOutOfRange)?;
    list[i] = value;
    Ok(())
}

/// Keep only the clamped window; an empty window empties the list
pub fn trim(list: &mut VecDeque<Scalar>, start: i64, stop: i64) {
    match normalize_range(start, stop, list.len()) {
        Some((s, e)) => {
            list.truncate(e + 1);
            list.drain(..s);
        }
        None => list.clear(),
    }
}

/// Remove elements equal to `value`
///
/// - count > 0: up to `count` matches, scanning from the head.
/// - count < 0: up to `|count|` matches, scanning from the tail.
/// - count = 0: every match.
///
/// Survivors keep their relative order. Returns the number removed.
pub fn remove(list: &mut VecDeque<Scalar>, count: i64, value: &Scalar) -> usize {
    let limit = if count == 0 {
        usize::MAX
    } else {
        count.unsigned_abs().min(usize::MAX as u64) as usize
    };

    let mut doomed = vec![false; list.len()];
    let mut removed = 0;
    let positions: Box<dyn Iterator<Item = usize>> = if count < 0 {
        Box::new((0..list.len()).rev())
    } else {
        Box::new(0..list.len())
    };

    for i in positions {
        if removed == limit {
            break;
        }
        if &list[i] == value {
            doomed[i] = true;
            removed += 1;
        }
    }

    if removed > 0 {
        let mut i = 0;
        list.retain(|_| {
            let keep = !doomed[i];
            i += 1;
            keep
        });
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> VecDeque<Scalar> {
        items.iter().map(|s| Scalar::from(*s)).collect()
    }

    fn texts(items: Vec<Scalar>) -> Vec<String> {
        items.into_iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_push_left_reverses() {
        let mut l = VecDeque::new();
        push(&mut l, End::Left, list(&["a", "b", "c"]));
        assert_eq!(texts(l.iter().cloned().collect()), vec!["c", "b", "a"]);

        let mut r = VecDeque::new();
        push(&mut r, End::Right, list(&["a", "b", "c"]));
        assert_eq!(texts(r.iter().cloned().collect()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pop_order() {
        let mut l = list(&["a", "b", "c", "d"]);
        assert_eq!(texts(pop(&mut l, End::Right, 2)), vec!["d", "c"]);
        assert_eq!(texts(pop(&mut l, End::Left, 10)), vec!["a", "b"]);
        assert!(l.is_empty());
    }

    #[test]
    fn test_index_and_range() {
        let l = list(&["x", "y", "z"]);
        assert_eq!(index(&l, -1).unwrap(), &"z");
        assert!(index(&l, 3).is_none());
        assert_eq!(texts(range(&l, -2, -1)), vec!["y", "z"]);
        assert!(range(&l, 2, 1).is_empty());
    }

    #[test]
    fn test_set_at_bounds() {
        let mut l = list(&["x", "y"]);
        set_at(&mut l, -1, Scalar::from("w")).unwrap();
        assert_eq!(texts(range(&l, 0, -1)), vec!["x", "w"]);
        assert!(matches!(set_at(&mut l, 2, Scalar::from("v")), Err(KvError::IndexOutOfRange)));
    }

    #[test]
    fn test_trim() {
        let mut l = list(&["a", "b", "c", "d", "e"]);
        trim(&mut l, 1, -2);
        assert_eq!(texts(range(&l, 0, -1)), vec!["b", "c", "d"]);

        trim(&mut l, 5, 10);
        assert!(l.is_empty());
    }

    #[test]
    fn test_remove_directions() {
        let target = Scalar::from("a");

        let mut l = list(&["a", "b", "a", "c", "a"]);
        assert_eq!(remove(&mut l, 2, &target), 2);
        assert_eq!(texts(range(&l, 0, -1)), vec!["b", "c", "a"]);

        let mut l = list(&["a", "b", "a", "c", "a"]);
        assert_eq!(remove(&mut l, -2, &target), 2);
        assert_eq!(texts(range(&l, 0, -1)), vec!["a", "b", "c"]);

        let mut l = list(&["a", "b", "a", "c", "a"]);
        assert_eq!(remove(&mut l, 0, &target), 3);
        assert_eq!(texts(range(&l, 0, -1)), vec!["b", "c"]);
    }
}
