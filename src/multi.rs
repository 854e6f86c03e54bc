//! Multi-key generator (C5): `n` base keys balanced between two bounds.

use crate::alphabet::AlphabetTables;
use crate::error::{Error, Result};
use crate::key::key_between;

/// `nKeysBetween`: `n` base keys (no conflict suffix), in ascending order,
/// strictly between `a` and `b`.
///
/// Bisection is used only when both bounds are present, since that's the
/// only shape where it improves length distribution over sequential
/// generation; an open-ended range is already optimal generated
/// sequentially from the open end inward.
pub(crate) fn n_keys_between(
    tables: &AlphabetTables,
    a: Option<&[u32]>,
    b: Option<&[u32]>,
    n: i64,
) -> Result<Vec<Vec<u32>>> {
    if n < 0 {
        return Err(Error::InvalidInput {
            reason: "n must not be negative",
        });
    }
    let n = n as usize;
    if n == 0 {
        // Still validate the bounds so callers get INVALID_INPUT/INVALID_KEY
        // up front rather than a silently-accepted empty result.
        key_between_noop_validate(tables, a, b)?;
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![key_between(tables, a, b)?]);
    }

    match (a, b) {
        (_, None) => {
            let mut keys = Vec::with_capacity(n);
            let mut cursor = a.map(|s| s.to_vec());
            for _ in 0..n {
                let next = key_between(tables, cursor.as_deref(), None)?;
                cursor = Some(next.clone());
                keys.push(next);
            }
            Ok(keys)
        }
        (None, Some(_)) => {
            let mut keys = Vec::with_capacity(n);
            let mut cursor = b.map(|s| s.to_vec());
            for _ in 0..n {
                let next = key_between(tables, None, cursor.as_deref())?;
                cursor = Some(next.clone());
                keys.push(next);
            }
            keys.reverse();
            Ok(keys)
        }
        (Some(_), Some(_)) => {
            let mid = n / 2;
            let center = key_between(tables, a, b)?;
            let left = n_keys_between(tables, a, Some(&center), mid as i64)?;
            let right = n_keys_between(tables, Some(&center), b, (n - mid - 1) as i64)?;
            let mut keys = Vec::with_capacity(n);
            keys.extend(left);
            keys.push(center);
            keys.extend(right);
            Ok(keys)
        }
    }
}

fn key_between_noop_validate(
    tables: &AlphabetTables,
    a: Option<&[u32]>,
    b: Option<&[u32]>,
) -> Result<()> {
    if a.is_none() && b.is_none() {
        return Ok(());
    }
    key_between(tables, a, b).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{string_tables, AlphabetCache};

    fn tables() -> std::sync::Arc<AlphabetTables> {
        let cache = AlphabetCache::new();
        string_tables(&cache, "0123456789", "ABCabc").unwrap()
    }

    fn as_string(raw: &[u32]) -> String {
        raw.iter().map(|&c| char::from_u32(c).unwrap()).collect()
    }

    fn key(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    #[test]
    fn five_keys_from_open_bounds() {
        let t = tables();
        let keys = n_keys_between(&t, None, None, 5).unwrap();
        let rendered: Vec<String> = keys.iter().map(|k| as_string(k)).collect();
        assert_eq!(rendered, vec!["a0", "a1", "a2", "a3", "a4"]);
    }

    #[test]
    fn five_keys_bisected_between_bounds() {
        let t = tables();
        let a = key("C7");
        let b = key("a3");
        let keys = n_keys_between(&t, Some(&a), Some(&b), 5).unwrap();
        let rendered: Vec<String> = keys.iter().map(|k| as_string(k)).collect();
        assert_eq!(rendered, vec!["C72", "C75", "C8", "C85", "C9"]);
    }

    #[test]
    fn results_are_strictly_ascending_and_in_bounds() {
        let t = tables();
        let a = key("a0");
        let b = key("b0");
        for n in 1..12i64 {
            let keys = n_keys_between(&t, Some(&a), Some(&b), n).unwrap();
            assert_eq!(keys.len() as i64, n);
            let mut prev = a.clone();
            for k in &keys {
                assert!(prev.as_slice() < k.as_slice());
                prev = k.clone();
            }
            assert!(prev.as_slice() < b.as_slice());
        }
    }

    #[test]
    fn zero_keys_requested_is_empty() {
        let t = tables();
        assert_eq!(n_keys_between(&t, None, None, 0).unwrap(), Vec::<Vec<u32>>::new());
    }

    #[test]
    fn negative_n_is_invalid_input() {
        let t = tables();
        assert!(matches!(
            n_keys_between(&t, None, None, -1),
            Err(Error::InvalidInput { .. })
        ));
    }
}
