//! Key validity and the single-key generator (C4).

use std::char;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::alphabet::AlphabetTables;
use crate::error::{Error, Result};
use crate::integer::{self, IntegerPart};
use crate::midpoint::midpoint;

/// An immutable, comparable fractional index.
///
/// `Key` stores its symbols as raw `u32` code points (byte values for
/// binary-mode keys, Unicode scalar values for string-mode keys) so that
/// comparing two keys is a plain slice comparison regardless of medium -
/// the ordering invariant from the spec holds precisely because both
/// media's alphabets are constructed to ascend in this same order.
///
/// The `Brand` type parameter is a compile-time-only tag: two `Key<A>` and
/// `Key<B>` values are different types even when their contents happen to
/// coincide, which keeps a key generated by one factory from being
/// accidentally compared against a key from a differently configured one.
/// It carries no runtime cost and defaults to `()` for callers who don't
/// need the distinction.
pub struct Key<Brand = ()> {
    pub(crate) raw: Vec<u32>,
    _brand: PhantomData<Brand>,
}

impl<Brand> Key<Brand> {
    pub(crate) fn from_raw(raw: Vec<u32>) -> Self {
        Self {
            raw,
            _brand: PhantomData,
        }
    }

    /// Number of symbols in the encoded key.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The raw symbol codes, in encoding order.
    pub fn as_codes(&self) -> &[u32] {
        &self.raw
    }

    /// Render a binary-mode key as its octet sequence. Every code is
    /// guaranteed `< 256` for keys produced by a binary-mode factory; codes
    /// from a string-mode key are truncated, which is almost certainly not
    /// what you want.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw.iter().map(|&c| c as u8).collect()
    }

    /// Render a string-mode key as a `String` of its alphabet symbols.
    pub fn to_key_string(&self) -> String {
        self.raw
            .iter()
            .map(|&c| char::from_u32(c).expect("string-mode key codes are valid code points"))
            .collect()
    }

    /// Wrap an already-encoded binary key without validating it.
    pub fn from_bytes_unchecked(bytes: &[u8]) -> Self {
        Self::from_raw(bytes.iter().map(|&b| b as u32).collect())
    }

    /// Wrap an already-encoded string key without validating it.
    pub fn from_str_unchecked(s: &str) -> Self {
        Self::from_raw(s.chars().map(|c| c as u32).collect())
    }

    /// Re-tag this key under a different brand, without copying its
    /// contents. Escape hatch for callers who need to move a key between
    /// factories they know share an alphabet.
    pub fn rebrand<Other>(self) -> Key<Other> {
        Key::from_raw(self.raw)
    }
}

impl<Brand> Clone for Key<Brand> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<Brand> std::fmt::Debug for Key<Brand> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&self.raw).finish()
    }
}

impl<Brand> PartialEq for Key<Brand> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<Brand> Eq for Key<Brand> {}

impl<Brand> PartialOrd for Key<Brand> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<Brand> Ord for Key<Brand> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<Brand> std::hash::Hash for Key<Brand> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

/// A key decoded into its integer part and fractional digit indices.
pub(crate) struct Decoded {
    pub(crate) integer: IntegerPart,
    pub(crate) fractional: Vec<usize>,
}

/// Validate `key` against every rule in the spec's key-validity invariant
/// and return its decoded form.
pub(crate) fn validate(tables: &AlphabetTables, key: &[u32]) -> Result<Decoded> {
    let (integer, frac_raw) = integer::split_parts(tables, key)?;

    let mut fractional = Vec::with_capacity(frac_raw.len());
    for &symbol in frac_raw {
        let index = tables.digit_index(symbol).ok_or(Error::InvalidKey {
            reason: "fractional part contains a symbol outside the digit alphabet",
        })?;
        fractional.push(index);
    }

    if fractional.last() == Some(&0) {
        return Err(Error::InvalidKey {
            reason: "fractional part must not end in the smallest digit",
        });
    }

    if integer::is_smallest_integer(tables, &integer) && fractional.is_empty() {
        return Err(Error::InvalidKey {
            reason: "key is the reserved smallest-integer sentinel",
        });
    }

    Ok(Decoded {
        integer,
        fractional,
    })
}

fn encode_full(tables: &AlphabetTables, integer: &IntegerPart, fractional: &[usize]) -> Result<Vec<u32>> {
    let mut raw = integer::encode(tables, integer)?;
    raw.extend(fractional.iter().map(|&index| tables.digit_symbol(index)));
    Ok(raw)
}

/// `keyBetween` (C4): a single base key strictly between `a` and `b`.
///
/// `a` and `b` are already-encoded, already-validated keys (raw symbol
/// sequences); either may be absent to mean an open bound. Returns the new
/// key's raw symbols - no conflict suffix is appended here, that is
/// [`crate::suffix`] and [`crate::factory`]'s job.
pub(crate) fn key_between(
    tables: &AlphabetTables,
    a: Option<&[u32]>,
    b: Option<&[u32]>,
) -> Result<Vec<u32>> {
    if let Some(a) = a {
        validate(tables, a)?;
    }
    if let Some(b) = b {
        validate(tables, b)?;
    }
    if let (Some(a), Some(b)) = (a, b) {
        if a >= b {
            return Err(Error::InvalidInput {
                reason: "lower bound must sort strictly before upper bound",
            });
        }
    }

    match (a, b) {
        (None, None) => encode_full(tables, &integer::zero(tables), &[]),
        (None, Some(b)) => {
            let Decoded {
                integer: b_int,
                fractional: b_frac,
            } = validate(tables, b)?;
            if integer::is_smallest_integer(tables, &b_int) {
                let frac = midpoint(&[], Some(&b_frac), tables.digit_count());
                return encode_full(tables, &b_int, &frac);
            }
            if !b_frac.is_empty() {
                return encode_full(tables, &b_int, &[]);
            }
            match integer::decrement(tables, &b_int) {
                None => Err(Error::Internal {
                    reason: "decrement underflowed past the smallest-integer sentinel",
                }),
                Some(decremented) => {
                    if integer::is_smallest_integer(tables, &decremented) {
                        let largest = tables.digit_count() - 1;
                        return encode_full(tables, &decremented, &[largest]);
                    }
                    encode_full(tables, &decremented, &[])
                }
            }
        }
        (Some(a), None) => {
            let Decoded {
                integer: a_int,
                fractional: a_frac,
            } = validate(tables, a)?;
            match integer::increment(tables, &a_int) {
                Some(incremented) => encode_full(tables, &incremented, &[]),
                None => {
                    let frac = midpoint(&a_frac, None, tables.digit_count());
                    encode_full(tables, &a_int, &frac)
                }
            }
        }
        (Some(a), Some(b)) => {
            let Decoded {
                integer: a_int,
                fractional: a_frac,
            } = validate(tables, a)?;
            let Decoded {
                integer: b_int,
                fractional: b_frac,
            } = validate(tables, b)?;

            if a_int == b_int {
                let frac = midpoint(&a_frac, Some(&b_frac), tables.digit_count());
                return encode_full(tables, &a_int, &frac);
            }

            if let Some(incremented) = integer::increment(tables, &a_int) {
                let incremented_raw = integer::encode(tables, &incremented)?;
                let b_int_raw = integer::encode(tables, &b_int)?;
                if incremented_raw < b_int_raw {
                    return encode_full(tables, &incremented, &[]);
                }
            }
            let frac = midpoint(&a_frac, None, tables.digit_count());
            encode_full(tables, &a_int, &frac)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{string_tables, AlphabetCache};

    fn tables() -> Arc<AlphabetTables> {
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
    fn scenario_both_open() {
        let t = tables();
        let k = key_between(&t, None, None).unwrap();
        assert_eq!(as_string(&k), "a0");
    }

    #[test]
    fn scenario_key_before_first_and_after_last() {
        let t = tables();
        let a0 = key("a0");
        assert_eq!(as_string(&key_between(&t, None, Some(&a0)).unwrap()), "C9");
        assert_eq!(as_string(&key_between(&t, Some(&a0), None).unwrap()), "a1");
    }

    #[test]
    fn scenario_between_consecutive_integers() {
        let t = tables();
        let a0 = key("a0");
        let a1 = key("a1");
        assert_eq!(
            as_string(&key_between(&t, Some(&a0), Some(&a1)).unwrap()),
            "a05"
        );
    }

    #[test]
    fn scenario_equal_bounds_is_invalid_input() {
        let t = tables();
        let a0 = key("a0");
        let err = key_between(&t, Some(&a0), Some(&a0)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInput {
                reason: "lower bound must sort strictly before upper bound"
            }
        );
    }

    #[test]
    fn scenario_invalid_key_has_no_length_marker() {
        let t = tables();
        let bogus = key("xyz"); // not in the A-C/a-c length base
        let err = key_between(&t, Some(&bogus), None).unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
    }

    #[test]
    fn malformed_key_is_rejected_even_when_it_sorts_above_the_other_bound() {
        // "xyz" > "a0" lexicographically, but "xyz" has no valid length
        // marker under this alphabet. Format must be checked before order.
        let t = tables();
        let bogus = key("xyz");
        let a0 = key("a0");
        let err = key_between(&t, Some(&bogus), Some(&a0)).unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
    }

    #[test]
    fn produced_keys_are_strictly_between_bounds() {
        let t = tables();
        let mut prev: Option<Vec<u32>> = None;
        for _ in 0..50 {
            let next = key_between(&t, prev.as_deref(), None).unwrap();
            if let Some(p) = &prev {
                assert!(p.as_slice() < next.as_slice());
            }
            prev = Some(next);
        }
    }
}
