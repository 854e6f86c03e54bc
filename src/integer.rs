//! Integer codec (C2): the integer part of a key as a signed-length-prefixed
//! big-endian base-`D` number, plus increment/decrement across the length
//! boundary.

use crate::alphabet::AlphabetTables;
use crate::error::{Error, Result};

/// The integer part of a key, decoded into its signed length and magnitude
/// digit indices (`0..digit_count`). `magnitude.len() == signed_length.unsigned_abs()`
/// always holds for a value produced or accepted by this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IntegerPart {
    pub(crate) signed_length: i32,
    pub(crate) magnitude: Vec<usize>,
}

impl IntegerPart {
    /// The symbol count this integer part occupies once encoded: the
    /// marker plus every magnitude digit.
    pub(crate) fn encoded_len(&self) -> usize {
        1 + self.magnitude.len()
    }
}

/// Read the signed length encoded by a key's leading symbol.
pub(crate) fn signed_length(tables: &AlphabetTables, key: &[u32]) -> Result<i32> {
    let marker = *key.first().ok_or(Error::InvalidKey {
        reason: "key is empty",
    })?;
    tables.length_for_marker(marker).ok_or(Error::InvalidKey {
        reason: "leading symbol is not a valid length marker",
    })
}

/// Split a key into its decoded integer part and the raw (still encoded)
/// fractional symbols that follow it.
pub(crate) fn split_parts<'k>(
    tables: &AlphabetTables,
    key: &'k [u32],
) -> Result<(IntegerPart, &'k [u32])> {
    let length = signed_length(tables, key)?;
    let n = length.unsigned_abs() as usize + 1;
    if key.len() < n {
        return Err(Error::InvalidKey {
            reason: "key is shorter than its declared integer part",
        });
    }
    let mut magnitude = Vec::with_capacity(n - 1);
    for &symbol in &key[1..n] {
        let index = tables.digit_index(symbol).ok_or(Error::InvalidKey {
            reason: "integer magnitude contains a symbol outside the digit alphabet",
        })?;
        magnitude.push(index);
    }
    Ok((
        IntegerPart {
            signed_length: length,
            magnitude,
        },
        &key[n..],
    ))
}

/// The integer part of the canonical zero key: length `+1`, magnitude the
/// single smallest digit.
pub(crate) fn zero(_tables: &AlphabetTables) -> IntegerPart {
    IntegerPart {
        signed_length: 1,
        magnitude: vec![0],
    }
}

/// The reserved sentinel: most-negative length, all-smallest magnitude
/// digits. Never a valid fractional index on its own.
pub(crate) fn smallest_integer(tables: &AlphabetTables) -> IntegerPart {
    let length = tables.min_length();
    IntegerPart {
        signed_length: length,
        magnitude: vec![0; length.unsigned_abs() as usize],
    }
}

pub(crate) fn is_smallest_integer(tables: &AlphabetTables, part: &IntegerPart) -> bool {
    *part == smallest_integer(tables)
}

/// Encode a decoded integer part back into its raw symbols (marker plus
/// magnitude digits).
pub(crate) fn encode(tables: &AlphabetTables, part: &IntegerPart) -> Result<Vec<u32>> {
    let marker = tables
        .marker_for_length(part.signed_length)
        .ok_or(Error::Internal {
            reason: "signed length has no corresponding marker symbol",
        })?;
    let mut out = Vec::with_capacity(part.encoded_len());
    out.push(marker);
    out.extend(part.magnitude.iter().map(|&index| tables.digit_symbol(index)));
    Ok(out)
}

/// Add one to the magnitude a big-endian base-`D` number represents,
/// carrying into the signed length when every digit was already the
/// largest. Returns `None` when the integer range is exhausted (no marker
/// exists for the next length) - the `LIMIT_REACHED` signal from the spec,
/// handled entirely inside the key generator.
pub(crate) fn increment(tables: &AlphabetTables, part: &IntegerPart) -> Option<IntegerPart> {
    let largest = tables.digit_count() - 1;
    let mut magnitude = part.magnitude.clone();
    for digit in magnitude.iter_mut().rev() {
        if *digit < largest {
            *digit += 1;
            return Some(IntegerPart {
                signed_length: part.signed_length,
                magnitude,
            });
        }
        *digit = 0;
    }

    // Every digit carried past the largest: move to the next signed length,
    // skipping the unused length 0.
    let next_length = if part.signed_length == -1 {
        1
    } else {
        part.signed_length + 1
    };
    tables.marker_for_length(next_length)?;
    Some(IntegerPart {
        signed_length: next_length,
        magnitude: vec![0; next_length.unsigned_abs() as usize],
    })
}

/// Symmetric counterpart of [`increment`]: subtract one, borrowing into the
/// signed length when every digit was already the smallest.
pub(crate) fn decrement(tables: &AlphabetTables, part: &IntegerPart) -> Option<IntegerPart> {
    let largest = tables.digit_count() - 1;
    let mut magnitude = part.magnitude.clone();
    for digit in magnitude.iter_mut().rev() {
        if *digit > 0 {
            *digit -= 1;
            return Some(IntegerPart {
                signed_length: part.signed_length,
                magnitude,
            });
        }
        *digit = largest;
    }

    let next_length = if part.signed_length == 1 {
        -1
    } else {
        part.signed_length - 1
    };
    tables.marker_for_length(next_length)?;
    Some(IntegerPart {
        signed_length: next_length,
        magnitude: vec![largest; next_length.unsigned_abs() as usize],
    })
}
