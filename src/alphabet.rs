//! Alphabet tables (C1): validated digit and length-marker alphabets, plus
//! the process-local cache that lets factories built from identical
//! alphabets share the same tables.
//!
//! Binary mode never reaches this module's validation path directly -
//! [`AlphabetTables::binary`] builds the fixed 256-symbol tables described
//! in the spec's binary alphabet section directly, as a degenerate instance
//! of the same `digit_base` / `length_base` / `P = floor(L/2)` shape used
//! by string mode.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Digit and length-marker tables for one alphabet.
///
/// Built once and shared (via `Arc`) across every key produced under that
/// alphabet. Binary mode gets a single process-wide instance; string mode
/// instances are keyed by their symbols in [`AlphabetCache`].
#[derive(Debug)]
pub(crate) struct AlphabetTables {
    digit_forward: Vec<u32>,
    digit_reverse: HashMap<u32, usize>,
    /// Indexed 0..length_forward.len(); the first `negative_count` entries
    /// encode signed lengths `-negative_count..-1` in order, the rest encode
    /// `1..=(len - negative_count)` in order.
    length_forward: Vec<u32>,
    length_reverse: HashMap<u32, i32>,
    negative_count: usize,
}

impl AlphabetTables {
    fn build(digit_base: &[u32], length_base: &[u32]) -> Result<Self> {
        validate_ascending(digit_base)?;
        validate_ascending(length_base)?;

        let digit_forward = digit_base.to_vec();
        let mut digit_reverse = HashMap::with_capacity(digit_base.len());
        for (index, &symbol) in digit_base.iter().enumerate() {
            digit_reverse.insert(symbol, index);
        }

        let negative_count = length_base.len() / 2;
        let length_forward = length_base.to_vec();
        let mut length_reverse = HashMap::with_capacity(length_base.len());
        for (position, &symbol) in length_base.iter().enumerate() {
            let signed_length = if position < negative_count {
                position as i32 - negative_count as i32
            } else {
                (position - negative_count) as i32 + 1
            };
            length_reverse.insert(symbol, signed_length);
        }

        Ok(Self {
            digit_forward,
            digit_reverse,
            length_forward,
            length_reverse,
            negative_count,
        })
    }

    fn binary_uncached() -> Self {
        let digit_base: Vec<u32> = (0..=255u32).collect();
        let length_base: Vec<u32> = (0..=255u32).collect();
        Self::build(&digit_base, &length_base).expect("binary alphabet is always valid")
    }

    /// The fixed, process-wide binary alphabet (256 digit values, 256
    /// length-marker values, `P = 128`).
    pub(crate) fn binary() -> Arc<Self> {
        static BINARY: Lazy<Arc<AlphabetTables>> =
            Lazy::new(|| Arc::new(AlphabetTables::binary_uncached()));
        BINARY.clone()
    }

    pub(crate) fn digit_count(&self) -> usize {
        self.digit_forward.len()
    }

    pub(crate) fn digit_symbol(&self, index: usize) -> u32 {
        self.digit_forward[index]
    }

    pub(crate) fn digit_index(&self, symbol: u32) -> Option<usize> {
        self.digit_reverse.get(&symbol).copied()
    }

    pub(crate) fn length_for_marker(&self, symbol: u32) -> Option<i32> {
        self.length_reverse.get(&symbol).copied()
    }

    pub(crate) fn marker_for_length(&self, signed_length: i32) -> Option<u32> {
        let p = self.negative_count as i32;
        let position = if signed_length < 0 {
            signed_length + p
        } else if signed_length > 0 {
            p + signed_length - 1
        } else {
            return None;
        };
        if position < 0 {
            return None;
        }
        self.length_forward.get(position as usize).copied()
    }

    pub(crate) fn min_length(&self) -> i32 {
        -(self.negative_count as i32)
    }

    pub(crate) fn max_length(&self) -> i32 {
        (self.length_forward.len() - self.negative_count) as i32
    }
}

fn validate_ascending(symbols: &[u32]) -> Result<()> {
    if symbols.len() < 4 {
        return Err(Error::InvalidAlphabet {
            reason: "alphabet must contain at least 4 symbols",
        });
    }
    for window in symbols.windows(2) {
        if window[0] >= window[1] {
            return Err(Error::InvalidAlphabet {
                reason: "alphabet symbols must be strictly ascending with no duplicates",
            });
        }
    }
    Ok(())
}

/// A process-local, insert-only cache of string-mode alphabet tables.
///
/// Two [`crate::factory::KeyFactory`] instances built from identical
/// `digit_base` / `length_base` pairs and sharing a cache resolve to the
/// same `Arc<AlphabetTables>`, so they produce identical keys and pay the
/// alphabet-construction cost only once. A racing double-build is harmless:
/// both builds produce the same value and the losing one is simply dropped.
#[derive(Clone, Default)]
pub struct AlphabetCache {
    tables: Arc<RwLock<HashMap<String, Arc<AlphabetTables>>>>,
}

impl AlphabetCache {
    /// Create a fresh, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_build(
        &self,
        cache_key: &str,
        digit_base: &[u32],
        length_base: &[u32],
    ) -> Result<Arc<AlphabetTables>> {
        if let Some(existing) = self.tables.read().get(cache_key) {
            return Ok(existing.clone());
        }
        let built = Arc::new(AlphabetTables::build(digit_base, length_base)?);
        let mut guard = self.tables.write();
        let tables = guard.entry(cache_key.to_string()).or_insert_with(|| built.clone());
        Ok(tables.clone())
    }
}

/// The cache used when a factory is not given one explicitly.
pub(crate) fn default_cache() -> &'static AlphabetCache {
    static DEFAULT: Lazy<AlphabetCache> = Lazy::new(AlphabetCache::default);
    &DEFAULT
}

/// Build or fetch the tables for a string alphabet, identified by a tag
/// plus its symbols (the cache key scheme described in the spec).
pub(crate) fn string_tables(
    cache: &AlphabetCache,
    digit_base: &str,
    length_base: &str,
) -> Result<Arc<AlphabetTables>> {
    let digit_codes: Vec<u32> = digit_base.chars().map(|c| c as u32).collect();
    let length_codes: Vec<u32> = length_base.chars().map(|c| c as u32).collect();
    let cache_key = format!("string:{digit_base}\u{0}{length_base}");
    cache.get_or_build(&cache_key, &digit_codes, &length_codes)
}
