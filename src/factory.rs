//! Key factory (C7): configuration, validation, and the lazy candidate
//! sequences that drive the caller's retry loop.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::alphabet::{self, AlphabetCache, AlphabetTables};
use crate::error::{Error, Result};
use crate::key::{key_between, Key};
use crate::multi::n_keys_between;
use crate::suffix::suffix;

const DEFAULT_MAX_LENGTH: usize = 50;
const DEFAULT_MAX_RETRIES: usize = 5;

/// Configuration for a [`KeyFactory`].
///
/// Unknown fields can't be expressed in a typed struct, which is exactly
/// the point: the spec asks for unrecognised options to be rejected at
/// construction, and a typed builder makes that the compiler's job rather
/// than a runtime check.
#[derive(Clone)]
pub struct FactoryConfig {
    mode: Mode,
    max_length: usize,
    max_retries: usize,
    cache: Option<AlphabetCache>,
}

#[derive(Clone)]
enum Mode {
    Binary,
    String {
        digit_base: String,
        length_base: String,
    },
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Binary,
            max_length: DEFAULT_MAX_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
            cache: None,
        }
    }
}

impl FactoryConfig {
    /// Start building a binary-mode configuration (no caller alphabet).
    pub fn binary() -> Self {
        Self {
            mode: Mode::Binary,
            ..Self::default()
        }
    }

    /// Start building a string-mode configuration over the given digit and
    /// length-marker alphabets. Validation happens when the factory is
    /// built, not here.
    pub fn string(digit_base: impl Into<String>, length_base: impl Into<String>) -> Self {
        Self {
            mode: Mode::String {
                digit_base: digit_base.into(),
                length_base: length_base.into(),
            },
            ..Self::default()
        }
    }

    /// Maximum encoded key length before `MAX_LENGTH_EXCEEDED` fires.
    /// Default 50.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Maximum conflict-suffix candidates a single call to
    /// `generate_key_between`/`generate_n_keys_between` will yield. Default
    /// 5.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Share alphabet tables with other factories through this cache
    /// rather than the process-wide default. Ignored in binary mode.
    pub fn with_cache(mut self, cache: AlphabetCache) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Holds the validated alphabet and generation limits shared by every key
/// this factory produces. Cheap to clone (an `Arc` around the tables).
///
/// `Brand` distinguishes keys from differently-configured factories at the
/// type level; see [`Key`].
pub struct KeyFactory<Brand = ()> {
    tables: Arc<AlphabetTables>,
    max_length: usize,
    max_retries: usize,
    _brand: PhantomData<Brand>,
}

impl<Brand> std::fmt::Debug for KeyFactory<Brand> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFactory")
            .field("max_length", &self.max_length)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl<Brand> Clone for KeyFactory<Brand> {
    fn clone(&self) -> Self {
        Self {
            tables: self.tables.clone(),
            max_length: self.max_length,
            max_retries: self.max_retries,
            _brand: PhantomData,
        }
    }
}

impl<Brand> KeyFactory<Brand> {
    /// Validate `config` and build a factory. The only point at which
    /// `INVALID_ALPHABET` can be raised.
    pub fn new(config: FactoryConfig) -> Result<Self> {
        let tables = match config.mode {
            Mode::Binary => AlphabetTables::binary(),
            Mode::String {
                digit_base,
                length_base,
            } => {
                let cache = config.cache.unwrap_or_else(|| alphabet::default_cache().clone());
                alphabet::string_tables(&cache, &digit_base, &length_base)?
            }
        };
        Ok(Self {
            tables,
            max_length: config.max_length,
            max_retries: config.max_retries,
            _brand: PhantomData,
        })
    }

    /// A lazy, finite, non-restartable sequence of candidate keys strictly
    /// between `a` and `b`. Validation of `a`/`b` and computation of the
    /// base key is deferred to the first call to `next()`, so constructing
    /// the sequence itself never fails.
    pub fn generate_key_between(
        &self,
        a: Option<&Key<Brand>>,
        b: Option<&Key<Brand>>,
        skip: usize,
    ) -> KeyCandidates<Brand> {
        KeyCandidates {
            tables: self.tables.clone(),
            max_length: self.max_length,
            max_retries: self.max_retries,
            a: a.map(|k| k.raw.clone()),
            b: b.map(|k| k.raw.clone()),
            skip,
            state: CandidateState::Pending,
            _brand: PhantomData,
        }
    }

    /// A lazy sequence of `n`-key vectors, each a fresh batch of candidates
    /// (same relative order, same conflict suffix applied to every
    /// element) for the caller to try after a storage collision.
    pub fn generate_n_keys_between(
        &self,
        a: Option<&Key<Brand>>,
        b: Option<&Key<Brand>>,
        n: i64,
        skip: usize,
    ) -> NKeyCandidates<Brand> {
        NKeyCandidates {
            tables: self.tables.clone(),
            max_length: self.max_length,
            max_retries: self.max_retries,
            a: a.map(|k| k.raw.clone()),
            b: b.map(|k| k.raw.clone()),
            n,
            skip,
            state: CandidateState::Pending,
            _brand: PhantomData,
        }
    }
}

enum CandidateState<T> {
    /// Base value not yet computed.
    Pending,
    /// Base computed; holds the next attempt offset to try.
    Ready { base: T, attempt: usize },
    /// Validation failed, retries exhausted, or a length ceiling was hit.
    Done,
}

/// Iterator returned by [`KeyFactory::generate_key_between`].
pub struct KeyCandidates<Brand> {
    tables: Arc<AlphabetTables>,
    max_length: usize,
    max_retries: usize,
    a: Option<Vec<u32>>,
    b: Option<Vec<u32>>,
    skip: usize,
    state: CandidateState<Vec<u32>>,
    _brand: PhantomData<Brand>,
}

impl<Brand> Iterator for KeyCandidates<Brand> {
    type Item = Result<Key<Brand>>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, CandidateState::Done) {
            return None;
        }
        if matches!(self.state, CandidateState::Pending) {
            match key_between(&self.tables, self.a.as_deref(), self.b.as_deref()) {
                Ok(base) => self.state = CandidateState::Ready { base, attempt: 0 },
                Err(err) => {
                    self.state = CandidateState::Done;
                    return Some(Err(err));
                }
            }
        }

        let (base, attempt) = match &self.state {
            CandidateState::Ready { base, attempt } => (base.clone(), *attempt),
            _ => unreachable!("state is Ready after the base is resolved"),
        };
        if attempt >= self.max_retries {
            self.state = CandidateState::Done;
            return None;
        }

        let tail = suffix((self.skip + attempt) as u64, self.tables.digit_count());
        let mut candidate = base.clone();
        candidate.extend(tail.iter().map(|&index| self.tables.digit_symbol(index)));

        self.state = CandidateState::Ready { base, attempt: attempt + 1 };

        if candidate.len() > self.max_length {
            self.state = CandidateState::Done;
            return Some(Err(Error::MaxLengthExceeded {
                length: candidate.len(),
                max_length: self.max_length,
            }));
        }

        Some(Ok(Key::from_raw(candidate)))
    }
}

/// Iterator returned by [`KeyFactory::generate_n_keys_between`].
pub struct NKeyCandidates<Brand> {
    tables: Arc<AlphabetTables>,
    max_length: usize,
    max_retries: usize,
    a: Option<Vec<u32>>,
    b: Option<Vec<u32>>,
    n: i64,
    skip: usize,
    state: CandidateState<Vec<Vec<u32>>>,
    _brand: PhantomData<Brand>,
}

impl<Brand> Iterator for NKeyCandidates<Brand> {
    type Item = Result<Vec<Key<Brand>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, CandidateState::Done) {
            return None;
        }
        if matches!(self.state, CandidateState::Pending) {
            match n_keys_between(&self.tables, self.a.as_deref(), self.b.as_deref(), self.n) {
                Ok(base) => self.state = CandidateState::Ready { base, attempt: 0 },
                Err(err) => {
                    self.state = CandidateState::Done;
                    return Some(Err(err));
                }
            }
        }

        let (base, attempt) = match &self.state {
            CandidateState::Ready { base, attempt } => (base.clone(), *attempt),
            _ => unreachable!("state is Ready after the base is resolved"),
        };
        if attempt >= self.max_retries {
            self.state = CandidateState::Done;
            return None;
        }

        let tail = suffix((self.skip + attempt) as u64, self.tables.digit_count());
        self.state = CandidateState::Ready { base: base.clone(), attempt: attempt + 1 };

        let mut longest = 0usize;
        let mut out = Vec::with_capacity(base.len());
        for k in &base {
            let mut candidate = k.clone();
            candidate.extend(tail.iter().map(|&index| self.tables.digit_symbol(index)));
            longest = longest.max(candidate.len());
            out.push(candidate);
        }

        if longest > self.max_length {
            self.state = CandidateState::Done;
            return Some(Err(Error::MaxLengthExceeded {
                length: longest,
                max_length: self.max_length,
            }));
        }

        Some(Ok(out.into_iter().map(Key::from_raw).collect()))
    }
}
