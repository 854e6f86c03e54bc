//! Error taxonomy for the fractional index core.
//!
//! Every fallible operation in this crate returns one of the variants below.
//! `Limit` is deliberately not part of this enum: it is an internal signal
//! used between the integer codec and the key generator and is never
//! surfaced to a caller (see [`crate::integer`]).

use core::fmt;

/// Errors produced by alphabet construction, key validation, and key
/// generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied digit or length alphabet violates the "at least
    /// four distinct, strictly ascending symbols" constraint.
    InvalidAlphabet {
        /// Human-readable explanation of which constraint failed.
        reason: &'static str,
    },
    /// A key argument is not a valid fractional index.
    InvalidKey {
        /// Human-readable explanation of which validity rule failed.
        reason: &'static str,
    },
    /// Bounds were out of order, equal, or a requested count was negative.
    InvalidInput {
        /// Human-readable explanation of which precondition failed.
        reason: &'static str,
    },
    /// A candidate key would exceed the factory's configured `max_length`.
    MaxLengthExceeded {
        /// Length of the offending candidate.
        length: usize,
        /// The configured ceiling.
        max_length: usize,
    },
    /// An invariant the core believes unreachable was violated. Indicates
    /// a bug in this crate rather than misuse by a caller.
    Internal {
        /// Human-readable explanation.
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlphabet { reason } => write!(f, "invalid alphabet: {reason}"),
            Self::InvalidKey { reason } => write!(f, "invalid key: {reason}"),
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Self::MaxLengthExceeded { length, max_length } => write!(
                f,
                "candidate key of length {length} exceeds max_length {max_length}"
            ),
            Self::Internal { reason } => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
