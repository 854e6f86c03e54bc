//! # fractional-index
//!
//! Order-preserving fractional index generation: keys that can be inserted
//! arbitrarily between any two existing keys without reordering their
//! neighbours, for applications that need stable sort positions (task
//! lists, kanban columns, any ordered collection backed by a comparable
//! column).
//!
//! ## Module Organization
//!
//! - [`alphabet`] - digit/length-marker alphabet tables and their cache (string mode)
//! - [`integer`] - the integer part of a key: signed length, increment/decrement
//! - [`midpoint`] - the fractional midpoint algorithm
//! - [`key`] - key validity and `keyBetween`
//! - [`multi`] - `nKeysBetween`, balanced multi-key generation
//! - [`suffix`] - the deterministic conflict suffix
//! - [`factory`] - [`KeyFactory`], the public configuration and generation surface
//! - [`adapter`] - the contract external storage adapters implement
//!
//! ## Quick Start
//!
//! ```
//! use fractional_index::{FactoryConfig, KeyFactory};
//!
//! let factory: KeyFactory = KeyFactory::new(FactoryConfig::binary()).unwrap();
//! let key_a = factory.generate_key_between(None, None, 0).next().unwrap().unwrap();
//! let key_b = factory.generate_key_between(Some(&key_a), None, 0).next().unwrap().unwrap();
//! assert!(key_a < key_b);
//!
//! let key_between = factory
//!     .generate_key_between(Some(&key_a), Some(&key_b), 0)
//!     .next()
//!     .unwrap()
//!     .unwrap();
//! assert!(key_a < key_between && key_between < key_b);
//! ```
//!
//! String mode takes a caller-supplied digit alphabet and length-marker
//! alphabet instead of the fixed 256-value binary tables:
//!
//! ```
//! use fractional_index::{FactoryConfig, KeyFactory};
//!
//! let factory: KeyFactory =
//!     KeyFactory::new(FactoryConfig::string("0123456789", "ABCabc")).unwrap();
//! let key = factory.generate_key_between(None, None, 0).next().unwrap().unwrap();
//! assert_eq!(key.to_key_string(), "a0");
//! ```
//!
//! ## Scope
//!
//! This crate produces comparable key *values*. Persistence, uniqueness
//! enforcement, and concurrency control belong to the caller's storage
//! layer; see [`adapter`] for the interface that layer implements.

mod alphabet;
mod error;
mod integer;
mod key;
mod midpoint;
mod multi;
mod suffix;

pub mod adapter;
pub mod factory;

pub use adapter::{IndexConflictError, NeighborSource, Neighbors};
pub use alphabet::AlphabetCache;
pub use error::{Error, Result};
pub use factory::{FactoryConfig, KeyCandidates, KeyFactory, NKeyCandidates};
pub use key::Key;

#[cfg(feature = "serde")]
mod serde_support {
    use super::Key;
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

    // Keys don't carry their mode at runtime, so the portable serialized
    // form is the raw symbol codes rather than `to_bytes`/`to_key_string` -
    // those two assume binary or string mode respectively and would be
    // lossy (or wrong) applied to the other.
    impl<Brand> Serialize for Key<Brand> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.as_codes().serialize(serializer)
        }
    }

    impl<'de, Brand> Deserialize<'de> for Key<Brand> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let codes: Vec<u32> = Vec::deserialize(deserializer)?;
            if codes.is_empty() {
                return Err(D::Error::custom("key must not be empty"));
            }
            Ok(Key::from_raw(codes))
        }
    }
}
