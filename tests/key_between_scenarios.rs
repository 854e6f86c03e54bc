//! End-to-end scenarios for `keyBetween` / `nKeysBetween`, against both the
//! string-mode alphabet used throughout the design doc and the fixed
//! binary alphabet.

use fractional_index::{Error, FactoryConfig, Key, KeyFactory};

fn string_factory() -> KeyFactory {
    KeyFactory::new(FactoryConfig::string("0123456789", "ABCabc")).unwrap()
}

fn between(factory: &KeyFactory, a: Option<&Key>, b: Option<&Key>) -> String {
    factory
        .generate_key_between(a, b, 0)
        .next()
        .unwrap()
        .unwrap()
        .to_key_string()
}

fn key(s: &str) -> Key {
    Key::from_str_unchecked(s)
}

#[test]
fn both_bounds_open() {
    let factory = string_factory();
    assert_eq!(between(&factory, None, None), "a0");
}

#[test]
fn key_before_first_and_after_last() {
    let factory = string_factory();
    let a0 = key("a0");
    assert_eq!(between(&factory, None, Some(&a0)), "C9");
    assert_eq!(between(&factory, Some(&a0), None), "a1");
}

#[test]
fn key_between_consecutive_integers() {
    let factory = string_factory();
    let a0 = key("a0");
    let a1 = key("a1");
    assert_eq!(between(&factory, Some(&a0), Some(&a1)), "a05");
}

#[test]
fn five_keys_from_open_bounds() {
    let factory = string_factory();
    let keys: Vec<String> = factory
        .generate_n_keys_between(None, None, 5, 0)
        .next()
        .unwrap()
        .unwrap()
        .iter()
        .map(|k| k.to_key_string())
        .collect();
    assert_eq!(keys, vec!["a0", "a1", "a2", "a3", "a4"]);
}

#[test]
fn five_keys_bisected_between_bounds() {
    let factory = string_factory();
    let a = key("C7");
    let b = key("a3");
    let keys: Vec<String> = factory
        .generate_n_keys_between(Some(&a), Some(&b), 5, 0)
        .next()
        .unwrap()
        .unwrap()
        .iter()
        .map(|k| k.to_key_string())
        .collect();
    assert_eq!(keys, vec!["C72", "C75", "C8", "C85", "C9"]);
}

#[test]
fn binary_mode_matches_the_same_shape() {
    let factory: KeyFactory = KeyFactory::new(FactoryConfig::binary()).unwrap();
    let zero = factory
        .generate_key_between(None, None, 0)
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(zero.to_bytes(), vec![128, 0]);

    let before_zero = factory
        .generate_key_between(None, Some(&zero), 0)
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(before_zero.to_bytes(), vec![127, 255]);

    let after_zero = factory
        .generate_key_between(Some(&zero), None, 0)
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(after_zero.to_bytes(), vec![128, 1]);
}

#[test]
fn equal_bounds_is_invalid_input() {
    let factory = string_factory();
    let a0 = key("a0");
    let err = factory
        .generate_key_between(Some(&a0), Some(&a0), 0)
        .next()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn malformed_key_is_invalid_key() {
    let factory = string_factory();
    let bogus = key("xyz");
    let err = factory
        .generate_key_between(Some(&bogus), None, 0)
        .next()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
}

#[test]
fn malformed_key_is_invalid_key_even_when_it_sorts_above_the_other_bound() {
    // "xyz" > "a0" lexicographically, so an order-first check would wrongly
    // report InvalidInput instead of catching the malformed bound.
    let factory = string_factory();
    let bogus = key("xyz");
    let a0 = key("a0");
    let err = factory
        .generate_key_between(Some(&bogus), Some(&a0), 0)
        .next()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
}

#[test]
fn short_digit_alphabet_is_invalid_alphabet() {
    let err = KeyFactory::<()>::new(FactoryConfig::string("ba", "ABCabc")).unwrap_err();
    assert!(matches!(err, Error::InvalidAlphabet { .. }));
}

#[test]
fn shared_cache_is_equivalent_to_unshared() {
    use fractional_index::AlphabetCache;

    let shared = AlphabetCache::new();
    let factory_one: KeyFactory = KeyFactory::new(
        FactoryConfig::string("0123456789", "ABCabc").with_cache(shared.clone()),
    )
    .unwrap();
    let factory_two: KeyFactory = KeyFactory::new(
        FactoryConfig::string("0123456789", "ABCabc").with_cache(shared),
    )
    .unwrap();
    let factory_three: KeyFactory =
        KeyFactory::new(FactoryConfig::string("0123456789", "ABCabc")).unwrap();

    let k1 = between(&factory_one, None, None);
    let k2 = between(&factory_two, None, None);
    let k3 = between(&factory_three, None, None);
    assert_eq!(k1, k2);
    assert_eq!(k2, k3);
}

#[test]
fn repeated_insertion_at_the_same_point_keeps_growing_without_reordering() {
    let factory: KeyFactory = KeyFactory::new(
        FactoryConfig::binary().with_max_length(64).with_max_retries(1),
    )
    .unwrap();

    let mut keys = factory
        .generate_n_keys_between(None, None, 3, 0)
        .next()
        .unwrap()
        .unwrap();
    let (mut a, mut b, mut c) = (
        keys.remove(0),
        keys.remove(0),
        keys.remove(0),
    );

    let mut max_len_seen = c.len();
    for i in 0..2000 {
        match factory.generate_key_between(Some(&a), Some(&b), 0).next().unwrap() {
            Ok(new_c) => {
                assert!(a < new_c && new_c < b, "iteration {i} broke ordering");
                c = new_c;
            }
            Err(Error::MaxLengthExceeded { .. }) => break,
            Err(other) => panic!("unexpected error at iteration {i}: {other:?}"),
        }
        match factory.generate_key_between(Some(&a), Some(&c), 0).next().unwrap() {
            Ok(new_b) => {
                assert!(a < new_b && new_b < c, "iteration {i} broke ordering");
                b = new_b;
            }
            Err(Error::MaxLengthExceeded { .. }) => break,
            Err(other) => panic!("unexpected error at iteration {i}: {other:?}"),
        }
        max_len_seen = max_len_seen.max(b.len()).max(c.len());
    }
    assert!(max_len_seen > 2, "lengths should have grown from repeated midpoint insertion");
}
