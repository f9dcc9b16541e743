use rand::{rng, Rng};

use crate::models::ShortKey;

/// Symbols a short key is drawn from (a-z, A-Z, 0-9)
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of characters in a generated key
pub const DEFAULT_KEY_LENGTH: usize = 6;

/// Source of fresh short keys for the store
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> ShortKey;
}

/// Draws each character independently and uniformly from [`ALPHABET`]
#[derive(Debug, Clone)]
pub struct RandomKeyGenerator {
    length: usize,
}

impl RandomKeyGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> ShortKey {
        ShortKey::from(generate_short_id(self.length))
    }
}

/// Generates a random alphanumeric id of exactly `length` characters
pub fn generate_short_id(length: usize) -> String {
    let mut rng = rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_62_distinct_symbols() {
        let mut symbols = ALPHABET.to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 62);
        assert!(symbols.iter().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_ids_have_requested_length() {
        for length in [1, 6, 12] {
            let id = generate_short_id(length);
            assert_eq!(id.len(), length);
            assert!(id.bytes().all(|c| ALPHABET.contains(&c)));
        }
    }

    #[test]
    fn test_random_generator_defaults_to_six_characters() {
        let generator = RandomKeyGenerator::default();
        for _ in 0..100 {
            let key = generator.generate();
            assert_eq!(key.as_str().len(), 6);
            assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
