//! Discriminator generation.
//!
//! Discriminators are drawn uniformly from the 62-symbol short key alphabet
//! using the thread-local CSPRNG. They are not unique across links: only the
//! `(id, discriminator)` pair is, and the store guarantees `id` uniqueness.

use crate::utils::short_key::{ALPHABET, DISCRIMINATOR_LEN};
use rand::Rng;

/// Generates a fresh random 2-character discriminator.
///
/// # Examples
///
/// ```ignore
/// let d = generate_discriminator();
/// assert_eq!(d.len(), 2);
/// assert!(d.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_discriminator() -> String {
    let mut rng = rand::rng();

    (0..DISCRIMINATOR_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::short_key::is_discriminator;
    use std::collections::HashSet;

    #[test]
    fn test_generate_discriminator_has_correct_length() {
        assert_eq!(generate_discriminator().len(), DISCRIMINATOR_LEN);
    }

    #[test]
    fn test_generate_discriminator_alphanumeric() {
        for _ in 0..1000 {
            let d = generate_discriminator();
            assert!(is_discriminator(&d), "unexpected discriminator {d}");
        }
    }

    #[test]
    fn test_generate_discriminator_covers_alphabet() {
        let mut seen = HashSet::new();

        for _ in 0..20_000 {
            seen.extend(generate_discriminator().chars());
        }

        assert_eq!(seen.len(), ALPHABET.len());
    }
}
