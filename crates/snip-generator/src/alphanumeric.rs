use crate::{Generator, GeneratorError, DEFAULT_CODE_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;
use snip_core::ShortCode;

/// The 62-character alphabet generated codes are drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// Largest multiple of the alphabet size that fits in a byte. Bytes at or
// above this bound are discarded; keeping them would skew the draw
// towards the first few alphabet entries.
const REJECTION_BOUND: u8 = 248;

/// Generates fixed-length random codes from the alphanumeric alphabet.
///
/// Each character is sampled uniformly from the OS random source, so
/// codes are unpredictable. Uniqueness is probabilistic: 62^8
/// combinations at the default length, with no check against
/// already-allocated codes.
#[derive(Debug, Clone)]
pub struct AlphanumericGenerator {
    length: usize,
}

impl AlphanumericGenerator {
    /// Creates a generator producing codes of the given length.
    pub fn new(length: usize) -> Self {
        assert!(length > 0, "code length must be positive");
        Self { length }
    }

    /// Returns the length of the codes this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for AlphanumericGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl Generator for AlphanumericGenerator {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        let mut code = String::with_capacity(self.length);
        let mut buf = [0u8; 64];

        while code.len() < self.length {
            OsRng
                .try_fill_bytes(&mut buf)
                .map_err(|e| GeneratorError::Entropy(e.to_string()))?;

            for &byte in buf.iter() {
                if byte >= REJECTION_BOUND {
                    continue;
                }
                code.push(ALPHABET[usize::from(byte % ALPHABET.len() as u8)] as char);
                if code.len() == self.length {
                    break;
                }
            }
        }

        Ok(ShortCode::new_unchecked(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_have_requested_length() {
        for length in [1, 4, 8, 16, 32] {
            let generator = AlphanumericGenerator::new(length);
            let code = generator.generate().unwrap();
            assert_eq!(code.as_str().len(), length);
        }
    }

    #[test]
    fn codes_stay_within_alphabet() {
        let generator = AlphanumericGenerator::new(64);
        let code = generator.generate().unwrap();
        assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn default_length_is_eight() {
        let generator = AlphanumericGenerator::default();
        assert_eq!(generator.generate().unwrap().as_str().len(), 8);
    }

    // Uniqueness is probabilistic, not guaranteed; a duplicate in a
    // 1000-sample run of 62^8 possibilities indicates a broken sampler.
    #[test]
    fn sampled_codes_are_distinct() {
        let generator = AlphanumericGenerator::default();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generator.generate().unwrap()));
        }
    }

    #[test]
    #[should_panic(expected = "code length must be positive")]
    fn zero_length_is_rejected() {
        AlphanumericGenerator::new(0);
    }
}
