use crate::{Generator, GeneratorError};
use snip_core::ShortCode;

/// A deterministic short code generator backed by a sequential counter.
///
/// Produces codes like "sn000000", "sn000001". Useful in tests where
/// predictable codes matter; never in production, where codes must be
/// unpredictable.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: std::sync::atomic::AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(
                self.counter.load(std::sync::atomic::Ordering::SeqCst),
            ),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(0),
            prefix: prefix.into(),
        }
    }

    /// Creates a new sequential generator starting from a specific
    /// counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        let count = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(ShortCode::new_unchecked(format!(
            "{}{:06}",
            self.prefix, count
        )))
    }
}
