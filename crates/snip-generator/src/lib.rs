//! Short code generation.
//!
//! Generators are pure: they never consult storage and make no
//! uniqueness guarantee. Collision handling belongs to the mapping
//! store and the service above it.

pub mod alphanumeric;
pub mod seq;

use snip_core::ShortCode;
use thiserror::Error;

pub use alphanumeric::AlphanumericGenerator;
pub use seq::SeqGenerator;

/// Length of generated short codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 8;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// The OS random source could not produce bytes. The operation
    /// fails; there is no fallback to a weaker source.
    #[error("secure random source unavailable: {0}")]
    Entropy(String),
}

/// Trait for generating short codes.
///
/// Implementations can vary from random generators to sequential
/// counters; none of them interact with storage.
pub trait Generator: Send + Sync + 'static {
    /// Generates the next short code.
    fn generate(&self) -> Result<ShortCode, GeneratorError>;
}
