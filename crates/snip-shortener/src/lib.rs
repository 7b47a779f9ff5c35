//! URL shortener service implementation.
//!
//! This crate combines a mapping store and a code generator into the
//! create/resolve/regenerate/delete workflows exposed over HTTP.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenError;
pub use service::ShortenerService;
pub use shortener::{ShortenedUrl, Shortener};
