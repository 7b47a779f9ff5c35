//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the shared vocabulary used by the storage
//! backends, the shortener service, and the HTTP gateway.

pub mod error;
pub mod mapping;
pub mod shortcode;
pub mod store;

pub use error::{CoreError, StorageError};
pub use mapping::{format_timestamp, UrlMapping};
pub use shortcode::ShortCode;
pub use store::{ReadUrlStore, UrlStore};
