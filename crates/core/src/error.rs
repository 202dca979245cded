//! Error types for xstakeoff.
//!
//! Failures raised by a [`WordSource`](crate::source::WordSource) or
//! [`DrawingSource`](crate::source::DrawingSource) are not wrapped here; they
//! travel through the core unchanged via each source's associated `Error` type.

use thiserror::Error;

/// Primary error type for settings validation and document handling.
#[derive(Error, Debug)]
pub enum TakeoffError {
    #[error("invalid setting {name}: {value}")]
    InvalidSettings { name: &'static str, value: f64 },

    #[error("page index {index} out of range (document has {count} page(s))")]
    PageOutOfRange { index: usize, count: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for TakeoffError.
pub type Result<T> = std::result::Result<T, TakeoffError>;
