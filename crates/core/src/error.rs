//! Typed error types for the label engine.

use thiserror::Error;

/// Failure reported by a [`Catalog`](crate::Catalog) implementation.
///
/// A code that is simply absent from the catalog is *not* an error; lookups
/// return `Ok(None)` for that case.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be read.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A stored record violates the material invariants.
    #[error("invalid material record {code:?}: {reason}")]
    InvalidRecord {
        /// Material code of the offending record.
        code: String,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Errors raised while building label content.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// A soup label was handed to the generator without a batch code.
    #[error("soup label {code:?} requires a batch code")]
    MissingBatchCode {
        /// Material code of the label.
        code: String,
    },

    /// A layout parameter is outside its documented range.
    #[error("invalid layout {field}: {reason}")]
    InvalidLayout {
        /// Name of the layout field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// A batch code component is missing.
    #[error("invalid batch code: {0}")]
    InvalidBatchCode(String),
}
