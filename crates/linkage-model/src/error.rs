//! Error types for model construction and kinematic queries.

use thiserror::Error;

/// Errors surfaced by model building and by every kinematic entry point.
///
/// All checks run before any `Data` field is written, so an `Err` leaves the
/// caller's data exactly as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A vector or matrix argument has the wrong size.
    #[error("{what}: expected size {expected}, got {actual}")]
    DimensionMismatch {
        /// Which argument was wrong (`"q"`, `"v"`, `"J columns"`, ...).
        what: &'static str,
        /// Size required by the model.
        expected: usize,
        /// Size that was passed.
        actual: usize,
    },

    /// A joint or frame index is outside the model.
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        /// Kind of index (`"joint"` or `"frame"`).
        what: &'static str,
        /// Offending index.
        index: usize,
        /// Number of valid entries.
        len: usize,
    },

    /// The model description is inconsistent.
    #[error("invalid model: {reason}")]
    InvalidModel {
        /// Description of the inconsistency.
        reason: String,
    },
}

impl Error {
    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Create an out-of-range index error.
    #[must_use]
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfRange { what, index, len }
    }

    /// Create an invalid model error.
    #[must_use]
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Check if this is an index error.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Check if this is a size error.
    #[must_use]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
