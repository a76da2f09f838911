//! Query error types.

use thiserror::Error;

/// Errors a single recommendation query can fail with.
///
/// None of them affect the shared catalog; the caller may report the error
/// and carry on with the next query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The genre is not in the supported list.
    #[error("unsupported genre {genre:?} (supported: {supported})")]
    UnsupportedGenre { genre: String, supported: String },

    /// The target vector has the wrong length or a non-finite value.
    #[error("invalid target features: {0}")]
    InvalidTarget(#[source] timbre_core::Error),

    /// The retrieval options are out of range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl QueryError {
    /// Returns `true` when the caller supplied bad query input, as opposed to
    /// a misconfigured recommender.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::UnsupportedGenre { .. } | Self::InvalidTarget(_))
    }
}

/// Convenience alias for query results.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
