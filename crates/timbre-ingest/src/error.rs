//! Catalog loading error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent the catalog from loading.
///
/// All of them are fatal: no partially loaded catalog is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The catalog file could not be opened or its header read.
    #[error("cannot read catalog {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row could not be decoded (missing column, bad number, ...).
    #[error("malformed catalog row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A row decoded but holds values the catalog cannot use.
    #[error("invalid catalog row at line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: timbre_core::Error,
    },

    /// Expanding the rows into the catalog failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] timbre_core::Error),
}

impl LoadError {
    /// Returns `true` when the file was readable but its content is bad.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, Self::Open { .. })
    }

    /// The catalog line the error points at, when known.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Row { line, .. } | Self::InvalidRow { line, .. } => Some(*line),
            Self::Open { .. } | Self::Catalog(_) => None,
        }
    }
}

/// Convenience alias for catalog loading results.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
