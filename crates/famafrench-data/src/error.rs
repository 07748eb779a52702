//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while acquiring, loading or caching factor data.
///
/// Malformed individual fields are not errors: they are coerced to
/// [`Coerced::Missing`](crate::coerce::Coerced::Missing) and removed when the
/// table is cleaned. Every variant here aborts dataset construction.
#[derive(Debug, Error)]
pub enum DataError {
    /// Remote fetch or archive extraction failed
    #[error("could not download or unzip {resource}: {reason}")]
    Acquisition {
        /// Resource that was being fetched
        resource: String,
        /// Underlying failure
        reason: String,
    },

    /// Downloaded content could not be parsed or cleaned into a factor table
    #[error("could not load or clean {resource}: {reason}")]
    Load {
        /// Resource whose payload was being parsed
        resource: String,
        /// Underlying failure
        reason: String,
    },

    /// An existing cache artifact is not a well-formed factor table
    #[error("existing cache artifact {} is not formatted correctly: {reason}", path.display())]
    Format {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// The cleaned table could not be written to the cache
    #[error("could not persist cache artifact {}: {reason}", path.display())]
    Persist {
        /// Target path of the artifact
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a set of rows does not form a valid [`CleanTable`](crate::table::CleanTable).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// No rows survived
    #[error("table has no complete rows")]
    Empty,

    /// A period key appears more than once
    #[error("duplicate period key {0}")]
    DuplicateKey(crate::factor::PeriodKey),

    /// A value is NaN or infinite
    #[error("non-finite value in period {0}")]
    NonFinite(crate::factor::PeriodKey),
}

impl DataError {
    pub(crate) fn acquisition(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Acquisition {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn load(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persist {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
