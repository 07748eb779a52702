//! Error types for dataset views.

use famafrench_output::PresentError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for dataset views.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors raised while deriving or presenting a view.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// The presenter could not render the view.
    #[error("Present error: {0}")]
    Present(#[from] PresentError),
}
