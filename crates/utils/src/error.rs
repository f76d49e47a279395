//! Error types for utility functions.

use capm_model::ModelError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Model error while rebuilding a table.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// The file had no usable rows.
    #[error("no symbols found in {0}")]
    EmptyUniverse(String),
}
