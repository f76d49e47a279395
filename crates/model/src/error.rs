//! Error types for the CAPM model.

use capm_math::MathError;
use capm_traits::ProviderError;

/// Errors that can occur while building or evaluating a CAPM analysis.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Provider error outside the per-symbol recovery path.
    #[error("market data error: {0}")]
    Provider(#[from] ProviderError),

    /// The market index history could not be fetched.
    #[error("index {symbol} unavailable")]
    IndexUnavailable {
        /// Index symbol.
        symbol: String,
        /// Underlying provider failure.
        #[source]
        source: ProviderError,
    },

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Too few observations for a series.
    #[error("insufficient data for {symbol}: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Series symbol.
        symbol: String,
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// A symbol has no return on some rows of the index date axis.
    #[error("{symbol} has no return on {missing} of {rows} index periods")]
    MissingReturns {
        /// Series symbol.
        symbol: String,
        /// Rows without a return.
        missing: usize,
        /// Rows in the table.
        rows: usize,
    },

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Two derived tables were computed from different returns samples.
    #[error("sample mismatch: expected {expected}, got {actual}")]
    SampleMismatch {
        /// Sample the caller is working against.
        expected: String,
        /// Sample the offending table was computed from.
        actual: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading configuration.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Returns whether this error only affects a single symbol.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_recoverable(),
            Self::InsufficientData { .. } | Self::MissingReturns { .. } => true,
            _ => false,
        }
    }
}
