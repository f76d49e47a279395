//! Beta estimation against the market index.

use capm_math::{beta, round_to};
use capm_primitives::Symbol;
use ndarray::Array1;
use polars::prelude::*;

use crate::{AnalysisConfig, ModelError, ReturnsTable, SampleKey, TICKER_COLUMN};

/// Beta of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct BetaEntry {
    /// Symbol.
    pub symbol: Symbol,
    /// Rounded beta, `None` when it could not be estimated.
    pub beta: Option<f64>,
    /// Number of index periods with a return for the symbol.
    pub observations: usize,
    /// Why the beta is missing, if it is.
    pub reason: Option<String>,
}

/// Betas of every symbol in a returns table, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct BetaTable {
    sample: SampleKey,
    entries: Vec<BetaEntry>,
}

impl BetaTable {
    /// Sample the betas were estimated on.
    #[must_use]
    pub const fn sample(&self) -> &SampleKey {
        &self.sample
    }

    /// Entries in returns-table column order.
    #[must_use]
    pub fn entries(&self) -> &[BetaEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Beta of a symbol, if estimated.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.entries.iter().find(|e| &e.symbol == symbol).and_then(|e| e.beta)
    }

    /// Two-column frame `Ticker | <beta_column>`.
    ///
    /// # Errors
    /// Returns a polars error if the frame cannot be built.
    pub fn to_frame(&self, beta_column: &str) -> Result<DataFrame, ModelError> {
        let symbols: Vec<&str> = self.entries.iter().map(|e| e.symbol.as_str()).collect();
        let betas: Vec<Option<f64>> = self.entries.iter().map(|e| e.beta).collect();

        Ok(DataFrame::new(vec![
            Column::new(TICKER_COLUMN.into(), symbols),
            Column::new(beta_column.into(), betas),
        ])?)
    }
}

/// Estimates `Cov(asset, market) / Var(market)` for each symbol column.
///
/// Both moments use the same delta degrees of freedom and every row of the
/// returns table. A symbol without a return on some index period gets no beta.
#[derive(Debug, Clone, Copy)]
pub struct BetaEstimator {
    ddof: u8,
    decimals: u32,
}

impl BetaEstimator {
    /// Create an estimator with sample moments and 3 decimal places.
    #[must_use]
    pub const fn new() -> Self {
        Self { ddof: 1, decimals: 3 }
    }

    /// Create an estimator from the analysis configuration.
    #[must_use]
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self { ddof: config.ddof, decimals: config.decimals }
    }

    /// Estimate the beta of every symbol in `returns`.
    ///
    /// A symbol whose beta cannot be estimated (a gap in its returns, too few
    /// periods, a flat market) gets `None` and a reason; it does not fail
    /// the table.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if the index column is absent.
    pub fn estimate(&self, returns: &ReturnsTable) -> Result<BetaTable, ModelError> {
        let mut entries = Vec::new();

        for symbol in returns.symbols() {
            let entry = match returns.aligned(&symbol) {
                Ok((asset, market)) => self.entry(symbol, &asset, &market),
                Err(err) if err.is_recoverable() => {
                    let observations = returns.column(&symbol)?.iter().flatten().count();
                    log::warn!("no beta for {symbol}: {err}");
                    BetaEntry { symbol, beta: None, observations, reason: Some(err.to_string()) }
                }
                Err(err) => return Err(err),
            };
            entries.push(entry);
        }

        Ok(BetaTable { sample: returns.sample().clone(), entries })
    }

    fn entry(&self, symbol: Symbol, asset: &Array1<f64>, market: &Array1<f64>) -> BetaEntry {
        let observations = asset.len();
        match beta(asset, market, self.ddof) {
            Ok(value) => BetaEntry {
                symbol,
                beta: Some(round_to(value, self.decimals)),
                observations,
                reason: None,
            },
            Err(err) => {
                log::warn!("no beta for {symbol} ({observations} observations): {err}");
                BetaEntry { symbol, beta: None, observations, reason: Some(err.to_string()) }
            }
        }
    }
}

impl Default for BetaEstimator {
    fn default() -> Self {
        Self::new()
    }
}
