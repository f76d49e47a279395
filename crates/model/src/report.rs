//! Final per-symbol table.

use std::{collections::HashMap, fmt};

use capm_math::round_to;
use capm_primitives::{Symbol, TickerProfile};
use polars::prelude::*;

use crate::{AnalysisConfig, BetaTable, CapmTable, ModelError, ReturnsTable, SymbolIssue};

/// Header of the symbol column.
pub const TICKER_COLUMN: &str = "Ticker";
/// Header of the expected return column.
pub const EXPECTED_RETURN_COLUMN: &str = "Expected Monthly Returns (%)";
/// Header of the vendor beta column.
pub const VENDOR_BETA_COLUMN: &str = "Beta (vendor-reported)";
/// Header of the market capitalization column.
pub const MARKET_CAP_COLUMN: &str = "Market Cap (in $B)";

/// One line of the final table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Symbol.
    pub symbol: Symbol,
    /// Expected monthly return in percent.
    pub expected_return_pct: Option<f64>,
    /// Beta estimated from the returns table.
    pub beta: Option<f64>,
    /// Beta published by the vendor.
    pub vendor_beta: Option<f64>,
    /// Market capitalization in billions.
    pub market_cap_billions: Option<f64>,
}

/// Result of a complete analysis run.
///
/// Holds the intermediate tables next to the merged rows so that they can be
/// exported, and the per-symbol failures that were recovered along the way.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    config: AnalysisConfig,
    requested: usize,
    returns: ReturnsTable,
    betas: BetaTable,
    capm: CapmTable,
    rows: Vec<ReportRow>,
    issues: Vec<SymbolIssue>,
}

impl AnalysisReport {
    /// Merge the beta and CAPM tables on symbol and attach vendor metadata.
    ///
    /// `requested` is the number of symbols the run was asked for.
    ///
    /// # Errors
    /// Returns `ModelError::SampleMismatch` if the beta or CAPM table was not
    /// computed from `returns`.
    pub fn assemble(
        config: AnalysisConfig,
        requested: usize,
        returns: ReturnsTable,
        betas: BetaTable,
        capm: CapmTable,
        profiles: &HashMap<Symbol, TickerProfile>,
        issues: Vec<SymbolIssue>,
    ) -> Result<Self, ModelError> {
        for sample in [betas.sample(), capm.sample()] {
            if sample != returns.sample() {
                return Err(ModelError::SampleMismatch {
                    expected: returns.sample().to_string(),
                    actual: sample.to_string(),
                });
            }
        }

        let expected: HashMap<&Symbol, Option<f64>> =
            capm.entries().iter().map(|e| (&e.symbol, e.expected_return_pct)).collect();

        let rows = betas
            .entries()
            .iter()
            .map(|entry| {
                let profile = profiles.get(&entry.symbol);
                ReportRow {
                    symbol: entry.symbol.clone(),
                    expected_return_pct: expected.get(&entry.symbol).copied().flatten(),
                    beta: entry.beta,
                    vendor_beta: profile.and_then(|p| p.beta),
                    market_cap_billions: profile
                        .and_then(TickerProfile::market_cap_billions)
                        .map(|cap| round_to(cap, config.decimals)),
                }
            })
            .collect();

        Ok(Self { config, requested, returns, betas, capm, rows, issues })
    }

    /// Configuration of the run.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Number of symbols the run was asked for.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Aligned returns table.
    #[must_use]
    pub const fn returns(&self) -> &ReturnsTable {
        &self.returns
    }

    /// Estimated betas.
    #[must_use]
    pub const fn betas(&self) -> &BetaTable {
        &self.betas
    }

    /// Expected returns.
    #[must_use]
    pub const fn capm(&self) -> &CapmTable {
        &self.capm
    }

    /// Merged rows in returns-table column order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Per-symbol failures recovered during the run.
    #[must_use]
    pub fn issues(&self) -> &[SymbolIssue] {
        &self.issues
    }

    /// Row of a symbol.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&ReportRow> {
        self.rows.iter().find(|row| &row.symbol == symbol)
    }

    /// The final table as a frame: `Ticker`, expected return, estimated beta,
    /// vendor beta and market cap.
    ///
    /// # Errors
    /// Returns a polars error if the frame cannot be built.
    pub fn to_frame(&self) -> Result<DataFrame, ModelError> {
        let column = |name: &str, f: fn(&ReportRow) -> Option<f64>| {
            Column::new(name.into(), self.rows.iter().map(f).collect::<Vec<_>>())
        };
        let symbols: Vec<&str> = self.rows.iter().map(|row| row.symbol.as_str()).collect();

        Ok(DataFrame::new(vec![
            Column::new(TICKER_COLUMN.into(), symbols),
            column(EXPECTED_RETURN_COLUMN, |row| row.expected_return_pct),
            column(&self.config.beta_column(), |row| row.beta),
            column(VENDOR_BETA_COLUMN, |row| row.vendor_beta),
            column(MARKET_CAP_COLUMN, |row| row.market_cap_billions),
        ])?)
    }
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let beta_column = self.config.beta_column();
        writeln!(
            f,
            "{:<8} {:>28} {:>14} {:>22} {:>18}",
            TICKER_COLUMN, EXPECTED_RETURN_COLUMN, beta_column, VENDOR_BETA_COLUMN, MARKET_CAP_COLUMN
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<8} {:>28} {:>14} {:>22} {:>18}",
                row.symbol.as_str(),
                cell(row.expected_return_pct),
                cell(row.beta),
                cell(row.vendor_beta),
                cell(row.market_cap_billions),
            )?;
        }
        write!(
            f,
            "market mean {:.4}%, risk-free {:.4}% per month, sample {}",
            self.capm.market_mean() * 100.0,
            self.capm.risk_free() * 100.0,
            self.returns.sample()
        )
    }
}
