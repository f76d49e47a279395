//! CAPM expected returns.
//!
//! `E[r_a] = rf + beta_a * (E[r_m] - rf)`, with `E[r_m]` the arithmetic mean
//! of the index returns in the sample and `rf` the monthly-equivalent
//! risk-free rate. Results are expressed in percent.

use capm_math::{mean, periodic_rate, round_to};
use capm_primitives::Symbol;

use crate::{
    AnalysisConfig, BetaTable, DEFAULT_RISK_FREE_ANNUAL, MONTHS_PER_YEAR, ModelError,
    ReturnsTable, SampleKey,
};

/// Expected return of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct CapmEntry {
    /// Symbol.
    pub symbol: Symbol,
    /// Beta the expected return was computed from.
    pub beta: Option<f64>,
    /// Expected monthly return in percent, rounded.
    pub expected_return_pct: Option<f64>,
}

/// Expected returns for every symbol of a beta table, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct CapmTable {
    sample: SampleKey,
    market_mean: f64,
    risk_free: f64,
    entries: Vec<CapmEntry>,
}

impl CapmTable {
    /// Sample the table was computed from.
    #[must_use]
    pub const fn sample(&self) -> &SampleKey {
        &self.sample
    }

    /// Mean index return per period.
    #[must_use]
    pub const fn market_mean(&self) -> f64 {
        self.market_mean
    }

    /// Monthly risk-free rate used.
    #[must_use]
    pub const fn risk_free(&self) -> f64 {
        self.risk_free
    }

    /// Entries in beta-table order.
    #[must_use]
    pub fn entries(&self) -> &[CapmEntry] {
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

    /// Expected return of a symbol in percent, if available.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.entries.iter().find(|e| &e.symbol == symbol).and_then(|e| e.expected_return_pct)
    }
}

/// CAPM with a fixed annual risk-free rate converted to a monthly rate.
#[derive(Debug, Clone, Copy)]
pub struct CapmModel {
    risk_free_annual: f64,
    decimals: u32,
}

impl CapmModel {
    /// Create a model with the given annual risk-free rate and 3 decimal places.
    #[must_use]
    pub const fn new(risk_free_annual: f64) -> Self {
        Self { risk_free_annual, decimals: 3 }
    }

    /// Create a model from the analysis configuration.
    #[must_use]
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self { risk_free_annual: config.risk_free_annual, decimals: config.decimals }
    }

    /// Monthly-equivalent risk-free rate, `(1 + rf)^(1/12) - 1`.
    #[must_use]
    pub fn monthly_risk_free(&self) -> f64 {
        periodic_rate(self.risk_free_annual, MONTHS_PER_YEAR)
    }

    /// Unrounded expected return in percent for a beta and a mean market return.
    #[must_use]
    pub fn expected_return_pct(&self, beta: f64, market_mean: f64) -> f64 {
        let rf = self.monthly_risk_free();
        (rf + beta * (market_mean - rf)) * 100.0
    }

    /// Expected returns for every entry of `betas`.
    ///
    /// # Errors
    /// Returns `ModelError::SampleMismatch` if `betas` was not estimated on
    /// `returns`, or a math error if the index has no returns.
    pub fn estimate(&self, returns: &ReturnsTable, betas: &BetaTable) -> Result<CapmTable, ModelError> {
        if betas.sample() != returns.sample() {
            return Err(ModelError::SampleMismatch {
                expected: returns.sample().to_string(),
                actual: betas.sample().to_string(),
            });
        }

        let market_mean = mean(&returns.market_returns()?)?;
        let entries = betas
            .entries()
            .iter()
            .map(|entry| CapmEntry {
                symbol: entry.symbol.clone(),
                beta: entry.beta,
                expected_return_pct: entry
                    .beta
                    .map(|b| round_to(self.expected_return_pct(b, market_mean), self.decimals)),
            })
            .collect();

        Ok(CapmTable {
            sample: returns.sample().clone(),
            market_mean,
            risk_free: self.monthly_risk_free(),
            entries,
        })
    }
}

impl Default for CapmModel {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_ANNUAL)
    }
}
