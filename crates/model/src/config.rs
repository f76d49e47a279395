//! Analysis configuration.

use std::path::Path;

use capm_primitives::{Interval, Period, Symbol};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Market index used when none is configured (S&P 500).
pub const DEFAULT_INDEX: &str = "^GSPC";

/// Annual risk-free rate used when none is configured (Treasury yield, ~4.2%).
pub const DEFAULT_RISK_FREE_ANNUAL: f64 = 0.042;

/// The risk-free rate is always quoted per month.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Immutable settings for one analysis run.
///
/// Every computation takes the configuration by reference; changing the
/// period or interval means building a new value and recomputing all tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Market index the betas are measured against.
    pub index: Symbol,
    /// Length of price history.
    pub period: Period,
    /// Sampling interval.
    pub interval: Interval,
    /// Annual risk-free rate, as a fraction.
    pub risk_free_annual: f64,
    /// Delta degrees of freedom for covariance and variance (0 or 1).
    pub ddof: u8,
    /// Decimal places kept for betas and expected returns.
    pub decimals: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            index: Symbol::new(DEFAULT_INDEX),
            period: Period::default(),
            interval: Interval::default(),
            risk_free_annual: DEFAULT_RISK_FREE_ANNUAL,
            ddof: 1,
            decimals: 3,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration for an index, period and interval with default rates.
    #[must_use]
    pub fn new(index: Symbol, period: Period, interval: Interval) -> Self {
        Self { index, period, interval, ..Self::default() }
    }

    /// Return a copy with a different index.
    #[must_use]
    pub fn with_index(self, index: Symbol) -> Self {
        Self { index, ..self }
    }

    /// Return a copy with a different period.
    #[must_use]
    pub fn with_period(self, period: Period) -> Self {
        Self { period, ..self }
    }

    /// Return a copy with a different interval.
    #[must_use]
    pub fn with_interval(self, interval: Interval) -> Self {
        Self { interval, ..self }
    }

    /// Return a copy with a different annual risk-free rate.
    #[must_use]
    pub fn with_risk_free_annual(self, risk_free_annual: f64) -> Self {
        Self { risk_free_annual, ..self }
    }

    /// Header of the beta column, e.g. `Beta 5y 1mo`.
    #[must_use]
    pub fn beta_column(&self) -> String {
        format!("Beta {} {}", self.period, self.interval)
    }

    /// Check the numeric settings.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` for a risk-free rate that is not
    /// finite or not above -100%, a `ddof` other than 0 or 1, or more than
    /// 12 decimal places.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.risk_free_annual.is_finite() || self.risk_free_annual <= -1.0 {
            return Err(ModelError::InvalidConfig(format!(
                "risk_free_annual must be finite and > -1, got {}",
                self.risk_free_annual
            )));
        }
        if self.ddof > 1 {
            return Err(ModelError::InvalidConfig(format!("ddof must be 0 or 1, got {}", self.ddof)));
        }
        if self.decimals > 12 {
            return Err(ModelError::InvalidConfig(format!(
                "decimals must be at most 12, got {}",
                self.decimals
            )));
        }
        if self.index.as_str().trim().is_empty() {
            return Err(ModelError::InvalidConfig("index symbol is empty".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if the document does not parse or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> Result<Self, ModelError> {
        let config: Self = toml::from_str(s).map_err(|e| ModelError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns `ModelError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.index.as_str(), "^GSPC");
        assert_eq!(config.period, Period::FiveYears);
        assert_eq!(config.interval, Interval::Monthly);
        assert_relative_eq!(config.risk_free_annual, 0.042);
        assert_eq!(config.ddof, 1);
        assert_eq!(config.decimals, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn beta_column_names_run_parameters() {
        let config = AnalysisConfig::default().with_period(Period::TwoYears).with_interval(Interval::Weekly);
        assert_eq!(config.beta_column(), "Beta 2y 1wk");
    }

    #[test]
    fn toml_partial_document_uses_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            index = "^NDX"
            period = "10y"
            interval = "1d"
            "#,
        )
        .unwrap();

        assert_eq!(config.index, Symbol::new("^NDX"));
        assert_eq!(config.period, Period::TenYears);
        assert_eq!(config.interval, Interval::Daily);
        assert_relative_eq!(config.risk_free_annual, DEFAULT_RISK_FREE_ANNUAL);
    }

    #[test]
    fn toml_rejects_unknown_period() {
        let err = AnalysisConfig::from_toml_str(r#"period = "4y""#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig(_)));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(AnalysisConfig::from_toml_str("tickers = 30").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = AnalysisConfig::default().with_risk_free_annual(-1.5);
        assert!(config.validate().is_err());

        let config = AnalysisConfig { ddof: 2, ..AnalysisConfig::default() };
        assert!(config.validate().is_err());

        let config = AnalysisConfig::default().with_risk_free_annual(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "risk_free_annual = 0.05\nddof = 0").unwrap();

        let config = AnalysisConfig::from_toml_file(file.path()).unwrap();
        assert_relative_eq!(config.risk_free_annual, 0.05);
        assert_eq!(config.ddof, 0);
    }

    #[test]
    fn missing_toml_file_is_io_error() {
        let err = AnalysisConfig::from_toml_file("/nonexistent/capm.toml").unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
