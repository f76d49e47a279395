//! Ticker and vendor metadata definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Stock or index ticker symbol, e.g. `AAPL` or `^GSPC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a new symbol.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Create a symbol from user input: trimmed and upper-cased.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn normalized(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_ascii_uppercase())) }
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this symbol names a market index (Yahoo `^` convention).
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.0.starts_with('^')
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar metadata reported by the market-data vendor for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    /// Beta as published by the vendor.
    pub beta: Option<f64>,
    /// Market capitalization in the quote currency.
    pub market_cap: Option<f64>,
}

impl TickerProfile {
    /// Create a new profile.
    #[must_use]
    pub const fn new(beta: Option<f64>, market_cap: Option<f64>) -> Self {
        Self { beta, market_cap }
    }

    /// Market capitalization in billions.
    #[must_use]
    pub fn market_cap_billions(&self) -> Option<f64> {
        self.market_cap.map(|cap| cap / 1e9)
    }
}
