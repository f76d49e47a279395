//! History window and sampling interval.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Error returned when a period or interval string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} `{value}` (expected one of: {expected})")]
pub struct ParseHorizonError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Length of the price history used for the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Period {
    /// One year.
    #[display("1y")]
    #[serde(rename = "1y")]
    OneYear,
    /// Two years.
    #[display("2y")]
    #[serde(rename = "2y")]
    TwoYears,
    /// Three years.
    #[display("3y")]
    #[serde(rename = "3y")]
    ThreeYears,
    /// Five years.
    #[default]
    #[display("5y")]
    #[serde(rename = "5y")]
    FiveYears,
    /// Ten years.
    #[display("10y")]
    #[serde(rename = "10y")]
    TenYears,
    /// Twenty years.
    #[display("20y")]
    #[serde(rename = "20y")]
    TwentyYears,
}

impl Period {
    /// All supported periods, shortest first.
    pub const ALL: [Self; 6] = [
        Self::OneYear,
        Self::TwoYears,
        Self::ThreeYears,
        Self::FiveYears,
        Self::TenYears,
        Self::TwentyYears,
    ];

    /// Vendor range code, e.g. `"5y"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::ThreeYears => "3y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::TwentyYears => "20y",
        }
    }

    /// Number of years covered.
    #[must_use]
    pub const fn years(&self) -> u32 {
        match self {
            Self::OneYear => 1,
            Self::TwoYears => 2,
            Self::ThreeYears => 3,
            Self::FiveYears => 5,
            Self::TenYears => 10,
            Self::TwentyYears => 20,
        }
    }
}

impl FromStr for Period {
    type Err = ParseHorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == wanted).ok_or_else(|| ParseHorizonError {
            kind: "period",
            value: s.to_string(),
            expected: "1y, 2y, 3y, 5y, 10y, 20y",
        })
    }
}

/// Sampling interval of the price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Interval {
    /// Daily bars.
    #[display("1d")]
    #[serde(rename = "1d")]
    Daily,
    /// Weekly bars.
    #[display("1wk")]
    #[serde(rename = "1wk")]
    Weekly,
    /// Monthly bars.
    #[default]
    #[display("1mo")]
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    /// All supported intervals.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Vendor interval code, e.g. `"1mo"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

impl FromStr for Interval {
    type Err = ParseHorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        // Accept the long names the dashboard used as labels.
        let code = match wanted.as_str() {
            "daily" => "1d",
            "weekly" => "1wk",
            "monthly" => "1mo",
            other => other,
        };
        Self::ALL.into_iter().find(|i| i.as_str() == code).ok_or_else(|| ParseHorizonError {
            kind: "interval",
            value: s.to_string(),
            expected: "1d, 1wk, 1mo",
        })
    }
}
