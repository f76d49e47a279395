#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capm-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{AnalysisConfig, DEFAULT_INDEX, DEFAULT_RISK_FREE_ANNUAL, MONTHS_PER_YEAR};

mod returns;
pub use returns::{DATE_COLUMN, ReturnsTable, SampleKey};

mod beta;
pub use beta::{BetaEntry, BetaEstimator, BetaTable};

mod capm;
pub use capm::{CapmEntry, CapmModel, CapmTable};

mod analysis;
pub use analysis::{AnalysisOutcome, CapmAnalysis, IssueStage, NoDataReason, SymbolIssue};

mod report;
pub use report::{
    AnalysisReport, EXPECTED_RETURN_COLUMN, MARKET_CAP_COLUMN, ReportRow, TICKER_COLUMN,
    VENDOR_BETA_COLUMN,
};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use capm_traits::MarketDataProvider;

    pub use super::{AnalysisConfig, AnalysisOutcome, AnalysisReport, CapmAnalysis, ModelError};
}
