//! # capm
//!
//! CAPM beta and expected-return analysis of equities against a market index.
//!
//! This crate provides a unified interface to the capm workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Symbols, horizons and price series
//! - `traits`: The market data provider abstraction
//! - `math`: Returns, moments, beta and rate conversion
//! - `model`: Returns table, beta and CAPM estimation, the analysis pipeline
//! - `utils`: CSV export and ticker universe loading
//! - `yahoo`: Yahoo Finance provider
//! - `cli`: The `capm` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use capm::model::prelude::*;
//! use capm::yahoo::YahooProvider;
//!
//! let provider = YahooProvider::new()?;
//! let analysis = CapmAnalysis::new(&provider, AnalysisConfig::default())?;
//! if let Some(report) = analysis.run(&["AAPL".into(), "MSFT".into()])?.report() {
//!     println!("{report}");
//! }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use capm_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use capm_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use capm_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use capm_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use capm_utils as utils;
#[cfg(feature = "yahoo")]
#[doc(inline)]
pub use capm_yahoo as yahoo;
