#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capm-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::{Symbol, TickerProfile};

mod horizon;
pub use horizon::{Interval, ParseHorizonError, Period};

mod series;
pub use series::{PricePoint, PriceSeries};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
