#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capm-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod moments;
pub use moments::{beta, covariance, mean, variance};

mod returns;
pub use returns::pct_change;

mod rates;
pub use rates::{periodic_rate, round_to};

mod error;
pub use error::MathError;
