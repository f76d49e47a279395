#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capm-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod export;
pub use export::{
    export_report, read_returns_csv, report_file_name, returns_file_name, write_report_csv,
    write_returns_csv,
};

mod universe;
pub use universe::{FALLBACK_TICKERS, Universe, UniverseSource};

mod error;
pub use error::UtilsError;
