#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod coerce;
pub mod error;
pub mod factor;
pub mod fetch;
pub mod table;

pub use error::{DataError, Result, TableError};
pub use factor::{Factor, FactorRow, PeriodKey};
pub use table::{CleanTable, RawTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
