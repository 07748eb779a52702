#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod plot;
pub mod summary;
pub mod views;

// Re-export main types from sub-crates
pub use famafrench_data as data;
pub use famafrench_output as output;

pub use dataset::{DEFAULT_START, DatasetBounds, FIRST_MONTHLY_PERIOD, FIRST_YEAR, FactorDataset};
pub use error::DatasetError;
pub use famafrench_data::{DataError, Factor, FactorRow, PeriodKey};
pub use plot::{FactorSelection, annual_chart};
pub use summary::{SummaryStat, SummaryTable};
pub use views::{CumulativeValue, MonthlyView};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
