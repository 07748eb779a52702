#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod presenter;

pub use chart::{Chart, Line, LineStyle, ReferenceLine};
pub use export::{ExportError, ExportFormat, Exporter, records_to_csv};
pub use presenter::{CsvPresenter, PresentError, Presenter, TextPresenter};
