//! Data pipeline for resolving the factor dataset and writing its views.
//!
//! Wraps cache resolution in a spinner and routes the views to stdout or
//! files in the requested format.

use super::cache_manager::{CacheOptions, CliCache, open_cache};
use famafrench::output::{ExportError, ExportFormat, Exporter, PresentError};
use famafrench::{DatasetBounds, DatasetError, FactorDataset, PeriodKey};
use famafrench_data::cache::CacheStatus;
use famafrench_data::error::DataError;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::PolarsError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Acquisition, cleaning or cache failure.
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    /// Summary or cumulative value failure.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    /// Export failure.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    /// Presenter failure.
    #[error("Present error: {0}")]
    Present(#[from] PresentError),
    /// Output path without a recognizable format.
    #[error("cannot infer an export format from {0}; pass --format")]
    UnknownFormat(PathBuf),
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Resolve the dataset through the cache, showing progress on stderr.
pub(crate) fn load_dataset(options: &CacheOptions) -> Result<FactorDataset, DataPipelineError> {
    let cache = open_cache(options)?;
    let pb = spinner();
    match cache.lookup() {
        CacheStatus::Hit(path) => pb.set_message(format!("Loading {}...", path.display())),
        CacheStatus::Miss(_) => pb.set_message("Downloading Fama/French factors..."),
    }

    match FactorDataset::load(&cache, DatasetBounds::default()) {
        Ok(dataset) => {
            pb.finish_and_clear();
            info!(
                monthly = dataset.monthly_rows().len(),
                annual = dataset.annual_rows().len(),
                "dataset ready"
            );
            Ok(dataset)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

/// Print the cache location and the artifacts it holds.
pub(crate) fn print_cache_info(cache: &CliCache) -> Result<(), DataPipelineError> {
    println!("Cache location: {}", cache.config().dir.display());
    let artifacts = cache.list_artifacts()?;
    if artifacts.is_empty() {
        println!("  (empty)");
    }
    let current = cache.key();
    for artifact in artifacts {
        let marker = if artifact.key == current { " (current)" } else { "" };
        println!("  {}  {}{marker}", artifact.key, artifact.path.display());
    }
    Ok(())
}

/// Pick the export format from an explicit choice or the path extension.
pub(crate) fn resolve_format(
    path: &Path,
    explicit: Option<ExportFormat>,
) -> Result<ExportFormat, DataPipelineError> {
    explicit
        .or_else(|| ExportFormat::from_path(path))
        .ok_or_else(|| DataPipelineError::UnknownFormat(path.to_path_buf()))
}

/// Sibling of `out` holding the summary, e.g. `factors-summary.csv`.
pub(crate) fn summary_path(out: &Path, format: ExportFormat) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("famafrench");
    out.with_file_name(format!("{stem}-summary.{}", format.extension()))
}

/// Write the monthly view from `start` and the annual summary next to it.
///
/// Returns the two paths written.
pub(crate) fn export_dataset(
    dataset: &FactorDataset,
    start: PeriodKey,
    out: &Path,
    format: ExportFormat,
) -> Result<(PathBuf, PathBuf), DataPipelineError> {
    dataset.monthly(start).export_to_file(out, format)?;
    let summary = summary_path(out, format);
    dataset.summary()?.export_to_file(&summary, format)?;
    info!(monthly = %out.display(), summary = %summary.display(), "exported dataset");
    Ok((out.to_path_buf(), summary))
}
