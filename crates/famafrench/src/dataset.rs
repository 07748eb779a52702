//! The factor dataset and its monthly/annual partition.

use crate::error::Result;
use crate::plot::{FactorSelection, annual_chart};
use crate::summary::SummaryTable;
use crate::views::{CumulativeValue, MonthlyView};
use famafrench_data::cache::{Clock, DatasetCache};
use famafrench_data::fetch::RawFetcher;
use famafrench_data::{CleanTable, FactorRow, PeriodKey};
use famafrench_output::Presenter;
use std::fmt;
use tracing::debug;

/// January of the first year with monthly data.
///
/// Keys above it are monthly (`YYYYMM`); keys below it are annual (`YYYY`).
/// A row exactly at this key belongs to neither partition.
pub const FIRST_MONTHLY_PERIOD: PeriodKey = PeriodKey::new(192601);

/// First year covered by the annual rows.
pub const FIRST_YEAR: PeriodKey = PeriodKey::new(FIRST_MONTHLY_PERIOD.get() / 100);

/// First month of published data.
pub const DEFAULT_START: PeriodKey = PeriodKey::new(192607);

/// Date range requested at construction.
///
/// Both bounds are recorded but do not filter either partition; use the
/// `start` arguments of the view methods to slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetBounds {
    /// First period of interest.
    pub start: PeriodKey,
    /// Last period of interest.
    pub end: Option<PeriodKey>,
}

impl Default for DatasetBounds {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: None,
        }
    }
}

/// Cleaned factor returns, split into monthly and annual rows.
#[derive(Debug, Clone)]
pub struct FactorDataset {
    table: CleanTable,
    monthly: Vec<FactorRow>,
    annual: Vec<FactorRow>,
    bounds: DatasetBounds,
}

impl FactorDataset {
    /// Partition a cleaned table.
    pub fn new(table: CleanTable, bounds: DatasetBounds) -> Self {
        let monthly: Vec<FactorRow> = table
            .iter()
            .filter(|r| r.period > FIRST_MONTHLY_PERIOD)
            .copied()
            .collect();
        let annual: Vec<FactorRow> = table
            .iter()
            .filter(|r| r.period < FIRST_MONTHLY_PERIOD)
            .copied()
            .collect();
        debug!(
            monthly = monthly.len(),
            annual = annual.len(),
            "partitioned factor table"
        );

        Self {
            table,
            monthly,
            annual,
            bounds,
        }
    }

    /// Resolve the table through `cache` and partition it.
    ///
    /// # Errors
    /// Propagates every acquisition, load, format and persistence error from
    /// [`DatasetCache::resolve`]; no partial dataset is returned.
    pub fn load<F: RawFetcher, C: Clock>(
        cache: &DatasetCache<F, C>,
        bounds: DatasetBounds,
    ) -> famafrench_data::Result<Self> {
        Ok(Self::new(cache.resolve()?, bounds))
    }

    /// The full cleaned table.
    pub const fn table(&self) -> &CleanTable {
        &self.table
    }

    /// Monthly rows in percent.
    pub fn monthly_rows(&self) -> &[FactorRow] {
        &self.monthly
    }

    /// Annual rows in percent.
    pub fn annual_rows(&self) -> &[FactorRow] {
        &self.annual
    }

    /// Bounds given at construction.
    pub const fn bounds(&self) -> DatasetBounds {
        self.bounds
    }

    /// Mean and sample standard deviation of annual returns, in percent.
    ///
    /// # Errors
    /// Returns an error if the aggregation fails.
    pub fn summary(&self) -> Result<SummaryTable> {
        Ok(SummaryTable::from_rows(&self.annual)?)
    }

    /// Monthly returns from `start` (inclusive), decimalized.
    pub fn monthly(&self, start: PeriodKey) -> MonthlyView {
        MonthlyView::from_rows(&self.monthly, start)
    }

    /// Value of one unit invested at the start of year `start`.
    ///
    /// # Errors
    /// Returns an error if the running product cannot be evaluated.
    pub fn cumulative_value(&self, start: PeriodKey) -> Result<CumulativeValue> {
        Ok(CumulativeValue::from_rows(&self.annual, start)?)
    }

    /// Hand the summary table to `presenter`.
    ///
    /// # Errors
    /// Returns an error if the aggregation or the presenter fails.
    pub fn present_summary<P: Presenter + ?Sized>(&self, presenter: &mut P) -> Result<()> {
        presenter.summary(&self.summary()?.to_string())?;
        Ok(())
    }

    /// Hand the cumulative value of the selected factors to `presenter`.
    ///
    /// # Errors
    /// Returns an error if the running product or the presenter fails.
    pub fn plot_annual<P: Presenter + ?Sized>(
        &self,
        selection: FactorSelection,
        start: PeriodKey,
        presenter: &mut P,
    ) -> Result<()> {
        let chart = annual_chart(&self.cumulative_value(start)?, selection);
        presenter.draw(&chart)?;
        Ok(())
    }
}

impl fmt::Display for FactorDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary().map_err(|_| fmt::Error)?;
        fmt::Display::fmt(&summary, f)
    }
}
