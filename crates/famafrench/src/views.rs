//! Derived views over the partitioned dataset.

use famafrench_data::{Factor, FactorRow, PeriodKey};
use famafrench_output::{ExportError, ExportFormat, Exporter};
use polars::prelude::*;

/// Multiplier converting a percent value into a fractional return.
pub const DECIMALIZE: f64 = 0.01;

/// Convert a percent return into a fractional return.
pub fn decimalize(percent: f64) -> f64 {
    DECIMALIZE * percent
}

/// Name of the key column in every view frame.
pub const PERIOD_COLUMN: &str = "period";

/// Build a frame with a `period` column and one column per factor.
pub(crate) fn rows_to_frame(rows: &[FactorRow]) -> PolarsResult<DataFrame> {
    let periods: Vec<i64> = rows.iter().map(|r| r.period.get()).collect();
    let mut columns: Vec<Column> = vec![Series::new(PERIOD_COLUMN.into(), periods).into()];
    for factor in Factor::ALL {
        let values: Vec<f64> = rows.iter().map(|r| r.get(factor)).collect();
        columns.push(Series::new(factor.column().into(), values).into());
    }
    DataFrame::new(columns)
}

/// Read rows back from a frame laid out by [`rows_to_frame`].
///
/// Null values become NaN; rows with a null period are skipped.
pub(crate) fn frame_to_rows(frame: &DataFrame) -> PolarsResult<Vec<FactorRow>> {
    let periods = frame.column(PERIOD_COLUMN)?.i64()?;
    let columns = Factor::ALL
        .iter()
        .map(|f| frame.column(f.column())?.f64())
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(frame.height());
    for (i, period) in periods.into_iter().enumerate() {
        let Some(period) = period else { continue };
        let values = std::array::from_fn(|j| columns[j].get(i).unwrap_or(f64::NAN));
        rows.push(FactorRow::new(PeriodKey::new(period), values));
    }
    Ok(rows)
}

/// Monthly returns as fractions, from a starting month onwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyView {
    start: PeriodKey,
    rows: Vec<FactorRow>,
}

impl MonthlyView {
    /// Decimalize the rows of `monthly` with key at or after `start`.
    pub fn from_rows(monthly: &[FactorRow], start: PeriodKey) -> Self {
        let rows = monthly
            .iter()
            .filter(|r| r.period >= start)
            .map(|r| r.map(decimalize))
            .collect();
        Self { start, rows }
    }

    /// Requested first month.
    pub const fn start(&self) -> PeriodKey {
        self.start
    }

    /// Decimalized rows.
    pub fn rows(&self) -> &[FactorRow] {
        &self.rows
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no month is at or after the start.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one factor.
    pub fn series(&self, factor: Factor) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(factor)).collect()
    }

    /// Convert to a DataFrame with columns `period, Mkt-RF, SMB, HML, RF`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        rows_to_frame(&self.rows)
    }
}

impl Exporter for MonthlyView {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.rows.export_to_string(format)
    }
}

/// Value of one unit invested at the start of a year, per factor.
///
/// The first year is always 1.0; each later year is the product of the gross
/// returns of every earlier year in the view. The return of the last year is
/// therefore not reflected in any value.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeValue {
    start: PeriodKey,
    rows: Vec<FactorRow>,
}

impl CumulativeValue {
    /// Compound the annual rows with key at or after `start`.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be built or evaluated.
    pub fn from_rows(annual: &[FactorRow], start: PeriodKey) -> PolarsResult<Self> {
        let selected: Vec<FactorRow> = annual
            .iter()
            .filter(|r| r.period >= start)
            .copied()
            .collect();

        let mut exprs = vec![col(PERIOD_COLUMN)];
        exprs.extend(Factor::ALL.iter().map(|f| {
            (lit(1.0) + lit(DECIMALIZE) * col(f.column()))
                .shift_and_fill(lit(1), lit(1.0))
                .cum_prod(false)
                .alias(f.column())
        }));
        let frame = rows_to_frame(&selected)?.lazy().select(exprs).collect()?;

        Ok(Self {
            start,
            rows: frame_to_rows(&frame)?,
        })
    }

    /// Requested first year.
    pub const fn start(&self) -> PeriodKey {
        self.start
    }

    /// Years covered, in order.
    pub fn periods(&self) -> Vec<PeriodKey> {
        self.rows.iter().map(|r| r.period).collect()
    }

    /// Cumulative values, one row per year.
    pub fn rows(&self) -> &[FactorRow] {
        &self.rows
    }

    /// Cumulative value series of one factor.
    pub fn series(&self, factor: Factor) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(factor)).collect()
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no year is at or after the start.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a DataFrame with columns `period, Mkt-RF, SMB, HML, RF`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        rows_to_frame(&self.rows)
    }
}

impl Exporter for CumulativeValue {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.rows.export_to_string(format)
    }
}
