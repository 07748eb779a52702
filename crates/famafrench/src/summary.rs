//! Mean and dispersion of annual factor returns.

use crate::views::rows_to_frame;
use famafrench_data::{Factor, FactorRow};
use famafrench_output::{ExportError, ExportFormat, Exporter};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Header printed above the statistics table.
pub const SUMMARY_HEADER: &str = "\nAnnual Returns (%):\n\n";

/// One statistic across all four factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStat {
    /// Row label, `E[R]` or `SD[R]`.
    pub stat: &'static str,
    /// Excess market return.
    #[serde(rename = "Mkt-RF")]
    pub mkt_rf: f64,
    /// Size premium.
    #[serde(rename = "SMB")]
    pub smb: f64,
    /// Value premium.
    #[serde(rename = "HML")]
    pub hml: f64,
    /// Risk-free rate.
    #[serde(rename = "RF")]
    pub rf: f64,
}

impl SummaryStat {
    fn new(stat: &'static str, values: [f64; 4]) -> Self {
        let [mkt_rf, smb, hml, rf] = values;
        Self {
            stat,
            mkt_rf,
            smb,
            hml,
            rf,
        }
    }

    /// Values in factor order.
    pub const fn values(&self) -> [f64; 4] {
        [self.mkt_rf, self.smb, self.hml, self.rf]
    }
}

/// Per-factor mean and sample standard deviation, in percent.
///
/// An empty input gives NaN means; fewer than two rows give NaN deviations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Number of rows summarized.
    pub count: usize,
    /// `E[R]` row.
    pub mean: SummaryStat,
    /// `SD[R]` row.
    pub std_dev: SummaryStat,
}

impl SummaryTable {
    /// Summarize `rows` column by column.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be built or aggregated.
    pub fn from_rows(rows: &[FactorRow]) -> PolarsResult<Self> {
        let count = rows.len();
        let mut exprs = Vec::with_capacity(2 * Factor::ALL.len());
        for factor in Factor::ALL {
            let name = factor.column();
            exprs.push(col(name).mean().alias(format!("mean_{name}")));
            exprs.push(col(name).std(1).alias(format!("std_{name}")));
        }
        let stats = rows_to_frame(rows)?.lazy().select(exprs).collect()?;

        let scalar = |name: String| -> PolarsResult<f64> {
            Ok(stats.column(&name)?.f64()?.get(0).unwrap_or(f64::NAN))
        };
        let mut mean = [f64::NAN; 4];
        let mut std_dev = [f64::NAN; 4];
        for factor in Factor::ALL {
            let i = factor.index();
            mean[i] = scalar(format!("mean_{}", factor.column()))?;
            // Sample deviation is undefined below two rows
            if count > 1 {
                std_dev[i] = scalar(format!("std_{}", factor.column()))?;
            }
        }

        Ok(Self {
            count,
            mean: SummaryStat::new("E[R]", mean),
            std_dev: SummaryStat::new("SD[R]", std_dev),
        })
    }

    /// Mean of one factor.
    pub fn mean(&self, factor: Factor) -> f64 {
        self.mean.values()[factor.index()]
    }

    /// Sample standard deviation of one factor.
    pub fn std_dev(&self, factor: Factor) -> f64 {
        self.std_dev.values()[factor.index()]
    }

    /// Both statistic rows, mean first.
    pub const fn stats(&self) -> [SummaryStat; 2] {
        [self.mean, self.std_dev]
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SUMMARY_HEADER}")?;
        write!(f, "{:<8}", "")?;
        for factor in Factor::ALL {
            write!(f, "{:>12}", factor.column())?;
        }
        writeln!(f)?;
        for stat in self.stats() {
            write!(f, "{:<8}", stat.stat)?;
            for v in stat.values() {
                write!(f, "{v:>12.6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Exporter for SummaryTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.stats()[..].export_to_string(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use famafrench_data::PeriodKey;

    fn row(key: i64, values: [f64; 4]) -> FactorRow {
        FactorRow::new(PeriodKey::new(key), values)
    }

    #[test]
    fn test_mean_and_sample_std() {
        let rows = vec![
            row(1927, [10.0, -2.0, 1.0, 3.0]),
            row(1928, [-5.0, 4.0, -6.0, 3.5]),
            row(1929, [20.0, 0.0, 2.0, 4.0]),
        ];
        let summary = SummaryTable::from_rows(&rows).unwrap();

        assert_eq!(summary.count, 3);
        assert_relative_eq!(summary.mean(Factor::MktRf), 25.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(summary.mean(Factor::Rf), 3.5, epsilon = 1e-12);
        // Deviations from 3.5 are -0.5, 0, 0.5
        assert_relative_eq!(summary.std_dev(Factor::Rf), 0.5, epsilon = 1e-12);
        assert_relative_eq!(
            summary.std_dev(Factor::Smb),
            3.055_050_463_303_893,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_rows_are_nan() {
        let summary = SummaryTable::from_rows(&[]).unwrap();
        assert!(summary.mean.values().iter().all(|v| v.is_nan()));
        assert!(summary.std_dev.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_single_row_has_nan_std() {
        let summary = SummaryTable::from_rows(&[row(1927, [1.0, 2.0, 3.0, 4.0])]).unwrap();
        assert_eq!(summary.mean.values(), [1.0, 2.0, 3.0, 4.0]);
        assert!(summary.std_dev.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_display_layout() {
        let summary = SummaryTable::from_rows(&[
            row(1927, [1.0, 2.0, 3.0, 4.0]),
            row(1928, [3.0, 2.0, 1.0, 4.0]),
        ])
        .unwrap();
        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(text.starts_with(SUMMARY_HEADER));
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Annual Returns (%):");
        assert!(lines[3].contains("Mkt-RF") && lines[3].contains("RF"));
        assert!(lines[4].starts_with("E[R]"));
        assert!(lines[4].contains("2.000000"));
        assert!(lines[5].starts_with("SD[R]"));
        assert!(lines[5].contains("1.414214"));
    }

    #[test]
    fn test_export_csv() {
        let summary = SummaryTable::from_rows(&[
            row(1927, [1.0, 2.0, 3.0, 4.0]),
            row(1928, [3.0, 2.0, 1.0, 4.0]),
        ])
        .unwrap();
        let csv = summary.export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("stat,Mkt-RF,SMB,HML,RF"));
        assert_eq!(lines.next(), Some("E[R],2.0,2.0,2.0,4.0"));
    }
}
