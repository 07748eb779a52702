//! Charts of cumulative factor value.

use crate::views::CumulativeValue;
use famafrench_data::Factor;
use famafrench_output::{Chart, Line};

/// Which factors to draw on the annual chart.
///
/// The risk-free rate is never plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorSelection {
    /// Draw the excess market return.
    pub mkt_rf: bool,
    /// Draw the size premium.
    pub smb: bool,
    /// Draw the value premium.
    pub hml: bool,
}

impl Default for FactorSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FactorSelection {
    /// All three plottable factors.
    pub const fn all() -> Self {
        Self {
            mkt_rf: true,
            smb: true,
            hml: true,
        }
    }

    /// No factors.
    pub const fn none() -> Self {
        Self {
            mkt_rf: false,
            smb: false,
            hml: false,
        }
    }

    /// Toggle the excess market return.
    pub const fn with_mkt_rf(mut self, on: bool) -> Self {
        self.mkt_rf = on;
        self
    }

    /// Toggle the size premium.
    pub const fn with_smb(mut self, on: bool) -> Self {
        self.smb = on;
        self
    }

    /// Toggle the value premium.
    pub const fn with_hml(mut self, on: bool) -> Self {
        self.hml = on;
        self
    }

    /// Selected factors in drawing order.
    pub fn factors(&self) -> Vec<Factor> {
        [
            (Factor::MktRf, self.mkt_rf),
            (Factor::Smb, self.smb),
            (Factor::Hml, self.hml),
        ]
        .into_iter()
        .filter_map(|(factor, on)| on.then_some(factor))
        .collect()
    }
}

/// Build the chart of one unit invested at the start of the view.
pub fn annual_chart(value: &CumulativeValue, selection: FactorSelection) -> Chart {
    let years = value.periods().into_iter().map(|p| p.get()).collect();
    let mut chart = Chart::new(format!("Value of 1 USD invested in {}", value.start()), years)
        .with_axes("Year", "Value (USD)")
        .with_reference(1.0)
        .with_grid();

    for factor in selection.factors() {
        chart.push_line(Line::new(
            factor.column(),
            factor.label(),
            value.series(factor),
        ));
    }
    chart
}
