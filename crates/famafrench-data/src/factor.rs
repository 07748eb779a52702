//! Core record types: period keys, factors and factor rows.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer key of a factor row: `YYYYMM` for monthly rows, `YYYY` for annual rows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PeriodKey(i64);

impl PeriodKey {
    /// Create a new period key.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// One of the four series published in the research factors file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    /// Market return in excess of the risk-free rate.
    MktRf,
    /// Small minus big size premium.
    Smb,
    /// High minus low value premium.
    Hml,
    /// One-month Treasury bill rate.
    Rf,
}

impl Factor {
    /// All factors in source column order.
    pub const ALL: [Self; 4] = [Self::MktRf, Self::Smb, Self::Hml, Self::Rf];

    /// Column name used by the source file and the cache artifact.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::MktRf => "Mkt-RF",
            Self::Smb => "SMB",
            Self::Hml => "HML",
            Self::Rf => "RF",
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MktRf => "Excess Market Return (Mkt-RF)",
            Self::Smb => "Long Small, Short Big (SMB)",
            Self::Hml => "Long Value, Short Growth (HML)",
            Self::Rf => "Risk-Free Rate (RF)",
        }
    }

    /// Position of this factor in [`FactorRow::values`].
    pub const fn index(&self) -> usize {
        match self {
            Self::MktRf => 0,
            Self::Smb => 1,
            Self::Hml => 2,
            Self::Rf => 3,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Factor returns for one period, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    /// Period key
    pub period: PeriodKey,
    /// Excess market return
    #[serde(rename = "Mkt-RF")]
    pub mkt_rf: f64,
    /// Size premium
    #[serde(rename = "SMB")]
    pub smb: f64,
    /// Value premium
    #[serde(rename = "HML")]
    pub hml: f64,
    /// Risk-free rate
    #[serde(rename = "RF")]
    pub rf: f64,
}

impl FactorRow {
    /// Create a row from a key and values in [`Factor::ALL`] order.
    pub const fn new(period: PeriodKey, values: [f64; 4]) -> Self {
        Self {
            period,
            mkt_rf: values[0],
            smb: values[1],
            hml: values[2],
            rf: values[3],
        }
    }

    /// Values in [`Factor::ALL`] order.
    pub const fn values(&self) -> [f64; 4] {
        [self.mkt_rf, self.smb, self.hml, self.rf]
    }

    /// Value of a single factor.
    pub const fn get(&self, factor: Factor) -> f64 {
        self.values()[factor.index()]
    }

    /// Apply `f` to every value, keeping the key.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(self.period, self.values().map(f))
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_columns_follow_row_order() {
        let row = FactorRow::new(PeriodKey::new(192607), [2.96, -2.56, -2.43, 0.22]);
        for factor in Factor::ALL {
            assert_eq!(row.get(factor), row.values()[factor.index()]);
        }
        assert_eq!(row.get(Factor::Hml), -2.43);
        assert_eq!(Factor::MktRf.to_string(), "Mkt-RF");
    }

    #[test]
    fn test_row_map_keeps_period() {
        let row = FactorRow::new(PeriodKey::new(1927), [10.0, -2.0, 1.0, 0.5]);
        let doubled = row.map(|v| v * 2.0);
        assert_eq!(doubled.period, PeriodKey::new(1927));
        assert_eq!(doubled.values(), [20.0, -4.0, 2.0, 1.0]);
    }

    #[test]
    fn test_period_key_conversions() {
        let key: PeriodKey = 202401.into();
        assert_eq!(key.get(), 202401);
        assert_eq!(i64::from(key), 202401);
        assert_eq!(key.to_string(), "202401");
        assert!(PeriodKey::new(1927) < PeriodKey::new(192601));
    }

    #[test]
    fn test_non_finite_row_detected() {
        let row = FactorRow::new(PeriodKey::new(1927), [1.0, f64::NAN, 0.0, 0.0]);
        assert!(!row.is_finite());
    }
}
