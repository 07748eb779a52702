//! Per-field coercion of raw source text.
//!
//! The published file mixes data rows with preambles, section titles and a
//! copyright footer. Coercion never fails: anything that does not parse
//! becomes [`Coerced::Missing`], and cleaning later drops the row.

/// Sentinel period reported for keys that fail integer coercion.
pub const INVALID_PERIOD: i64 = 99;

/// Number of decimal places factor values are rounded to.
pub const FACTOR_DECIMALS: i32 = 4;

/// Outcome of coercing one raw field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    /// The field parsed.
    Value(T),
    /// The field was absent or unparseable.
    Missing,
}

impl<T> Coerced<T> {
    /// Whether the field is missing.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Convert into an `Option`.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing => None,
        }
    }
}

impl Coerced<i64> {
    /// The parsed key, or [`INVALID_PERIOD`] when missing.
    pub fn or_sentinel(self) -> i64 {
        self.value().unwrap_or(INVALID_PERIOD)
    }
}

impl Coerced<f64> {
    /// The parsed value, or NaN when missing.
    pub fn or_nan(self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }
}

/// Coerce a raw field into an integer period key.
pub fn coerce_period(raw: &str) -> Coerced<i64> {
    match raw.trim().parse::<i64>() {
        Ok(v) => Coerced::Value(v),
        Err(_) => Coerced::Missing,
    }
}

/// Coerce a raw field into a factor value rounded to [`FACTOR_DECIMALS`].
///
/// Non-finite values (`nan`, `inf`) are treated as missing.
pub fn coerce_factor(raw: &str) -> Coerced<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced::Value(round_to(v, FACTOR_DECIMALS)),
        _ => Coerced::Missing,
    }
}

/// Round `value` to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
