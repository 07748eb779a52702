//! Backend-independent chart description.

use serde::{Deserialize, Serialize};

/// How a line is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line, used for reference levels.
    Dashed,
}

/// One named series of y-values aligned with [`Chart::x`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Short column name.
    pub name: String,

    /// Legend label.
    pub label: String,

    /// Y-values, one per x-value.
    pub values: Vec<f64>,

    /// Stroke style.
    pub style: LineStyle,
}

impl Line {
    /// Create a solid line.
    pub fn new(name: impl Into<String>, label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            values,
            style: LineStyle::Solid,
        }
    }

    /// Value at x-index `i`, NaN past the end of the series.
    pub fn value_at(&self, i: usize) -> f64 {
        self.values.get(i).copied().unwrap_or(f64::NAN)
    }

    /// Last value of the series.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Horizontal line at a constant level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    /// Y level.
    pub value: f64,

    /// Stroke style.
    pub style: LineStyle,
}

/// A set of line series sharing an integer x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Chart title.
    pub title: String,

    /// X-axis label.
    pub x_label: String,

    /// Y-axis label.
    pub y_label: String,

    /// X-values shared by every line.
    pub x: Vec<i64>,

    /// Data series.
    pub lines: Vec<Line>,

    /// Optional horizontal reference.
    pub reference: Option<ReferenceLine>,

    /// Whether a grid is drawn.
    pub grid: bool,
}

impl Chart {
    /// Create an empty chart over `x`.
    pub fn new(title: impl Into<String>, x: Vec<i64>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            x,
            lines: Vec::new(),
            reference: None,
            grid: false,
        }
    }

    /// Set axis labels.
    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Add a dashed horizontal reference at `value`.
    pub const fn with_reference(mut self, value: f64) -> Self {
        self.reference = Some(ReferenceLine {
            value,
            style: LineStyle::Dashed,
        });
        self
    }

    /// Enable the grid.
    pub const fn with_grid(mut self) -> Self {
        self.grid = true;
        self
    }

    /// Append a line.
    ///
    /// Lines with a different length than [`Chart::x`] are truncated or
    /// padded with NaN.
    pub fn push_line(&mut self, mut line: Line) {
        line.values.resize(self.x.len(), f64::NAN);
        self.lines.push(line);
    }

    /// Legend entries in drawing order.
    pub fn legend(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.label.as_str()).collect()
    }

    /// Whether the chart has no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_line_aligns_length() {
        let mut chart = Chart::new("t", vec![1, 2, 3]);
        chart.push_line(Line::new("a", "A", vec![1.0]));
        chart.push_line(Line::new("b", "B", vec![1.0, 2.0, 3.0, 4.0]));

        assert_eq!(chart.lines[0].values.len(), 3);
        assert!(chart.lines[0].values[2].is_nan());
        assert_eq!(chart.lines[1].values, vec![1.0, 2.0, 3.0]);
        assert_eq!(chart.legend(), vec!["A", "B"]);
    }

    #[test]
    fn test_value_at_past_end_is_nan() {
        let line = Line::new("a", "A", vec![1.5]);
        assert_eq!(line.value_at(0), 1.5);
        assert!(line.value_at(1).is_nan());
    }

    #[test]
    fn test_reference_is_dashed() {
        let chart = Chart::new("t", vec![]).with_reference(1.0).with_grid();
        let reference = chart.reference.unwrap();
        assert_eq!(reference.value, 1.0);
        assert_eq!(reference.style, LineStyle::Dashed);
        assert!(chart.grid);
        assert!(chart.is_empty());
    }
}
