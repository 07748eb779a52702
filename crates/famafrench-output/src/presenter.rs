//! Presenters render charts and summaries.
//!
//! A presenter is a one-way sink: nothing it does feeds back into the data
//! that produced the chart.

use crate::chart::{Chart, LineStyle};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while presenting.
#[derive(Debug, Error)]
pub enum PresentError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

/// Sink for charts and textual summaries.
pub trait Presenter {
    /// Render a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn draw(&mut self, chart: &Chart) -> Result<(), PresentError>;

    /// Render a textual summary. Ignored by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn summary(&mut self, _text: &str) -> Result<(), PresentError> {
        Ok(())
    }
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn draw(&mut self, chart: &Chart) -> Result<(), PresentError> {
        (**self).draw(chart)
    }

    fn summary(&mut self, text: &str) -> Result<(), PresentError> {
        (**self).summary(text)
    }
}

/// Draws charts as aligned text tables.
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: W,
    width: usize,
}

impl<W: Write> TextPresenter<W> {
    /// Default column width.
    pub const DEFAULT_WIDTH: usize = 12;

    /// Present to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// Set the column width.
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn draw(&mut self, chart: &Chart) -> Result<(), PresentError> {
        let w = self.width;
        let rule_len = w * (chart.lines.len() + 1 + usize::from(chart.reference.is_some()));
        let rule = (if chart.grid { "-" } else { " " }).repeat(rule_len);

        writeln!(self.out, "\n{}", chart.title)?;
        writeln!(self.out, "{}", "=".repeat(rule_len.max(chart.title.len())))?;

        write!(self.out, "{:<w$}", chart.x_label)?;
        for line in &chart.lines {
            write!(self.out, "{:>w$}", line.name)?;
        }
        if chart.reference.is_some() {
            write!(self.out, "{:>w$}", "ref")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;

        for (i, x) in chart.x.iter().enumerate() {
            write!(self.out, "{:<w$}", x)?;
            for line in &chart.lines {
                write!(self.out, "{:>w$.4}", line.value_at(i))?;
            }
            if let Some(reference) = chart.reference {
                write!(self.out, "{:>w$.4}", reference.value)?;
            }
            writeln!(self.out)?;
        }
        writeln!(self.out, "{rule}")?;

        if !chart.y_label.is_empty() {
            writeln!(self.out, "Values: {}", chart.y_label)?;
        }
        for line in &chart.lines {
            let stroke = match line.style {
                LineStyle::Solid => "──",
                LineStyle::Dashed => "--",
            };
            writeln!(self.out, "  {stroke} {:<8} {}", line.name, line.label)?;
        }
        if let Some(reference) = chart.reference {
            writeln!(self.out, "  -- {:<8} reference at {:.2}", "ref", reference.value)?;
        }
        Ok(())
    }

    fn summary(&mut self, text: &str) -> Result<(), PresentError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

/// Writes chart series as CSV, one row per x-value.
#[derive(Debug)]
pub struct CsvPresenter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvPresenter<W> {
    /// Present to `out`.
    ///
    /// Each chart gets its own header, so successive charts may differ in
    /// column count.
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(out),
        }
    }

    /// Flush and recover the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered rows cannot be flushed.
    pub fn into_inner(self) -> Result<W, PresentError> {
        self.writer
            .into_inner()
            .map_err(|e| PresentError::Io(e.into_error()))
    }
}

impl<W: Write> Presenter for CsvPresenter<W> {
    fn draw(&mut self, chart: &Chart) -> Result<(), PresentError> {
        let x_label = if chart.x_label.is_empty() { "x" } else { chart.x_label.as_str() };
        let mut header = vec![x_label.to_string()];
        header.extend(chart.lines.iter().map(|l| l.name.clone()));
        self.writer.write_record(&header)?;

        for (i, x) in chart.x.iter().enumerate() {
            let mut record = vec![x.to_string()];
            record.extend(chart.lines.iter().map(|l| l.value_at(i).to_string()));
            self.writer.write_record(&record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Line;

    fn sample_chart() -> Chart {
        let mut chart = Chart::new("Value of 1 USD invested in 1927", vec![1927, 1928])
            .with_axes("Year", "Value (USD)")
            .with_reference(1.0)
            .with_grid();
        chart.push_line(Line::new("Mkt-RF", "Excess Market Return (Mkt-RF)", vec![1.0, 1.1]));
        chart
    }

    #[test]
    fn test_text_presenter_draws_table_and_legend() {
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.draw(&sample_chart()).unwrap();
        presenter.summary("E[R] 1.0").unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        assert!(text.contains("Value of 1 USD invested in 1927"));
        assert!(text.contains("Year"));
        assert!(text.contains("1928"));
        assert!(text.contains("1.1000"));
        assert!(text.contains("Excess Market Return (Mkt-RF)"));
        assert!(text.contains("reference at 1.00"));
        assert!(text.ends_with("E[R] 1.0\n"));
    }

    #[test]
    fn test_csv_presenter_writes_series() {
        let mut presenter = CsvPresenter::new(Vec::new());
        presenter.draw(&sample_chart()).unwrap();
        presenter.summary("ignored").unwrap();
        let csv = String::from_utf8(presenter.into_inner().unwrap()).unwrap();

        assert_eq!(csv, "Year,Mkt-RF\n1927,1\n1928,1.1\n");
    }

    fn short_line_chart() -> Chart {
        let mut chart = sample_chart();
        // Bypasses push_line, which would pad the series
        chart.lines.push(Line::new("SMB", "Small Minus Big (SMB)", vec![1.0]));
        chart
    }

    #[test]
    fn test_text_presenter_pads_short_line_with_nan() {
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.draw(&short_line_chart()).unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        let row = text.lines().find(|l| l.starts_with("1928")).unwrap();
        assert!(row.contains("1.1000"));
        assert!(row.contains("NaN"));
    }

    #[test]
    fn test_csv_presenter_pads_short_line_with_nan() {
        let mut presenter = CsvPresenter::new(Vec::new());
        presenter.draw(&short_line_chart()).unwrap();
        let csv = String::from_utf8(presenter.into_inner().unwrap()).unwrap();

        assert_eq!(csv, "Year,Mkt-RF,SMB\n1927,1,1\n1928,1.1,NaN\n");
    }

    #[test]
    fn test_csv_presenter_draws_charts_of_different_widths() {
        let mut presenter = CsvPresenter::new(Vec::new());
        presenter.draw(&sample_chart()).unwrap();
        presenter.draw(&short_line_chart()).unwrap();
        let csv = String::from_utf8(presenter.into_inner().unwrap()).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "Year,Mkt-RF,SMB");
    }

    #[test]
    fn test_presenter_by_mutable_reference() {
        fn render(mut p: impl Presenter, chart: &Chart) {
            p.draw(chart).unwrap();
        }

        let mut presenter = TextPresenter::new(Vec::new()).with_width(8);
        render(&mut presenter, &sample_chart());
        assert!(!presenter.into_inner().is_empty());
    }
}
