//! Demonstration of charts, presenters and export in famafrench-output.

use famafrench_output::{
    Chart, CsvPresenter, ExportFormat, Exporter, Line, Presenter, TextPresenter,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MonthlyReturn {
    period: i64,
    #[serde(rename = "Mkt-RF")]
    mkt_rf: f64,
    #[serde(rename = "SMB")]
    smb: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fama/French Output Demo ===\n");

    // 1. Chart drawn as a text table
    println!("1. Text Presenter");

    let mut chart = Chart::new("Value of 1 USD invested in 1927", vec![1927, 1928, 1929])
        .with_axes("Year", "Value (USD)")
        .with_reference(1.0)
        .with_grid();
    chart.push_line(Line::new(
        "Mkt-RF",
        "Excess Market Return (Mkt-RF)",
        vec![1.0, 1.2947, 1.7529],
    ));
    chart.push_line(Line::new(
        "HML",
        "Long Value, Short Growth (HML)",
        vec![1.0, 0.9546, 0.8957],
    ));

    let mut text = TextPresenter::new(std::io::stdout().lock());
    text.draw(&chart)?;
    drop(text);

    // 2. The same series as CSV
    println!("\n2. CSV Presenter\n");

    let mut csv = CsvPresenter::new(Vec::new());
    csv.draw(&chart)?;
    println!("{}", String::from_utf8(csv.into_inner()?)?);

    // 3. Record export
    println!("3. Record Export\n");

    let returns = vec![
        MonthlyReturn {
            period: 192607,
            mkt_rf: 0.0296,
            smb: -0.023,
        },
        MonthlyReturn {
            period: 192608,
            mkt_rf: 0.0264,
            smb: -0.014,
        },
    ];

    println!("CSV Format:");
    println!("{}", returns.export_to_string(ExportFormat::Csv)?);

    println!("Pretty JSON Format:");
    println!("{}\n", returns.export_to_string(ExportFormat::PrettyJson)?);

    println!("=== Demo Complete ===");
    Ok(())
}
