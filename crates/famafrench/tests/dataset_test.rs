//! End-to-end tests: resolve through the cache, partition, and present.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use famafrench::data::cache::{CacheConfig, DatasetCache, FixedClock};
use famafrench::data::fetch::{FactorSource, RawFetcher, RawPayload};
use famafrench::output::{CsvPresenter, ExportFormat, Exporter, TextPresenter};
use famafrench::{
    DataError, DatasetBounds, FIRST_MONTHLY_PERIOD, Factor, FactorDataset, FactorSelection,
    PeriodKey,
};

const PAYLOAD: &str = "\
This file was created by CMPT_ME_BEME_RETS using the 202408 CRSP database.
The 1-month TBill return is from Ibbotson and Associates, Inc.

,Mkt-RF,SMB,HML,RF
192607,    2.96,   -2.30,   -2.87,    0.22
192608,    2.64,   -1.40,    4.19,    0.25
192609,    0.36,   -1.32,    0.01,    0.23
192610,   -3.24,    0.04,    0.51,    0.32

 Annual Factors: January-December
,Mkt-RF,SMB,HML,RF
1927,   29.47,   -2.04,   -4.54,    3.12
1928,   35.39,    4.51,   -6.17,    3.56
1929,  -19.54,  -30.78,   11.67,    4.75
1930,  -31.23,   -5.17,  -12.28,    2.41

Copyright 2024 Kenneth R. French
";

/// Serves a fixed payload without touching the network.
#[derive(Debug)]
struct StaticFetcher(&'static str);

impl RawFetcher for StaticFetcher {
    fn fetch(&self, _source: &FactorSource) -> famafrench::data::Result<RawPayload> {
        Ok(RawPayload {
            bytes: self.0.as_bytes().to_vec(),
            staged: Vec::new(),
        })
    }
}

fn load(dir: &std::path::Path, payload: &'static str) -> famafrench::data::Result<FactorDataset> {
    let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 10, 18).unwrap());
    let cache = DatasetCache::new(CacheConfig::new(dir), StaticFetcher(payload), clock);
    FactorDataset::load(&cache, DatasetBounds::default())
}

#[test]
fn test_load_partitions_table() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(dir.path(), PAYLOAD).unwrap();

    assert_eq!(dataset.monthly_rows().len(), 4);
    assert_eq!(dataset.annual_rows().len(), 4);
    assert!(dir.path().join("fama-french-202410.csv").exists());

    let monthly = dataset.monthly(FIRST_MONTHLY_PERIOD);
    assert_eq!(monthly.len(), 4);
    assert_relative_eq!(monthly.rows()[0].mkt_rf, 0.0296, epsilon = 1e-12);
}

#[test]
fn test_cached_dataset_matches_fresh_one() {
    let dir = tempfile::tempdir().unwrap();
    let fresh = load(dir.path(), PAYLOAD).unwrap();
    // Second load is served from the artifact; the payload is never parsed
    let cached = load(dir.path(), "not a factor file").unwrap();

    assert_eq!(fresh.table(), cached.table());
    assert_eq!(fresh.to_string(), cached.to_string());
}

#[test]
fn test_malformed_payload_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path(), "garbage\n").unwrap_err();

    assert!(matches!(err, DataError::Load { .. }));
    assert!(!dir.path().join("fama-french-202410.csv").exists());
}

#[test]
fn test_summary_and_cumulative_value() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(dir.path(), PAYLOAD).unwrap();

    let summary = dataset.summary().unwrap();
    assert_relative_eq!(
        summary.mean(Factor::Rf),
        (3.12 + 3.56 + 4.75 + 2.41) / 4.0,
        epsilon = 1e-9
    );

    let value = dataset.cumulative_value(PeriodKey::new(1928)).unwrap();
    let mkt = value.series(Factor::MktRf);
    assert_eq!(mkt.len(), 3);
    assert_eq!(mkt[0], 1.0);
    assert_relative_eq!(mkt[1], 1.3539, epsilon = 1e-12);
    assert_relative_eq!(mkt[2], 1.3539 * (1.0 - 0.1954), epsilon = 1e-12);
}

#[test]
fn test_summary_through_text_presenter() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(dir.path(), PAYLOAD).unwrap();

    let mut text = TextPresenter::new(Vec::new());
    dataset.present_summary(&mut text).unwrap();
    let text = String::from_utf8(text.into_inner()).unwrap();
    assert!(text.starts_with("\nAnnual Returns (%):\n\n"));
    assert!(text.contains("3.460000"));

    // CSV presenters ignore summaries
    let mut csv = CsvPresenter::new(Vec::new());
    dataset.present_summary(&mut csv).unwrap();
    assert!(csv.into_inner().unwrap().is_empty());
}

#[test]
fn test_plot_annual_to_presenters() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(dir.path(), PAYLOAD).unwrap();

    let mut text = TextPresenter::new(Vec::new());
    dataset
        .plot_annual(FactorSelection::all(), PeriodKey::new(1927), &mut text)
        .unwrap();
    let text = String::from_utf8(text.into_inner()).unwrap();
    assert!(text.contains("Value of 1 USD invested in 1927"));
    assert!(text.contains("Long Value, Short Growth (HML)"));
    assert!(!text.contains("Risk-Free Rate"));

    let mut csv = CsvPresenter::new(Vec::new());
    dataset
        .plot_annual(
            FactorSelection::none().with_mkt_rf(true),
            PeriodKey::new(1929),
            &mut csv,
        )
        .unwrap();
    let csv = String::from_utf8(csv.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[..2], ["Year,Mkt-RF", "1929,1"]);
    let (year, value) = lines[2].split_once(',').unwrap();
    assert_eq!(year, "1930");
    assert_relative_eq!(value.parse::<f64>().unwrap(), 0.8046, epsilon = 1e-12);
}

#[test]
fn test_monthly_view_exports() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(dir.path(), PAYLOAD).unwrap();
    let view = dataset.monthly(PeriodKey::new(192610));

    let json = view.export_to_string(ExportFormat::Json).unwrap();
    assert!(json.contains("\"period\":192610"));

    let frame = view.to_frame().unwrap();
    assert_eq!(frame.height(), 1);
}
