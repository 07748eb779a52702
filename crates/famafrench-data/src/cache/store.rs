//! Month-keyed cache of the cleaned factor table.

use super::clock::Clock;
use crate::error::{DataError, Result};
use crate::fetch::{FactorSource, RawFetcher, RawPayload};
use crate::table::{CleanTable, RawTable};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name prefix of every cache artifact.
pub const ARTIFACT_PREFIX: &str = "fama-french-";

/// File extension of every cache artifact.
pub const ARTIFACT_EXTENSION: &str = "csv";

/// Calendar month identifying one cache artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    year: i32,
    month: u32,
}

impl CacheKey {
    /// Key for the month containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1 to 12.
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Artifact file name, e.g. `fama-french-202410.csv`.
    pub fn file_name(&self) -> String {
        format!("{ARTIFACT_PREFIX}{self}.{ARTIFACT_EXTENSION}")
    }

    /// Parse an artifact file name back into its key.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stamp = name
            .strip_prefix(ARTIFACT_PREFIX)?
            .strip_suffix(ARTIFACT_EXTENSION)?
            .strip_suffix('.')?;
        if stamp.len() != 6 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = stamp[..4].parse().ok()?;
        let month = stamp[4..].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::for_date)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

/// Platform cache directory for artifacts.
///
/// - Linux: `~/.cache/famafrench/`
/// - macOS: `~/Library/Caches/famafrench/`
/// - Windows: `%LOCALAPPDATA%\famafrench\`
///
/// Falls back to `./famafrench` when the platform has no cache directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("famafrench")
}

/// Where the cache lives and what it caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory holding the artifacts
    pub dir: PathBuf,
    /// Remote archive to acquire on a miss
    pub source: FactorSource,
    /// Re-acquire even when an artifact for the current month exists
    pub refresh: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(default_cache_dir())
    }
}

impl CacheConfig {
    /// Cache in `dir` using the default source.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            source: FactorSource::default(),
            refresh: false,
        }
    }

    /// Use a different remote source.
    pub fn with_source(mut self, source: FactorSource) -> Self {
        self.source = source;
        self
    }

    /// Set whether an existing artifact is ignored.
    pub const fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// Whether the artifact for the current month is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// The artifact exists and will be loaded
    Hit(PathBuf),
    /// The artifact is absent (or refresh was requested) and will be acquired
    Miss(PathBuf),
}

impl CacheStatus {
    /// Path of the artifact for the current month.
    pub fn path(&self) -> &Path {
        match self {
            Self::Hit(path) | Self::Miss(path) => path,
        }
    }

    /// Whether this is a hit.
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// An artifact found in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Month the artifact was created in
    pub key: CacheKey,
    /// Location on disk
    pub path: PathBuf,
}

/// Resolves the cleaned factor table, one artifact per calendar month.
///
/// On a hit the artifact is loaded without re-validation against the source.
/// On a miss the payload is fetched, parsed, cleaned and persisted; nothing
/// is written unless every step succeeds.
#[derive(Debug)]
pub struct DatasetCache<F, C> {
    config: CacheConfig,
    fetcher: F,
    clock: C,
}

impl<F: RawFetcher, C: Clock> DatasetCache<F, C> {
    /// Create a cache.
    pub const fn new(config: CacheConfig, fetcher: F, clock: C) -> Self {
        Self {
            config,
            fetcher,
            clock,
        }
    }

    /// Cache configuration.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Key for the current month.
    pub fn key(&self) -> CacheKey {
        CacheKey::for_date(self.clock.today())
    }

    /// Path of the artifact for the current month.
    pub fn artifact_path(&self) -> PathBuf {
        self.config.dir.join(self.key().file_name())
    }

    /// Determine whether [`resolve`](Self::resolve) will load or acquire.
    pub fn lookup(&self) -> CacheStatus {
        let path = self.artifact_path();
        if !self.config.refresh && path.is_file() {
            CacheStatus::Hit(path)
        } else {
            CacheStatus::Miss(path)
        }
    }

    /// Load the current month's table, acquiring it first if needed.
    ///
    /// # Errors
    /// - [`DataError::Format`] if the existing artifact is malformed
    /// - [`DataError::Acquisition`] if the download or extraction fails
    /// - [`DataError::Load`] if the payload cannot be parsed or cleaned
    /// - [`DataError::Persist`] if the cleaned table cannot be written
    pub fn resolve(&self) -> Result<CleanTable> {
        match self.lookup() {
            CacheStatus::Hit(path) => {
                info!(path = %path.display(), "factor cache hit");
                CleanTable::read_csv(&path)
            }
            CacheStatus::Miss(path) => {
                info!(path = %path.display(), "factor cache miss, acquiring");
                self.acquire(&path)
            }
        }
    }

    fn acquire(&self, path: &Path) -> Result<CleanTable> {
        let payload = self.fetcher.fetch(&self.config.source)?;
        let table = parse_payload(&payload, &self.config.source.entry)?;

        fs::create_dir_all(&self.config.dir).map_err(|e| DataError::persist(path, e))?;
        table.write_csv(path)?;
        info!(path = %path.display(), rows = table.len(), "persisted factor table");

        discard_staged(&payload);
        Ok(table)
    }

    /// All artifacts in the cache directory, oldest month first.
    ///
    /// # Errors
    /// Returns [`DataError::Io`] if the directory exists but cannot be read.
    pub fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        if !self.config.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        for entry in fs::read_dir(&self.config.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(CacheKey::from_file_name) {
                artifacts.push(Artifact {
                    key,
                    path: entry.path(),
                });
            }
        }
        artifacts.sort_by_key(|a| a.key);
        Ok(artifacts)
    }

    /// Delete every artifact not belonging to the current month.
    ///
    /// Returns the removed paths.
    ///
    /// # Errors
    /// Returns [`DataError::Io`] if the directory cannot be read or a file
    /// cannot be removed.
    pub fn prune(&self) -> Result<Vec<PathBuf>> {
        let current = self.key();
        let mut removed = Vec::new();
        for artifact in self.list_artifacts()? {
            if artifact.key != current {
                fs::remove_file(&artifact.path)?;
                debug!(path = %artifact.path.display(), "pruned stale artifact");
                removed.push(artifact.path);
            }
        }
        Ok(removed)
    }
}

/// Decode, parse and clean a fetched payload.
fn parse_payload(payload: &RawPayload, resource: &str) -> Result<CleanTable> {
    let text = std::str::from_utf8(&payload.bytes).map_err(|e| DataError::load(resource, e))?;
    let raw = RawTable::parse(text, resource)?;
    let table = raw.clean().map_err(|e| DataError::load(resource, e))?;
    debug!(
        resource,
        raw_rows = raw.len(),
        clean_rows = table.len(),
        "cleaned payload"
    );
    Ok(table)
}

fn discard_staged(payload: &RawPayload) {
    for path in &payload.staged {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove staged file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FixedClock;
    use crate::table::tests::SAMPLE;
    use rstest::rstest;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct CountingFetcher {
        payload: String,
        calls: Cell<usize>,
    }

    impl RawFetcher for CountingFetcher {
        fn fetch(&self, _source: &FactorSource) -> Result<RawPayload> {
            self.calls.set(self.calls.get() + 1);
            Ok(RawPayload {
                bytes: self.payload.clone().into_bytes(),
                staged: Vec::new(),
            })
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(day(2024, 10, 18), "fama-french-202410.csv")]
    #[case(day(2024, 1, 1), "fama-french-202401.csv")]
    #[case(day(1999, 12, 31), "fama-french-199912.csv")]
    fn test_file_name_truncates_to_month(#[case] date: NaiveDate, #[case] expected: &str) {
        assert_eq!(CacheKey::for_date(date).file_name(), expected);
    }

    #[rstest]
    #[case("fama-french-202410.csv", Some((2024, 10)))]
    #[case("fama-french-202413.csv", None)]
    #[case("fama-french-2024.csv", None)]
    #[case("fama-french-202410.csv.tmp", None)]
    #[case("F-F_Research_Data_Factors.CSV", None)]
    fn test_key_from_file_name(#[case] name: &str, #[case] expected: Option<(i32, u32)>) {
        let parsed = CacheKey::from_file_name(name).map(|k| (k.year(), k.month()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_same_month_dates_share_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::default();
        let early = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 1)),
        );
        let late = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 31)),
        );
        assert_eq!(early.artifact_path(), late.artifact_path());
    }

    #[test]
    fn test_refresh_forces_miss() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            payload: SAMPLE.to_string(),
            ..Default::default()
        };
        let clock = FixedClock(day(2024, 10, 18));

        DatasetCache::new(CacheConfig::new(dir.path()), &fetcher, clock)
            .resolve()
            .unwrap();
        let refreshing =
            DatasetCache::new(CacheConfig::new(dir.path()).with_refresh(true), &fetcher, clock);
        assert!(!refreshing.lookup().is_hit());
        refreshing.resolve().unwrap();
        assert_eq!(fetcher.calls.get(), 2);
    }

    #[test]
    fn test_bad_payload_is_load_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            payload: "preamble\nonly\n".to_string(),
            ..Default::default()
        };
        let cache = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 18)),
        );

        let err = cache.resolve().unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
        assert!(!cache.artifact_path().exists());
    }

    #[test]
    fn test_payload_without_complete_rows_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            payload: "a\nb\n,Mkt-RF,SMB,HML,RF\nCopyright\n".to_string(),
            ..Default::default()
        };
        let cache = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 18)),
        );
        assert!(matches!(cache.resolve().unwrap_err(), DataError::Load { .. }));
    }

    #[test]
    fn test_malformed_artifact_is_format_error_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            payload: SAMPLE.to_string(),
            ..Default::default()
        };
        let cache = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 18)),
        );
        fs::write(cache.artifact_path(), "not,a,factor,table\n1,2,3,4\n").unwrap();

        let err = cache.resolve().unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn test_list_and_prune_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            payload: SAMPLE.to_string(),
            ..Default::default()
        };
        for month in [8, 9, 10] {
            DatasetCache::new(
                CacheConfig::new(dir.path()),
                &fetcher,
                FixedClock(day(2024, month, 2)),
            )
            .resolve()
            .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "unrelated").unwrap();

        let cache = DatasetCache::new(
            CacheConfig::new(dir.path()),
            &fetcher,
            FixedClock(day(2024, 10, 18)),
        );
        let months: Vec<u32> = cache
            .list_artifacts()
            .unwrap()
            .iter()
            .map(|a| a.key.month())
            .collect();
        assert_eq!(months, vec![8, 9, 10]);

        let removed = cache.prune().unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(cache.list_artifacts().unwrap().len(), 1);
        assert!(cache.lookup().is_hit());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_list_artifacts_of_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(
            CacheConfig::new(dir.path().join("absent")),
            CountingFetcher::default(),
            FixedClock(day(2024, 10, 18)),
        );
        assert!(cache.list_artifacts().unwrap().is_empty());
    }

    #[test]
    fn test_default_config_uses_platform_dir() {
        let config = CacheConfig::default();
        assert!(config.dir.ends_with("famafrench"));
        assert_eq!(config.source, FactorSource::default());
        assert!(!config.refresh);
    }
}
