//! Cache manager for the factor artifacts.
//!
//! Builds the monthly cache from command-line options, defaulting to the
//! platform cache directory.

use famafrench_data::cache::{CacheConfig, DatasetCache, SystemClock, default_cache_dir};
use famafrench_data::error::DataError;
use famafrench_data::fetch::{HttpFetcher, LocalArchiveFetcher, RawFetcher};
use std::path::PathBuf;
use std::time::Duration;

/// Cache whose fetcher is chosen at runtime.
pub(crate) type CliCache = DatasetCache<Box<dyn RawFetcher>, SystemClock>;

/// Options controlling where the cache lives and how misses are filled.
#[derive(Debug, Clone, Default)]
pub(crate) struct CacheOptions {
    /// Override of the cache directory.
    pub dir: Option<PathBuf>,
    /// Ignore this month's artifact.
    pub refresh: bool,
    /// HTTP request timeout.
    pub timeout: Option<Duration>,
    /// Read the archive from disk instead of downloading it.
    pub archive: Option<PathBuf>,
}

impl CacheOptions {
    /// Get the configured cache directory.
    pub(crate) fn cache_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// Open the cache described by `options`.
pub(crate) fn open_cache(options: &CacheOptions) -> Result<CliCache, DataError> {
    let dir = options.cache_dir();
    let staging = dir.join("staging");

    let fetcher: Box<dyn RawFetcher> = match &options.archive {
        Some(archive) => Box::new(LocalArchiveFetcher::new(archive, staging)),
        None => {
            let mut builder = HttpFetcher::builder().staging_dir(staging);
            if let Some(timeout) = options.timeout {
                builder = builder.timeout(timeout);
            }
            Box::new(builder.build()?)
        }
    };

    let config = CacheConfig::new(dir).with_refresh(options.refresh);
    Ok(DatasetCache::new(config, fetcher, SystemClock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_override() {
        let options = CacheOptions {
            dir: Some(PathBuf::from("/tmp/ff")),
            ..CacheOptions::default()
        };
        assert_eq!(options.cache_dir(), PathBuf::from("/tmp/ff"));
        assert!(CacheOptions::default().cache_dir().ends_with("famafrench"));
    }

    #[test]
    fn test_open_cache_with_local_archive() {
        let dir = tempfile::tempdir().unwrap();
        let options = CacheOptions {
            dir: Some(dir.path().to_path_buf()),
            refresh: true,
            archive: Some(dir.path().join("factors.zip")),
            ..CacheOptions::default()
        };
        let cache = open_cache(&options).unwrap();

        assert!(cache.config().refresh);
        assert!(!cache.lookup().is_hit());
        assert!(cache.artifact_path().starts_with(dir.path()));
    }
}
