//! Blocking HTTP fetcher for the published archive.

use super::archive::{extract_entry, read_payload};
use super::{FactorSource, RawFetcher, RawPayload};
use crate::error::{DataError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("famafrench/", env!("CARGO_PKG_VERSION"));

/// Downloads the archive over HTTP, stages it on disk and extracts the entry.
///
/// Requests block until complete; no timeout is applied unless one is set
/// through [`HttpFetcherBuilder::timeout`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    staging_dir: PathBuf,
}

impl HttpFetcher {
    /// Create a fetcher staging into the system temporary directory.
    ///
    /// # Errors
    /// Returns [`DataError::Acquisition`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// Directory the archive and its entry are staged in.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn download(&self, source: &FactorSource, archive_path: &Path) -> Result<()> {
        let acquisition = |e: reqwest::Error| DataError::acquisition(&source.url, e);

        info!(url = %source.url, "downloading factor archive");
        let bytes = self
            .client
            .get(&source.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::bytes)
            .map_err(acquisition)?;

        fs::create_dir_all(&self.staging_dir).map_err(|e| DataError::acquisition(&source.url, e))?;
        fs::write(archive_path, &bytes).map_err(|e| DataError::acquisition(&source.url, e))?;
        debug!(path = %archive_path.display(), bytes = bytes.len(), "staged archive");
        Ok(())
    }
}

impl RawFetcher for HttpFetcher {
    fn fetch(&self, source: &FactorSource) -> Result<RawPayload> {
        let archive_path = self.staging_dir.join(source.archive_name());

        let extracted = self
            .download(source, &archive_path)
            .and_then(|()| extract_entry(&archive_path, &source.entry, &self.staging_dir))
            .and_then(|payload_path| {
                read_payload(&payload_path, &source.entry).map(|bytes| (bytes, payload_path))
            });

        match extracted {
            Ok((bytes, payload_path)) => Ok(RawPayload {
                bytes,
                staged: vec![archive_path, payload_path],
            }),
            Err(e) => {
                let _ = fs::remove_file(&archive_path);
                Err(e)
            }
        }
    }
}

/// Builder for [`HttpFetcher`].
#[derive(Debug, Default)]
pub struct HttpFetcherBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    staging_dir: Option<PathBuf>,
}

impl HttpFetcherBuilder {
    /// Override the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Stage downloads in `dir` instead of the system temporary directory.
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Build the fetcher.
    ///
    /// # Errors
    /// Returns [`DataError::Acquisition`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<HttpFetcher> {
        // The blocking client defaults to a 30s timeout; `None` disables it.
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()))
            .timeout(self.timeout)
            .build()
            .map_err(|e| DataError::acquisition("HTTP client", e))?;

        Ok(HttpFetcher {
            client,
            staging_dir: self
                .staging_dir
                .unwrap_or_else(|| std::env::temp_dir().join("famafrench")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_staging_dir() {
        let fetcher = HttpFetcher::builder()
            .staging_dir("/tmp/ff-staging")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(fetcher.staging_dir(), Path::new("/tmp/ff-staging"));
    }

    #[test]
    fn test_unreachable_host_is_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::builder()
            .staging_dir(dir.path())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let source = FactorSource::new("http://127.0.0.1:9/factors.zip", "factors.csv");

        let err = fetcher.fetch(&source).unwrap_err();
        assert!(matches!(err, DataError::Acquisition { .. }));
        assert!(!dir.path().join("factors.zip").exists());
    }
}
