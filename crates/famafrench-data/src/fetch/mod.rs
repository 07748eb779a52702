//! Retrieval of the raw factor payload.
//!
//! A [`RawFetcher`] turns a [`FactorSource`] into the bytes of the delimited
//! text entry inside the published archive. Anything it writes to disk along
//! the way is reported in [`RawPayload::staged`] so the cache can remove it
//! once the cleaned table is persisted.

pub mod archive;
pub mod http;

pub use archive::{LocalArchiveFetcher, extract_entry};
pub use http::{HttpFetcher, HttpFetcherBuilder};

use crate::error::Result;
use std::path::PathBuf;

/// Directory holding the published research data files.
pub const FRENCH_BASE_URL: &str = "https://mba.tuck.dartmouth.edu/pages/faculty/ken.french/ftp/";

/// Archive containing the three research factors.
pub const FACTORS_ARCHIVE: &str = "F-F_Research_Data_Factors_CSV.zip";

/// Entry inside [`FACTORS_ARCHIVE`] holding the delimited text.
pub const FACTORS_ENTRY: &str = "F-F_Research_Data_Factors.CSV";

/// Location of the remote archive and the entry to extract from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorSource {
    /// Full URL of the compressed archive
    pub url: String,
    /// Name of the delimited-text entry inside the archive
    pub entry: String,
}

impl FactorSource {
    /// Create a source from an archive URL and an entry name.
    pub fn new(url: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            entry: entry.into(),
        }
    }

    /// File name of the archive, taken from the last URL segment.
    pub fn archive_name(&self) -> &str {
        self.url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(FACTORS_ARCHIVE)
    }
}

impl Default for FactorSource {
    fn default() -> Self {
        Self::new(format!("{FRENCH_BASE_URL}{FACTORS_ARCHIVE}"), FACTORS_ENTRY)
    }
}

/// Payload bytes plus every transient file written while producing them.
#[derive(Debug, Clone, Default)]
pub struct RawPayload {
    /// Contents of the extracted entry
    pub bytes: Vec<u8>,
    /// Downloaded or extracted files that may be deleted afterwards
    pub staged: Vec<PathBuf>,
}

/// Capability to fetch the raw delimited text of a named resource.
pub trait RawFetcher {
    /// Fetch and extract the payload described by `source`.
    ///
    /// # Errors
    /// Returns [`DataError::Acquisition`](crate::DataError::Acquisition) when
    /// the transfer or extraction fails.
    fn fetch(&self, source: &FactorSource) -> Result<RawPayload>;
}

impl<F: RawFetcher + ?Sized> RawFetcher for &F {
    fn fetch(&self, source: &FactorSource) -> Result<RawPayload> {
        (**self).fetch(source)
    }
}

impl<F: RawFetcher + ?Sized> RawFetcher for Box<F> {
    fn fetch(&self, source: &FactorSource) -> Result<RawPayload> {
        (**self).fetch(source)
    }
}
