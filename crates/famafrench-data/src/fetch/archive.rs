//! Zip extraction and a fetcher for archives already on disk.

use super::{FactorSource, RawFetcher, RawPayload};
use crate::error::{DataError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Extract `entry` from the zip at `archive` into `dest_dir`.
///
/// Returns the path of the extracted file. A partially written file is
/// removed before an error is returned.
///
/// # Errors
/// Returns [`DataError::Acquisition`] if the archive cannot be opened, has no
/// such entry, or the entry cannot be written.
pub fn extract_entry(archive: &Path, entry: &str, dest_dir: &Path) -> Result<PathBuf> {
    let resource = archive.display().to_string();
    let file = File::open(archive).map_err(|e| DataError::acquisition(&resource, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| DataError::acquisition(&resource, e))?;
    let mut reader = zip
        .by_name(entry)
        .map_err(|e| DataError::acquisition(&resource, format!("entry {entry}: {e}")))?;

    fs::create_dir_all(dest_dir).map_err(|e| DataError::acquisition(&resource, e))?;
    let out_path = dest_dir.join(entry);
    let mut out = File::create(&out_path).map_err(|e| DataError::acquisition(&resource, e))?;
    if let Err(e) = io::copy(&mut reader, &mut out) {
        drop(out);
        let _ = fs::remove_file(&out_path);
        return Err(DataError::acquisition(&resource, e));
    }

    debug!(archive = %archive.display(), entry, out = %out_path.display(), "extracted archive entry");
    Ok(out_path)
}

/// Read an extracted payload, removing it if the read fails.
pub(crate) fn read_payload(path: &Path, resource: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        let _ = fs::remove_file(path);
        DataError::acquisition(resource, e)
    })
}

/// Fetcher that extracts the entry from a zip already on the local disk.
///
/// The archive itself is never staged or removed; only the extracted entry is.
#[derive(Debug, Clone)]
pub struct LocalArchiveFetcher {
    archive: PathBuf,
    staging_dir: PathBuf,
}

impl LocalArchiveFetcher {
    /// Create a fetcher reading `archive` and extracting into `staging_dir`.
    pub fn new(archive: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            staging_dir: staging_dir.into(),
        }
    }

    /// Path of the local archive.
    pub fn archive(&self) -> &Path {
        &self.archive
    }
}

impl RawFetcher for LocalArchiveFetcher {
    fn fetch(&self, source: &FactorSource) -> Result<RawPayload> {
        let payload_path = extract_entry(&self.archive, &source.entry, &self.staging_dir)?;
        let bytes = read_payload(&payload_path, &source.entry)?;
        Ok(RawPayload {
            bytes,
            staged: vec![payload_path],
        })
    }
}
