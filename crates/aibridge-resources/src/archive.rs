//! In-memory zip archive reading
//!
//! Personal models are shipped as zip archives. The whole archive is held in
//! memory; entries are located by exact path and decompressed on demand.

use crate::error::ArchiveError;
use bytes::Bytes;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// One named byte blob extracted from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    /// Entry path exactly as stored in the archive
    pub path: String,

    /// Decompressed contents
    pub data: Bytes,
}

/// An opened archive.
///
/// Entry lookup walks the central directory in order, so when an archive
/// contains the same path twice the first occurrence wins.
pub struct ZipArchiveReader {
    archive: ZipArchive<Cursor<Bytes>>,
}

impl ZipArchiveReader {
    /// Parse archive bytes held entirely in memory
    pub fn open(bytes: impl Into<Bytes>) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes.into()))?;
        Ok(Self { archive })
    }

    /// Number of entries in the central directory
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entry paths in central directory order
    pub fn entries(&mut self) -> Result<Vec<String>, ArchiveError> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            names.push(self.archive.by_index_raw(index)?.name().to_string());
        }
        Ok(names)
    }

    /// Extract the first entry whose path equals `path`.
    ///
    /// Returns `Ok(None)` when no entry matches.
    pub fn extract(&mut self, path: &str) -> Result<Option<ZipEntry>, ArchiveError> {
        let Some(index) = self.position(path)? else {
            return Ok(None);
        };

        let mut file = self.archive.by_index(index)?;
        let declared = usize::try_from(file.size()).unwrap_or(MAX_PREALLOC);
        let mut data = Vec::with_capacity(declared.min(MAX_PREALLOC));
        file.read_to_end(&mut data)?;

        Ok(Some(ZipEntry {
            path: path.to_string(),
            data: Bytes::from(data),
        }))
    }

    fn position(&mut self, path: &str) -> Result<Option<usize>, ArchiveError> {
        for index in 0..self.archive.len() {
            if self.archive.by_index_raw(index)?.name() == path {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for ZipArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchiveReader")
            .field("entries", &self.archive.len())
            .finish()
    }
}
