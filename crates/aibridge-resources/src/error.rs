//! Error types for resource resolution

use std::fmt;
use zip::result::ZipError;

/// Failure to read or parse a model archive.
///
/// Distinct from an entry simply being absent, which is not an error at the
/// archive level.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Corrupt or truncated archive data
    #[error("invalid archive: {0}")]
    Invalid(String),

    /// Archive uses a feature this reader does not support
    #[error("unsupported archive: {0}")]
    Unsupported(String),

    /// Reading archive bytes failed (including checksum mismatches)
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => Self::Io(e),
            ZipError::InvalidArchive(msg) => Self::Invalid(msg.to_string()),
            ZipError::UnsupportedArchive(msg) => Self::Unsupported(msg.to_string()),
            other => Self::Invalid(other.to_string()),
        }
    }
}

/// Why a URL did not resolve to any bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// URL is unparsable or uses another scheme
    SchemeMismatch,
    /// Neither prefix matches, or prefixes were never bound
    UnmatchedPrefix,
    /// Transfer-prefixed name is not a bundled asset
    AssetMissing,
    /// Personal-prefixed request with no model path set
    ModelPathUnset,
    /// The archive named by the model path is not packaged
    ArchiveMissing,
    /// The archive does not contain the requested entry
    EntryAbsent,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SchemeMismatch => "scheme mismatch",
            Self::UnmatchedPrefix => "no matching prefix",
            Self::AssetMissing => "bundled asset missing",
            Self::ModelPathUnset => "model path not set",
            Self::ArchiveMissing => "model archive missing",
            Self::EntryAbsent => "archive entry absent",
        };
        f.write_str(text)
    }
}

/// Failure to resolve a resource request.
///
/// Any variant terminates only the request it belongs to.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Nothing to serve for this URL
    #[error("resource not found: {url} ({reason})")]
    NotFound { url: String, reason: NotFoundReason },

    /// The personal model archive could not be read
    #[error("archive error for {url}: {source}")]
    Archive {
        url: String,
        #[source]
        source: ArchiveError,
    },

    /// A bundled asset exists but could not be read
    #[error("failed to read asset for {url}: {source}")]
    AssetUnreadable {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Create a not-found error
    pub fn not_found(url: impl Into<String>, reason: NotFoundReason) -> Self {
        Self::NotFound {
            url: url.into(),
            reason,
        }
    }

    /// Check if this is a not-found failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The not-found reason, if any
    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        match self {
            Self::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
