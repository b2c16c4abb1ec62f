//! Model resource router
//!
//! Answers fetches over the private scheme. URLs are routed by plain string
//! prefix (no path normalization):
//! - transfer prefix: the final path component names a bundled asset
//! - personal prefix: the remainder names an entry inside the archive that
//!   backs the current model path
//!
//! Anything else, including every URL before prefixes are bound, is not found.

use crate::archive::ZipArchiveReader;
use crate::assets::AssetSource;
use crate::error::{ArchiveError, NotFoundReason, ResolveError};
use crate::request::{ResolvedKind, ResourceRequest};
use aibridge_core::{BridgeMetrics, ConfigurationError, ModelPathCell, VariantConfig};
use bytes::Bytes;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// The two URL prefixes a router answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePrefixes {
    transfer: String,
    personal: String,
}

impl RoutePrefixes {
    /// Create a prefix pair
    pub fn new(transfer: impl Into<String>, personal: impl Into<String>) -> Self {
        Self {
            transfer: transfer.into(),
            personal: personal.into(),
        }
    }

    /// Prefixes derived from a variant
    pub fn for_variant(config: &VariantConfig) -> Self {
        Self::new(config.transfer_prefix(), config.personal_prefix())
    }

    /// Prefix of bundled-asset URLs
    pub fn transfer(&self) -> &str {
        &self.transfer
    }

    /// Prefix of archive-entry URLs
    pub fn personal(&self) -> &str {
        &self.personal
    }
}

/// Where a URL resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A bundled asset by file name
    Bundled { name: String },
    /// An entry inside the personal model archive
    PersonalEntry { entry: String },
    /// Nothing to serve
    Unresolved(NotFoundReason),
}

impl Route {
    /// Kind recorded on the request
    pub fn kind(&self) -> ResolvedKind {
        match self {
            Self::Bundled { .. } => ResolvedKind::Bundled,
            Self::PersonalEntry { .. } => ResolvedKind::PersonalArchiveEntry,
            Self::Unresolved(_) => ResolvedKind::Unresolved,
        }
    }
}

/// Resolves private-scheme URLs to model bytes.
///
/// Safe to share across threads; concurrent resolutions only read the bound
/// prefixes and take a snapshot of the model path.
#[derive(Debug)]
pub struct ModelResourceRouter {
    scheme: String,
    prefixes: OnceLock<RoutePrefixes>,
    assets: Arc<dyn AssetSource>,
    model_path: ModelPathCell,
    metrics: BridgeMetrics,
}

impl ModelResourceRouter {
    /// Create a router for `scheme` with no prefixes bound yet
    pub fn new(
        scheme: impl Into<String>,
        assets: Arc<dyn AssetSource>,
        model_path: ModelPathCell,
        metrics: BridgeMetrics,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            prefixes: OnceLock::new(),
            assets,
            model_path,
            metrics,
        }
    }

    /// Bind the prefixes. Only the first call succeeds.
    pub fn configure(&self, prefixes: RoutePrefixes) -> Result<(), ConfigurationError> {
        let transfer = prefixes.transfer.clone();
        let personal = prefixes.personal.clone();
        self.prefixes
            .set(prefixes)
            .map_err(|_| ConfigurationError::PrefixesAlreadyBound)?;
        info!(scheme = %self.scheme, %transfer, %personal, "resource prefixes bound");
        Ok(())
    }

    /// Bind the prefixes derived from a variant
    pub fn configure_for(&self, config: &VariantConfig) -> Result<(), ConfigurationError> {
        self.configure(RoutePrefixes::for_variant(config))
    }

    /// The scheme this router answers
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Bound prefixes, if any
    pub fn prefixes(&self) -> Option<&RoutePrefixes> {
        self.prefixes.get()
    }

    /// Classify a URL without reading anything
    pub fn classify(&self, url: &str) -> Route {
        match url::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == self.scheme => {}
            _ => return Route::Unresolved(NotFoundReason::SchemeMismatch),
        }

        let Some(prefixes) = self.prefixes.get() else {
            return Route::Unresolved(NotFoundReason::UnmatchedPrefix);
        };

        if let Some(rest) = url.strip_prefix(prefixes.transfer()) {
            let name = rest.rsplit('/').next().unwrap_or(rest);
            Route::Bundled {
                name: name.to_string(),
            }
        } else if let Some(rest) = url.strip_prefix(prefixes.personal()) {
            Route::PersonalEntry {
                entry: rest.to_string(),
            }
        } else {
            Route::Unresolved(NotFoundReason::UnmatchedPrefix)
        }
    }

    /// Resolve a URL to the complete bytes it names
    pub fn resolve(&self, url: &str) -> Result<Bytes, ResolveError> {
        let route = self.classify(url);
        self.resolve_route(url, &route)
    }

    /// Drive a request through its lifecycle.
    ///
    /// Requests cancelled before this call are skipped.
    pub fn start(&self, request: &ResourceRequest) {
        if !request.begin() {
            debug!(id = %request.id(), state = ?request.state(), "request not started");
            return;
        }

        let url = request.url();
        let route = self.classify(url);
        let kind = route.kind();
        request.set_kind(kind);

        let outcome = self.resolve_route(url, &route);
        match &outcome {
            Ok(data) => {
                debug!(id = %request.id(), url, kind = kind.as_str(), bytes = data.len(), "resolved");
                self.metrics.record_resolved(kind.as_str(), data.len() as u64);
            }
            Err(err) => {
                warn!(id = %request.id(), kind = kind.as_str(), "resolution failed: {}", err);
                if matches!(err, ResolveError::Archive { .. }) {
                    self.metrics.record_archive_error();
                }
                self.metrics.record_failed(kind.as_str());
            }
        }

        request.complete(&outcome);
    }

    /// Stop a request. Only takes effect before resolution has started.
    pub fn stop(&self, request: &ResourceRequest) {
        if request.cancel() {
            debug!(id = %request.id(), "request cancelled before start");
        } else {
            debug!(id = %request.id(), state = ?request.state(), "stop ignored");
        }
    }

    fn resolve_route(&self, url: &str, route: &Route) -> Result<Bytes, ResolveError> {
        match route {
            Route::Bundled { name } => self.resolve_bundled(url, name),
            Route::PersonalEntry { entry } => self.resolve_personal(url, entry),
            Route::Unresolved(reason) => Err(ResolveError::not_found(url, *reason)),
        }
    }

    fn resolve_bundled(&self, url: &str, name: &str) -> Result<Bytes, ResolveError> {
        match self.assets.load(name) {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ResolveError::not_found(url, NotFoundReason::AssetMissing)),
            Err(source) => Err(ResolveError::AssetUnreadable {
                url: url.to_string(),
                source,
            }),
        }
    }

    fn resolve_personal(&self, url: &str, entry: &str) -> Result<Bytes, ResolveError> {
        // One snapshot per resolution; a concurrent path change is not observed midway
        let Some(model_path) = self.model_path.current() else {
            return Err(ResolveError::not_found(url, NotFoundReason::ModelPathUnset));
        };

        let archive_name = model_path.archive_name();
        let archive_bytes = match self.assets.load(&archive_name) {
            Ok(Some(data)) => data,
            Ok(None) => {
                return Err(ResolveError::not_found(url, NotFoundReason::ArchiveMissing));
            }
            Err(e) => return Err(archive_error(url, ArchiveError::Io(e))),
        };

        let mut reader = ZipArchiveReader::open(archive_bytes).map_err(|e| archive_error(url, e))?;
        match reader.extract(entry).map_err(|e| archive_error(url, e))? {
            Some(zip_entry) => Ok(zip_entry.data),
            None => Err(ResolveError::not_found(url, NotFoundReason::EntryAbsent)),
        }
    }
}

fn archive_error(url: &str, source: ArchiveError) -> ResolveError {
    ResolveError::Archive {
        url: url.to_string(),
        source,
    }
}
