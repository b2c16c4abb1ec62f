//! Model path validation and storage
//!
//! A model path names the personal model a component serves. Only paths
//! ending in [`MODEL_PATH_SUFFIX`] are accepted; the bytes are served from an
//! archive with the same base name and the [`ARCHIVE_EXTENSION`].

use crate::codes;
use crate::error::ConfigurationError;
use crate::host::{ErrorReport, HostErrorDispatcher};
use crate::metrics::BridgeMetrics;
use crate::types::{ARCHIVE_EXTENSION, MODEL_PATH_SUFFIX};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// An accepted model path. Always ends in `.mdl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelPath(String);

impl ModelPath {
    /// Validate a caller-supplied path
    pub fn parse(path: impl Into<String>) -> Result<Self, ConfigurationError> {
        let path = path.into();
        if path.ends_with(MODEL_PATH_SUFFIX) {
            Ok(Self(path))
        } else {
            Err(ConfigurationError::InvalidModelFile {
                path,
                suffix: MODEL_PATH_SUFFIX,
            })
        }
    }

    /// The path as supplied
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the backing archive: the same base name with `.zip`
    pub fn archive_name(&self) -> String {
        let base = &self.0[..self.0.len() - MODEL_PATH_SUFFIX.len()];
        format!("{base}{ARCHIVE_EXTENSION}")
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Shared slot holding the currently active model path.
///
/// Writers replace the whole value; readers take a snapshot. A resolution
/// that snapshots before a concurrent write keeps using the old path.
#[derive(Debug, Clone, Default)]
pub struct ModelPathCell {
    inner: Arc<RwLock<Option<ModelPath>>>,
}

impl ModelPathCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current path
    pub fn current(&self) -> Option<ModelPath> {
        self.inner.read().clone()
    }

    fn replace(&self, path: ModelPath) -> Option<ModelPath> {
        self.inner.write().replace(path)
    }
}

/// Accepts or rejects model paths for one component instance.
///
/// Rejections never reach the caller; they are reported through the host's
/// error-dispatch channel with [`codes::INVALID_MODEL_FILE`].
#[derive(Debug, Clone)]
pub struct ModelPathValidator {
    component: String,
    cell: ModelPathCell,
    host: Arc<dyn HostErrorDispatcher>,
    metrics: BridgeMetrics,
}

impl ModelPathValidator {
    /// Create a validator writing into `cell`
    pub fn new(
        component: impl Into<String>,
        cell: ModelPathCell,
        host: Arc<dyn HostErrorDispatcher>,
        metrics: BridgeMetrics,
    ) -> Self {
        Self {
            component: component.into(),
            cell,
            host,
            metrics,
        }
    }

    /// Set the active model path, or report why it was rejected
    pub fn set_model_path(&self, path: &str) {
        match ModelPath::parse(path) {
            Ok(model_path) => {
                info!(component = %self.component, path = %model_path, "model path set");
                self.cell.replace(model_path);
            }
            Err(err) => {
                warn!(component = %self.component, path, "rejected model path: {}", err);
                self.metrics.record_config_error();
                self.host.dispatch_error(ErrorReport::new(
                    &self.component,
                    "Model",
                    codes::INVALID_MODEL_FILE,
                    format!(
                        "{}: Invalid model file format. Files must be of format {}",
                        codes::INVALID_MODEL_FILE,
                        MODEL_PATH_SUFFIX
                    ),
                ));
            }
        }
    }

    /// Snapshot of the active model path
    pub fn current(&self) -> Option<ModelPath> {
        self.cell.current()
    }

    /// The cell this validator writes into
    pub fn cell(&self) -> &ModelPathCell {
        &self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    struct RecordingHost {
        reports: Mutex<Vec<ErrorReport>>,
    }

    impl HostErrorDispatcher for RecordingHost {
        fn dispatch_error(&self, report: ErrorReport) {
            self.reports.lock().push(report);
        }
    }

    fn validator() -> (ModelPathValidator, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        let validator = ModelPathValidator::new(
            "PersonalImageClassifier",
            ModelPathCell::new(),
            host.clone(),
            BridgeMetrics::new(),
        );
        (validator, host)
    }

    #[test]
    fn test_archive_name_replaces_suffix() {
        let path = ModelPath::parse("models/flowers.mdl").unwrap();
        assert_eq!(path.archive_name(), "models/flowers.zip");
    }

    #[test]
    fn test_accepts_mdl_path() {
        let (validator, host) = validator();
        validator.set_model_path("flowers.mdl");

        assert_eq!(validator.current().unwrap().as_str(), "flowers.mdl");
        assert!(host.reports.lock().is_empty());
    }

    #[test]
    fn test_rejection_keeps_previous_path() {
        let (validator, host) = validator();
        validator.set_model_path("flowers.mdl");
        validator.set_model_path("flowers.zip");

        assert_eq!(validator.current().unwrap().as_str(), "flowers.mdl");
        let reports = host.reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].code, codes::INVALID_MODEL_FILE);
        assert_eq!(reports[0].function, "Model");
        assert!(reports[0].message.contains(".mdl"));
    }

    #[test]
    fn test_later_path_replaces_earlier() {
        let (validator, _) = validator();
        validator.set_model_path("a.mdl");
        validator.set_model_path("b.mdl");
        assert_eq!(validator.current().unwrap().as_str(), "b.mdl");
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        let (validator, host) = validator();
        validator.set_model_path("flowers.MDL");
        assert!(validator.current().is_none());
        assert_eq!(host.reports.lock().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_set_model_path_accepts_only_mdl(
            path in prop_oneof![".{0,24}", "[a-z/_]{0,16}\\.mdl", "[a-z]{1,8}\\.(zip|md|mdlx)"]
        ) {
            let (validator, host) = validator();
            validator.set_model_path("seed.mdl");
            validator.set_model_path(&path);

            if path.ends_with(".mdl") {
                let current = validator.current().unwrap();
                prop_assert_eq!(current.as_str(), path.as_str());
                prop_assert!(host.reports.lock().is_empty());
            } else {
                let current = validator.current().unwrap();
                prop_assert_eq!(current.as_str(), "seed.mdl");
                let reports = host.reports.lock();
                prop_assert_eq!(reports.len(), 1);
                prop_assert_eq!(reports[0].code, codes::INVALID_MODEL_FILE);
            }
        }
    }
}
