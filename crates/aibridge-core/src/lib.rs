//! aibridge Core
//!
//! Core types, traits, and utilities shared across the aibridge crates.
//!
//! This crate provides:
//! - Error taxonomy and result handling
//! - Model path validation and the shared model path slot
//! - Variant selection and the per-instance configuration it derives
//! - The classifier event sink and host error-dispatch capabilities
//! - Bridge metrics

pub mod error;
pub mod host;
pub mod metrics;
pub mod model_path;
pub mod sink;
pub mod types;
pub mod variant;

pub use error::{ConfigurationError, Error, MessageParseError, Result};
pub use host::{ErrorReport, HostErrorDispatcher, TracingDispatcher};
pub use metrics::{BridgeMetrics, MetricsSnapshot};
pub use model_path::{ModelPath, ModelPathCell, ModelPathValidator};
pub use sink::ClassifierEventSink;
pub use types::{codes, LabelSet, ARCHIVE_EXTENSION, MODEL_PATH_SUFFIX, OCTET_STREAM, SCHEME};
pub use variant::{Variant, VariantConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{ConfigurationError, Error, MessageParseError, Result};
    pub use crate::host::{ErrorReport, HostErrorDispatcher};
    pub use crate::model_path::{ModelPath, ModelPathCell};
    pub use crate::sink::ClassifierEventSink;
    pub use crate::variant::{Variant, VariantConfig};
}
