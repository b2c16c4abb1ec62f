//! Classifier event sink capability

use serde_json::Value;

/// Receives classifier notifications decoded by the message bridge.
///
/// Exactly one implementation is bound per component instance, chosen by its
/// variant at construction.
pub trait ClassifierEventSink: Send + Sync {
    /// The classifier finished loading; `labels` is in model order
    fn classifier_ready(&self, labels: &[String]);

    /// A classification result, passed through unmodified
    fn got_classification(&self, result: &Value);

    /// An application-level error code raised by the web content
    fn on_error(&self, code: i32);
}
