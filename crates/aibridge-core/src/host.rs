//! Host container error-dispatch channel

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A configuration problem reported to the hosting container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Component that raised the error (e.g. `PersonalImageClassifier`)
    pub component: String,

    /// Function or property that was being used
    pub function: String,

    /// Fixed error code, see [`crate::codes`]
    pub code: i32,

    /// Message shown to the app author
    pub message: String,
}

impl ErrorReport {
    /// Create a new error report
    pub fn new(
        component: impl Into<String>,
        function: impl Into<String>,
        code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            function: function.into(),
            code,
            message: message.into(),
        }
    }
}

/// The host's generic error-dispatch channel.
///
/// Calls are synchronous and happen at most once per offending operation.
pub trait HostErrorDispatcher: Send + Sync + Debug {
    /// Deliver an error report to the host
    fn dispatch_error(&self, report: ErrorReport);
}

/// Dispatcher that only writes reports to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatcher;

impl HostErrorDispatcher for TracingDispatcher {
    fn dispatch_error(&self, report: ErrorReport) {
        tracing::error!(
            component = %report.component,
            function = %report.function,
            code = report.code,
            "{}",
            report.message
        );
    }
}
