//! Message bridge
//!
//! Receives function-call messages from web content and forwards them to the
//! component's [`ClassifierEventSink`]. Messages arrive one at a time from
//! the host's single delivery sequence.
//!
//! Malformed messages never reach the sink and never fail the channel: they
//! are logged at `warn` and counted as rejected. Unrecognized function calls
//! are ignored so newer web content can talk to older native code.

use crate::message::{Call, FunctionCallMessage};
use aibridge_core::{BridgeMetrics, ClassifierEventSink, LabelSet, MessageParseError};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a successfully handled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// `classifier_ready` was called with this many labels
    Ready { labels: usize },
    /// `got_classification` was called
    Classification,
    /// `on_error` was called with this code
    Error(i32),
    /// Unrecognized function call, nothing was called
    Ignored(String),
}

/// Decodes messages and dispatches them to the event sink
pub struct MessageBridge {
    sink: Arc<dyn ClassifierEventSink>,
    labels: RwLock<LabelSet>,
    metrics: BridgeMetrics,
}

impl MessageBridge {
    /// Create a bridge forwarding to `sink`
    pub fn new(sink: Arc<dyn ClassifierEventSink>, metrics: BridgeMetrics) -> Self {
        Self {
            sink,
            labels: RwLock::new(Vec::new()),
            metrics,
        }
    }

    /// Handle a message body; parse failures are logged and dropped
    pub fn handle(&self, body: &Value) {
        if let Err(err) = self.try_handle(body) {
            warn!("dropping malformed classifier message: {}", err);
        }
    }

    /// Handle a message given as JSON text
    pub fn handle_str(&self, raw: &str) {
        match FunctionCallMessage::from_json(raw) {
            Ok(message) => {
                if let Err(err) = self.dispatch(&message) {
                    warn!("dropping malformed classifier message: {}", err);
                }
            }
            Err(err) => {
                self.metrics.record_rejected();
                warn!("dropping malformed classifier message: {}", err);
            }
        }
    }

    /// Handle a message body, returning what happened
    pub fn try_handle(&self, body: &Value) -> Result<Dispatched, MessageParseError> {
        let message = FunctionCallMessage::from_value(body).map_err(|e| {
            self.metrics.record_rejected();
            e
        })?;
        self.dispatch(&message)
    }

    /// Dispatch an already parsed envelope
    pub fn dispatch(&self, message: &FunctionCallMessage) -> Result<Dispatched, MessageParseError> {
        let call = message.decode().map_err(|e| {
            self.metrics.record_rejected();
            e
        })?;

        let dispatched = match call {
            Call::Ready(labels) => {
                let count = labels.len();
                *self.labels.write() = labels.clone();
                self.sink.classifier_ready(&labels);
                self.metrics.record_dispatched("ready");
                Dispatched::Ready { labels: count }
            }
            Call::ReportResult(result) => {
                self.sink.got_classification(&result);
                self.metrics.record_dispatched("reportResult");
                Dispatched::Classification
            }
            Call::Error(code) => {
                self.sink.on_error(code);
                self.metrics.record_dispatched("error");
                Dispatched::Error(code)
            }
            Call::Unrecognized(name) => {
                debug!(function_call = %name, "ignoring unrecognized function call");
                self.metrics.record_ignored();
                Dispatched::Ignored(name)
            }
        };

        Ok(dispatched)
    }

    /// Snapshot of the current label set
    pub fn labels(&self) -> LabelSet {
        self.labels.read().clone()
    }
}

impl std::fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBridge")
            .field("labels", &self.labels.read().len())
            .finish()
    }
}
