//! Function-call messages posted by web content
//!
//! Wire format: `{ "functionCall": "ready" | "reportResult" | "error", "args": "<JSON text>" }`.
//! `args` is itself JSON encoded inside a string.

use aibridge_core::{LabelSet, MessageParseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The native function web content asks to invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCall {
    /// Classifier loaded; args are the labels
    Ready,
    /// Classification result; args are opaque
    ReportResult,
    /// Classifier error; args are an integer code
    Error,
    /// Anything else, kept for logging
    Other(String),
}

impl FunctionCall {
    /// Parse a function call name
    pub fn parse(name: &str) -> Self {
        match name {
            "ready" => Self::Ready,
            "reportResult" => Self::ReportResult,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "ready",
            Self::ReportResult => "reportResult",
            Self::Error => "error",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded call, ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ready(LabelSet),
    ReportResult(Value),
    Error(i32),
    Unrecognized(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "functionCall")]
    function_call: String,
    #[serde(default)]
    args: Value,
}

/// One message received over the script-messaging channel
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallMessage {
    pub function_call: FunctionCall,

    /// Raw `args` value, normally a JSON-encoded string
    pub args: Value,
}

impl FunctionCallMessage {
    /// Read the envelope from a message body
    pub fn from_value(body: &Value) -> Result<Self, MessageParseError> {
        let envelope = Envelope::deserialize(body).map_err(MessageParseError::Envelope)?;
        Ok(Self {
            function_call: FunctionCall::parse(&envelope.function_call),
            args: envelope.args,
        })
    }

    /// Read the envelope from JSON text
    pub fn from_json(raw: &str) -> Result<Self, MessageParseError> {
        let body: Value = serde_json::from_str(raw).map_err(MessageParseError::Envelope)?;
        Self::from_value(&body)
    }

    /// Build a message body the way web content does, JSON-encoding `args`
    pub fn envelope(function_call: &str, args: &impl Serialize) -> Value {
        let encoded = serde_json::to_string(args).unwrap_or_else(|_| "null".to_string());
        serde_json::json!({ "functionCall": function_call, "args": encoded })
    }

    /// Decode `args` for the function call.
    ///
    /// Unrecognized calls decode successfully without looking at `args`.
    pub fn decode(&self) -> Result<Call, MessageParseError> {
        let name = self.function_call.as_str();
        let invalid = |e: serde_json::Error| MessageParseError::invalid_args(name, e);
        match &self.function_call {
            FunctionCall::Ready => serde_json::from_str(self.args_text()?)
                .map(Call::Ready)
                .map_err(invalid),
            FunctionCall::ReportResult => serde_json::from_str(self.args_text()?)
                .map(Call::ReportResult)
                .map_err(invalid),
            FunctionCall::Error => serde_json::from_str(self.args_text()?)
                .map(Call::Error)
                .map_err(invalid),
            FunctionCall::Other(name) => Ok(Call::Unrecognized(name.clone())),
        }
    }

    fn args_text(&self) -> Result<&str, MessageParseError> {
        self.args
            .as_str()
            .ok_or_else(|| MessageParseError::ArgsNotString {
                function_call: self.function_call.as_str().to_string(),
            })
    }
}
