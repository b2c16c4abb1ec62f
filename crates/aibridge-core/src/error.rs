//! Error types for aibridge

/// Result type alias using aibridge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for aibridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Component configuration errors (model path, view binding)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// Malformed function-call messages from web content
    #[error("message parse error: {0}")]
    MessageParse(#[from] MessageParseError),
}

/// Problems with how a component instance has been set up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Model path does not carry the required suffix
    #[error("invalid model file format: '{path}' (files must be of format {suffix})")]
    InvalidModelFile { path: String, suffix: &'static str },

    /// An operation needed the web view but none has been bound
    #[error("a WebViewer must be bound before this component can be used")]
    ViewerRequired,

    /// The web view can only be bound once per component
    #[error("a WebViewer is already bound to this component")]
    ViewAlreadyBound,

    /// Router prefixes are fixed at binding time
    #[error("resource prefixes are already bound")]
    PrefixesAlreadyBound,

    /// The variant's bootstrap page is not packaged
    #[error("bootstrap page '{0}' is not packaged")]
    BootstrapMissing(String),
}

/// Failures decoding a function-call message coming from web content.
#[derive(Debug, thiserror::Error)]
pub enum MessageParseError {
    /// The envelope is not an object with `functionCall` and `args`
    #[error("malformed message envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// `args` must be a JSON-encoded string
    #[error("args for '{function_call}' is not a string")]
    ArgsNotString { function_call: String },

    /// `args` did not decode to the shape the function call expects
    #[error("unparsable args for '{function_call}': {source}")]
    InvalidArgs {
        function_call: String,
        #[source]
        source: serde_json::Error,
    },
}

impl MessageParseError {
    /// Create an invalid args error
    pub fn invalid_args(function_call: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidArgs {
            function_call: function_call.into(),
            source,
        }
    }
}
