//! Core constants and shared types for aibridge

/// Private URL scheme used exclusively for model resource fetches
pub const SCHEME: &str = "appinventor";

/// Suffix a model path must carry to be accepted
pub const MODEL_PATH_SUFFIX: &str = ".mdl";

/// Extension of the archive backing a personal model
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// MIME type of every payload served over the private scheme
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Integer error codes surfaced through the host's error-dispatch channel.
pub mod codes {
    /// Classification failed inside the web content
    pub const CLASSIFICATION_FAILED: i32 = -2;

    /// The component was used without a bound WebViewer
    pub const WEBVIEWER_REQUIRED: i32 = -7;

    /// The model path does not end in `.mdl`
    pub const INVALID_MODEL_FILE: i32 = -8;

    /// Human readable description of a known code
    pub fn describe(code: i32) -> Option<&'static str> {
        match code {
            CLASSIFICATION_FAILED => Some("classification failed"),
            WEBVIEWER_REQUIRED => Some("WebViewer required"),
            INVALID_MODEL_FILE => Some("invalid model file format"),
            _ => None,
        }
    }
}

/// Ordered list of classification category names.
///
/// Replaced wholesale every time the classifier reports `ready`.
pub type LabelSet = Vec<String>;
