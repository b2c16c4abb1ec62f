//! Host web view capability

use crate::bootstrap::BootstrapPage;
use serde::Serialize;
use std::fmt::Debug;

/// Settings applied to the web view before any content loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurfaceSettings {
    /// Scripts may run in the page
    pub javascript_enabled: bool,

    /// Media plays inline instead of fullscreen
    pub inline_media_playback: bool,

    /// Media playback must be started by a user gesture
    pub media_requires_user_action: bool,
}

impl SurfaceSettings {
    /// Settings the classifier page needs to drive the camera or microphone
    pub fn classifier() -> Self {
        Self {
            javascript_enabled: true,
            inline_media_playback: true,
            media_requires_user_action: false,
        }
    }
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self::classifier()
    }
}

/// The platform web view an AI component is bound to.
///
/// Implementations route `appinventor:` fetches back to
/// [`crate::AiComponent::start_resource_request`] and posted messages to
/// [`crate::AiComponent::handle_message`].
pub trait WebSurface: Send + Sync + Debug {
    /// Apply view settings
    fn apply_settings(&self, settings: SurfaceSettings);

    /// Register the script message handler web content posts to
    fn register_message_handler(&self, name: &str);

    /// Register the private URL scheme handler
    fn register_scheme_handler(&self, scheme: &str);

    /// Load the bootstrap page
    fn load_page(&self, page: &BootstrapPage) -> aibridge_core::Result<()>;
}
