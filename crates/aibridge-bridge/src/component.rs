//! AI component facade
//!
//! [`AiComponent`] ties one variant's pieces together: the model path
//! validator, the resource router, the message bridge and the classifier
//! event sink. A host binds exactly one [`WebSurface`] to it and then routes
//! scheme fetches and posted messages back into it.

use crate::bootstrap::BootstrapPage;
use crate::bridge::{Dispatched, MessageBridge};
use crate::classifier::{sink_for, ClassifierEvent};
use crate::event_bus::EventBus;
use crate::view::{SurfaceSettings, WebSurface};
use aibridge_core::{
    codes, BridgeMetrics, ClassifierEventSink, ConfigurationError, ErrorReport,
    HostErrorDispatcher, LabelSet, MessageParseError, ModelPath, ModelPathCell,
    ModelPathValidator, Variant, VariantConfig, SCHEME,
};
use aibridge_resources::{AssetSource, ModelResourceRouter, ResolveError, ResourceRequest};
use bytes::Bytes;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use tracing::info;

/// One AI component instance bound to a single variant
pub struct AiComponent {
    config: VariantConfig,
    host: Arc<dyn HostErrorDispatcher>,
    view: OnceLock<Arc<dyn WebSurface>>,
    validator: ModelPathValidator,
    router: Arc<ModelResourceRouter>,
    bridge: MessageBridge,
    bus: Arc<EventBus>,
    metrics: BridgeMetrics,
}

impl AiComponent {
    /// Build a component whose events go to its own event bus
    pub fn new(
        variant: Variant,
        assets: Arc<dyn AssetSource>,
        host: Arc<dyn HostErrorDispatcher>,
    ) -> Self {
        let bus = Arc::new(EventBus::default());
        let sink = sink_for(variant, bus.clone());
        Self::build(variant, assets, host, sink, bus)
    }

    /// Build a component that forwards bridge notifications to `sink`.
    ///
    /// Nothing is published on the event bus in this mode.
    pub fn with_sink(
        variant: Variant,
        assets: Arc<dyn AssetSource>,
        host: Arc<dyn HostErrorDispatcher>,
        sink: Arc<dyn ClassifierEventSink>,
    ) -> Self {
        Self::build(variant, assets, host, sink, Arc::new(EventBus::default()))
    }

    fn build(
        variant: Variant,
        assets: Arc<dyn AssetSource>,
        host: Arc<dyn HostErrorDispatcher>,
        sink: Arc<dyn ClassifierEventSink>,
        bus: Arc<EventBus>,
    ) -> Self {
        let config = VariantConfig::new(variant);
        let metrics = BridgeMetrics::new();
        let cell = ModelPathCell::new();
        let validator = ModelPathValidator::new(
            config.message_handler(),
            cell.clone(),
            host.clone(),
            metrics.clone(),
        );
        let router = ModelResourceRouter::new(SCHEME, assets, cell, metrics.clone());

        Self {
            bridge: MessageBridge::new(sink, metrics.clone()),
            config,
            host,
            view: OnceLock::new(),
            validator,
            router: Arc::new(router),
            bus,
            metrics,
        }
    }

    /// Bind the web view. Allowed once per component.
    ///
    /// The view counts as bound only once its page has loaded, so a failed
    /// bind can be retried.
    pub fn bind_view(&self, surface: Arc<dyn WebSurface>) -> aibridge_core::Result<()> {
        if self.view.get().is_some() {
            return Err(ConfigurationError::ViewAlreadyBound.into());
        }
        let page = BootstrapPage::for_variant(&self.config)?;

        surface.apply_settings(SurfaceSettings::classifier());
        surface.register_message_handler(self.config.message_handler());
        surface.register_scheme_handler(self.config.scheme());
        // Prefixes derive from the fixed config, so an earlier failed bind
        // already bound the same ones
        if self.router.prefixes().is_none() {
            self.router.configure_for(&self.config)?;
        }
        surface.load_page(&page)?;

        self.view
            .set(surface)
            .map_err(|_| ConfigurationError::ViewAlreadyBound)?;

        info!(
            component = self.config.message_handler(),
            page = page.name(),
            "web view bound"
        );
        Ok(())
    }

    /// The bound web view
    pub fn view(&self) -> Result<Arc<dyn WebSurface>, ConfigurationError> {
        self.view.get().cloned().ok_or(ConfigurationError::ViewerRequired)
    }

    /// Check the component is usable, reporting a missing web view to the host
    pub fn initialize(&self) {
        if self.view.get().is_some() {
            return;
        }
        self.metrics.record_config_error();
        self.host.dispatch_error(ErrorReport::new(
            self.config.message_handler(),
            "WebViewer",
            codes::WEBVIEWER_REQUIRED,
            format!("{}: A WebViewer is required", codes::WEBVIEWER_REQUIRED),
        ));
    }

    /// Set the model path; invalid paths are reported to the host
    pub fn set_model_path(&self, path: &str) {
        self.validator.set_model_path(path);
    }

    pub fn model_path(&self) -> Option<ModelPath> {
        self.validator.current()
    }

    /// Handle a message posted by web content
    pub fn handle_message(&self, body: &Value) {
        self.bridge.handle(body);
    }

    pub fn handle_message_str(&self, raw: &str) {
        self.bridge.handle_str(raw);
    }

    /// Handle a message and return the typed outcome
    pub fn try_handle_message(&self, body: &Value) -> Result<Dispatched, MessageParseError> {
        self.bridge.try_handle(body)
    }

    /// Labels from the most recent `ready` message
    pub fn labels(&self) -> LabelSet {
        self.bridge.labels()
    }

    /// Resolve a scheme URL without a request lifecycle
    pub fn resolve(&self, url: &str) -> Result<Bytes, ResolveError> {
        self.router.resolve(url)
    }

    /// Serve a scheme request from the web view
    pub fn start_resource_request(&self, request: &ResourceRequest) {
        self.router.start(request);
    }

    /// The web view abandoned a scheme request
    pub fn stop_resource_request(&self, request: &ResourceRequest) {
        self.router.stop(request);
    }

    /// Subscribe to classifier events
    pub fn subscribe(&self) -> broadcast::Receiver<ClassifierEvent> {
        self.bus.subscribe()
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Shared router, for hosts that resolve off the calling thread
    pub fn router(&self) -> Arc<ModelResourceRouter> {
        self.router.clone()
    }
}

impl std::fmt::Debug for AiComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiComponent")
            .field("variant", &self.config.variant())
            .field("view_bound", &self.view.get().is_some())
            .field("model_path", &self.validator.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibridge_resources::MemoryAssets;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct RecordingHost {
        reports: Mutex<Vec<ErrorReport>>,
    }

    impl HostErrorDispatcher for RecordingHost {
        fn dispatch_error(&self, report: ErrorReport) {
            self.reports.lock().push(report);
        }
    }

    fn component() -> (AiComponent, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        let component = AiComponent::new(
            Variant::PersonalImageClassifier,
            Arc::new(MemoryAssets::new()),
            host.clone(),
        );
        (component, host)
    }

    #[test]
    fn test_view_required_before_binding() {
        let (component, _) = component();
        assert_eq!(component.view().unwrap_err(), ConfigurationError::ViewerRequired);
    }

    #[test]
    fn test_initialize_without_view_reports_once() {
        let (component, host) = component();
        component.initialize();

        let reports = host.reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].code, -7);
        assert_eq!(reports[0].function, "WebViewer");
        assert_eq!(reports[0].component, "PersonalImageClassifier");
    }

    #[test]
    fn test_invalid_model_path_goes_through_host() {
        let (component, host) = component();
        component.set_model_path("flowers.mdl");
        component.set_model_path("flowers.zip");

        assert_eq!(component.model_path().unwrap().as_str(), "flowers.mdl");
        assert_eq!(host.reports.lock()[0].code, codes::INVALID_MODEL_FILE);
    }
}
