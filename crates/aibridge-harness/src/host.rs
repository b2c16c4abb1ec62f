//! Headless stand-ins for the platform web view

use aibridge_bridge::{BootstrapPage, SurfaceSettings, WebSurface};
use aibridge_resources::{ResolveError, ResourceRequest, ResourceResponse, SchemeTask};
use bytes::{Bytes, BytesMut};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info};

/// A web view without a renderer.
///
/// Records what the component configured so the development server can
/// serve the bootstrap page itself.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    settings: RwLock<Option<SurfaceSettings>>,
    message_handler: RwLock<Option<String>>,
    scheme: RwLock<Option<String>>,
    page: RwLock<Option<BootstrapPage>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> Option<SurfaceSettings> {
        *self.settings.read()
    }

    pub fn message_handler(&self) -> Option<String> {
        self.message_handler.read().clone()
    }

    pub fn scheme(&self) -> Option<String> {
        self.scheme.read().clone()
    }

    /// The page the component asked to load
    pub fn page(&self) -> Option<BootstrapPage> {
        self.page.read().clone()
    }
}

impl WebSurface for HeadlessSurface {
    fn apply_settings(&self, settings: SurfaceSettings) {
        debug!(?settings, "surface settings applied");
        *self.settings.write() = Some(settings);
    }

    fn register_message_handler(&self, name: &str) {
        *self.message_handler.write() = Some(name.to_string());
    }

    fn register_scheme_handler(&self, scheme: &str) {
        *self.scheme.write() = Some(scheme.to_string());
    }

    fn load_page(&self, page: &BootstrapPage) -> aibridge_core::Result<()> {
        info!(page = page.name(), bytes = page.html().len(), "bootstrap page loaded");
        *self.page.write() = Some(page.clone());
        Ok(())
    }
}

/// What a scheme request delivered
#[derive(Debug, Clone)]
pub enum Delivery {
    Served {
        response: ResourceResponse,
        body: Bytes,
    },
    Failed(String),
    /// The request never ran
    Dropped,
}

/// Scheme task that buffers whatever the router delivers
#[derive(Debug)]
pub struct BufferedTask {
    url: String,
    response: Mutex<Option<ResourceResponse>>,
    body: Mutex<BytesMut>,
    outcome: Mutex<Option<Result<(), String>>>,
}

impl BufferedTask {
    pub fn new(url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            response: Mutex::new(None),
            body: Mutex::new(BytesMut::new()),
            outcome: Mutex::new(None),
        })
    }

    /// Collected delivery
    pub fn delivery(&self) -> Delivery {
        match self.outcome.lock().clone() {
            Some(Ok(())) => match self.response.lock().clone() {
                Some(response) => Delivery::Served {
                    response,
                    body: self.body.lock().clone().freeze(),
                },
                None => Delivery::Failed("finished without a response".to_string()),
            },
            Some(Err(message)) => Delivery::Failed(message),
            None => Delivery::Dropped,
        }
    }
}

impl SchemeTask for BufferedTask {
    fn url(&self) -> &str {
        &self.url
    }

    fn did_receive_response(&self, response: &ResourceResponse) {
        *self.response.lock() = Some(response.clone());
    }

    fn did_receive_data(&self, data: &Bytes) {
        self.body.lock().extend_from_slice(data);
    }

    fn did_finish(&self) {
        *self.outcome.lock() = Some(Ok(()));
    }

    fn did_fail(&self, error: &ResolveError) {
        *self.outcome.lock() = Some(Err(error.to_string()));
    }
}

/// Run one scheme request to completion through `serve`
pub fn fetch(url: &str, serve: impl FnOnce(&ResourceRequest)) -> Delivery {
    let task = BufferedTask::new(url);
    let request = ResourceRequest::new(task.clone());
    serve(&request);
    task.delivery()
}
