use crate::config::HarnessConfig;
use crate::host::HeadlessSurface;
use aibridge_bridge::AiComponent;
use aibridge_core::{HostErrorDispatcher, TracingDispatcher};
use aibridge_resources::{AssetSource, DirectoryAssets};
use std::sync::Arc;

/// Shared harness state
#[derive(Clone)]
pub struct HarnessState {
    /// Hosted component
    pub component: Arc<AiComponent>,

    /// Headless view the component is bound to
    pub surface: Arc<HeadlessSurface>,

    pub config: Arc<HarnessConfig>,
}

impl HarnessState {
    /// Build a component over the configured asset directory and bind it
    pub fn new(config: HarnessConfig) -> anyhow::Result<Self> {
        let assets: Arc<dyn AssetSource> = Arc::new(DirectoryAssets::new(config.assets_dir.clone()));
        Self::with_assets(config, assets, Arc::new(TracingDispatcher))
    }

    pub fn with_assets(
        config: HarnessConfig,
        assets: Arc<dyn AssetSource>,
        host: Arc<dyn HostErrorDispatcher>,
    ) -> anyhow::Result<Self> {
        let component = Arc::new(AiComponent::new(config.variant, assets, host));
        let surface = Arc::new(HeadlessSurface::new());
        component.bind_view(surface.clone())?;
        component.initialize();

        if let Some(path) = &config.model_path {
            component.set_model_path(path);
        }

        Ok(Self {
            component,
            surface,
            config: Arc::new(config),
        })
    }
}
