//! Harness configuration
//!
//! Layered with the `config` crate: an optional file, then `AIBRIDGE_*`
//! environment variables, then command line overrides.

use crate::cli::ConfigOverrides;
use aibridge_core::Variant;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "AIBRIDGE";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Component variant to host
    pub variant: Variant,

    /// Directory holding bundled resources and model archives
    pub assets_dir: PathBuf,

    /// Model path applied at startup
    pub model_path: Option<String>,

    /// Listen address for `serve`
    pub listen: String,

    /// Listen port for `serve`
    pub port: u16,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            variant: Variant::PersonalImageClassifier,
            assets_dir: PathBuf::from("./assets"),
            model_path: None,
            listen: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl HarnessConfig {
    /// Load from `file` (extension optional, may be absent) and the environment
    pub fn load(file: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(variant) = overrides.variant {
            self.variant = variant;
        }
        if let Some(dir) = &overrides.assets_dir {
            self.assets_dir = dir.clone();
        }
        if let Some(model) = &overrides.model {
            self.model_path = Some(model.clone());
        }
        self
    }

    /// Socket address for `serve`
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_values_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(
            &path,
            "variant = \"personal-audio-classifier\"\nport = 8088\nassets_dir = \"/srv/models\"\n",
        )
        .unwrap();

        let config = HarnessConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.variant, Variant::PersonalAudioClassifier);
        assert_eq!(config.port, 8088);
        assert_eq!(config.listen, "127.0.0.1");

        let config = config.with_overrides(&ConfigOverrides {
            model: Some("birds.mdl".to_string()),
            ..Default::default()
        });
        assert_eq!(config.model_path.as_deref(), Some("birds.mdl"));
        assert_eq!(config.assets_dir, PathBuf::from("/srv/models"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = HarnessConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.variant, Variant::PersonalImageClassifier);
        assert_eq!(config.socket_addr().unwrap().port(), config.port);
    }
}
