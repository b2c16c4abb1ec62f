//! Bootstrap pages embedded in the binary

use aibridge_core::{ConfigurationError, VariantConfig};
use bytes::Bytes;
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct BootstrapAssets;

/// HTML page that loads the classifier inside the web view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPage {
    name: String,
    html: Bytes,
}

impl BootstrapPage {
    /// Page for the given variant
    pub fn for_variant(config: &VariantConfig) -> Result<Self, ConfigurationError> {
        Self::load(config.bootstrap_asset())
    }

    /// Load an embedded page by file name
    pub fn load(name: &str) -> Result<Self, ConfigurationError> {
        let file = <BootstrapAssets as Embed>::get(name)
            .ok_or_else(|| ConfigurationError::BootstrapMissing(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            html: Bytes::from(file.data.into_owned()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn html(&self) -> &Bytes {
        &self.html
    }

    /// Page text, lossy for non UTF-8 content
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibridge_core::Variant;

    #[test]
    fn test_every_variant_has_a_page() {
        for variant in Variant::ALL {
            let page = BootstrapPage::for_variant(&VariantConfig::new(variant)).unwrap();
            assert_eq!(page.name(), variant.bootstrap_asset());
            assert!(page.as_str().contains(variant.component_name()));
        }
    }

    #[test]
    fn test_missing_page() {
        assert_eq!(
            BootstrapPage::load("look_extension.html").unwrap_err(),
            ConfigurationError::BootstrapMissing("look_extension.html".to_string())
        );
    }
}
