//! AI component variants
//!
//! Each component instance is bound to exactly one [`Variant`] when it is
//! constructed. Everything that differs between variants (URL prefixes,
//! bootstrap page, script message handler name) is derived from it here,
//! once, into a [`VariantConfig`].

use crate::types::SCHEME;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known AI component variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Image classifier using a transfer-learned or personally trained model
    PersonalImageClassifier,
    /// Audio classifier using a personally trained model
    PersonalAudioClassifier,
}

impl Variant {
    /// All known variants
    pub const ALL: [Variant; 2] = [Self::PersonalImageClassifier, Self::PersonalAudioClassifier];

    /// Kebab-case slug used in URL prefixes and configuration
    pub fn slug(&self) -> &'static str {
        match self {
            Self::PersonalImageClassifier => "personal-image-classifier",
            Self::PersonalAudioClassifier => "personal-audio-classifier",
        }
    }

    /// Component name, also used as the script message handler name
    pub fn component_name(&self) -> &'static str {
        match self {
            Self::PersonalImageClassifier => "PersonalImageClassifier",
            Self::PersonalAudioClassifier => "PersonalAudioClassifier",
        }
    }

    /// Name of the packaged bootstrap page
    pub fn bootstrap_asset(&self) -> &'static str {
        match self {
            Self::PersonalImageClassifier => "personal_image_classifier.html",
            Self::PersonalAudioClassifier => "personal_audio_classifier.html",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.slug() == s || v.component_name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown variant '{}', expected one of: {}",
                    s,
                    Self::ALL.map(|v| v.slug()).join(", ")
                )
            })
    }
}

/// Per-instance configuration derived from a [`Variant`].
///
/// Fields are private and there are no setters; the value is fixed for the
/// lifetime of the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfig {
    variant: Variant,
    scheme: &'static str,
    transfer_prefix: String,
    personal_prefix: String,
}

impl VariantConfig {
    /// Derive the configuration for `variant`
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            scheme: SCHEME,
            transfer_prefix: format!("{}:{}/transfer/", SCHEME, variant.slug()),
            personal_prefix: format!("{}:{}/personal/", SCHEME, variant.slug()),
        }
    }

    /// The bound variant
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Private URL scheme the router answers
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Prefix of URLs served from bundled assets
    pub fn transfer_prefix(&self) -> &str {
        &self.transfer_prefix
    }

    /// Prefix of URLs served from the personal model archive
    pub fn personal_prefix(&self) -> &str {
        &self.personal_prefix
    }

    /// Name of the bootstrap HTML page
    pub fn bootstrap_asset(&self) -> &'static str {
        self.variant.bootstrap_asset()
    }

    /// Name under which the script message handler is registered
    pub fn message_handler(&self) -> &'static str {
        self.variant.component_name()
    }
}

impl From<Variant> for VariantConfig {
    fn from(variant: Variant) -> Self {
        Self::new(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_classifier_prefixes() {
        let config = VariantConfig::new(Variant::PersonalImageClassifier);
        assert_eq!(
            config.transfer_prefix(),
            "appinventor:personal-image-classifier/transfer/"
        );
        assert_eq!(
            config.personal_prefix(),
            "appinventor:personal-image-classifier/personal/"
        );
        assert_eq!(config.bootstrap_asset(), "personal_image_classifier.html");
        assert_eq!(config.message_handler(), "PersonalImageClassifier");
    }

    #[test]
    fn test_variants_have_distinct_prefixes() {
        let image = VariantConfig::new(Variant::PersonalImageClassifier);
        let audio = VariantConfig::new(Variant::PersonalAudioClassifier);
        assert_ne!(image.transfer_prefix(), audio.transfer_prefix());
        assert_ne!(image.personal_prefix(), audio.personal_prefix());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(
            "personal-audio-classifier".parse::<Variant>().unwrap(),
            Variant::PersonalAudioClassifier
        );
        assert_eq!(
            "PersonalImageClassifier".parse::<Variant>().unwrap(),
            Variant::PersonalImageClassifier
        );
        assert!("look-extension".parse::<Variant>().is_err());
    }
}
