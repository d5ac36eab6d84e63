//! Engine configuration loader.
//!
//! Loads model registrations, relationship-type extensions and XML output
//! options from YAML and applies them to a [`Registry`].
//!
//! ```yaml
//! relationship_types: [service]
//! xml:
//!   indent: 2
//!   link_style: attributes
//! models:
//!   Artist:
//!     mime_types:
//!       - media_types: [application/json, application/vnd.acme.artist-v1+json]
//!         attributes: [id, name]
//!     associations:
//!       - name: groups
//!         media_types: [application/vnd.acme.artist-v2+json]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{RenderError, Result};
use crate::registry::Registry;
use crate::serializer::XmlOptions;
use crate::version::AttributeProjection;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Relationship-type tokens added to the default vocabulary
    #[serde(default)]
    pub relationship_types: Vec<String>,

    #[serde(default)]
    pub xml: XmlOptions,

    /// Model configurations: type name -> config, in file order
    #[serde(default)]
    pub models: IndexMap<String, ModelConfig>,
}

/// Registrations for one model type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub mime_types: Vec<MimeTypeConfig>,

    /// Legacy spelling of `mime_types`; still honoured with a warning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<MimeTypeConfig>,

    #[serde(default)]
    pub associations: Vec<AssociationConfig>,
}

/// Media types sharing one attribute projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MimeTypeConfig {
    pub media_types: Vec<String>,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationConfig {
    pub name: String,
    #[serde(default)]
    pub media_types: Vec<String>,
}

impl EngineConfig {
    /// Load engine configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid YAML, or fails
    /// validation.
    ///
    /// # Example
    /// ```ignore
    /// use hyperrender::EngineConfig;
    ///
    /// let config = EngineConfig::load_from_file("config/representations.yaml")?;
    /// config.apply(&mut registry)?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for entries that can never match.
    pub fn validate(&self) -> Result<()> {
        for (type_name, model) in &self.models {
            if type_name.trim().is_empty() {
                return Err(RenderError::Config("Model type name cannot be empty".to_string()));
            }

            for mime in model.mime_types.iter().chain(&model.versions) {
                if mime.media_types.is_empty() {
                    return Err(RenderError::Config(format!(
                        "Model '{}' has a mime type group without media types",
                        type_name
                    )));
                }
                if let Some(blank) = mime.media_types.iter().find(|mt| mt.trim().is_empty()) {
                    return Err(RenderError::Config(format!(
                        "Model '{}' has an empty media type ({:?})",
                        type_name, blank
                    )));
                }
            }

            if let Some(assoc) = model.associations.iter().find(|a| a.name.trim().is_empty()) {
                return Err(RenderError::Config(format!(
                    "Model '{}' has an association without a name ({:?})",
                    type_name, assoc
                )));
            }
        }
        Ok(())
    }

    /// Apply every registration to `registry`, in file order.
    ///
    /// Models are defined if needed; relationship-type extensions replace
    /// any previously configured ones.
    pub fn apply(&self, registry: &mut Registry) -> Result<()> {
        registry.configure_relationship_types(self.relationship_types.iter().cloned());

        for (type_name, model) in &self.models {
            registry.define(type_name.as_str());

            for mime in &model.mime_types {
                registry.register_version(
                    type_name,
                    mime.media_types.iter().cloned(),
                    Arc::new(AttributeProjection::new(mime.attributes.iter().cloned())),
                )?;
            }

            for mime in &model.versions {
                tracing::warn!(
                    "[DEPRECATION] `versions` is deprecated for model '{}'. Please use `mime_types` instead.",
                    type_name
                );
                registry.register_version(
                    type_name,
                    mime.media_types.iter().cloned(),
                    Arc::new(AttributeProjection::new(mime.attributes.iter().cloned())),
                )?;
            }

            for assoc in &model.associations {
                registry.declare_association(
                    type_name,
                    &assoc.name,
                    assoc.media_types.iter().cloned(),
                )?;
            }
        }

        tracing::info!("Applied configuration for {} model type(s)", self.models.len());
        Ok(())
    }

    /// Build a registry containing only this configuration
    pub fn to_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        self.apply(&mut registry)?;
        Ok(registry)
    }

    pub fn xml_options(&self) -> XmlOptions {
        self.xml.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::LinkStyle;

    const CONFIG: &str = r#"
relationship_types: [service]
xml:
  link_style: elements
models:
  Artist:
    mime_types:
      - media_types: [application/json, application/vnd.acme.artist-v1+json]
        attributes: [id, name]
      - media_types: [application/vnd.acme.artist-v2+json]
        attributes: [id, name, aliases]
    associations:
      - name: groups
        media_types: [application/vnd.acme.artist-v2+json]
      - name: labels
  Group:
    mime_types:
      - media_types: [application/json]
        attributes: [id, name]
"#;

    #[test]
    fn test_parse_config() {
        let config = EngineConfig::from_yaml_str(CONFIG).unwrap();

        assert_eq!(config.relationship_types, vec!["service"]);
        assert_eq!(config.xml.link_style, LinkStyle::Elements);
        assert_eq!(config.xml.indent, 2);

        let names: Vec<&String> = config.models.keys().collect();
        assert_eq!(names, vec!["Artist", "Group"]);
        assert_eq!(config.models["Artist"].mime_types.len(), 2);
        assert!(config.models["Artist"].associations[1].media_types.is_empty());
    }

    #[test]
    fn test_apply_registers_everything() {
        let config = EngineConfig::from_yaml_str(CONFIG).unwrap();
        let registry = config.to_registry().unwrap();

        assert_eq!(registry.model_types(), vec!["Artist", "Group"]);
        assert_eq!(
            registry.acceptable_media_types("Artist").unwrap(),
            vec![
                "application/json",
                "application/vnd.acme.artist-v1+json",
                "application/vnd.acme.artist-v2+json"
            ]
        );
        assert_eq!(
            registry.associations_for("Artist", None).unwrap(),
            vec!["groups", "labels"]
        );
        assert!(registry.relationship_types().contains("service"));
    }

    #[test]
    fn test_legacy_versions_key_still_registers() {
        let yaml = r#"
models:
  Artist:
    versions:
      - media_types: [vnd.acme.artist-v3+xml]
        attributes: [name]
"#;
        let registry = EngineConfig::from_yaml_str(yaml).unwrap().to_registry().unwrap();
        assert!(registry.lookup("Artist", "vnd.acme.artist-v3+xml").unwrap().is_some());
    }

    #[test]
    fn test_validation_rejects_empty_media_types() {
        let yaml = r#"
models:
  Artist:
    mime_types:
      - media_types: []
        attributes: [id]
"#;
        let err = EngineConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, RenderError::Config(msg) if msg.contains("without media types")));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = EngineConfig::from_yaml_str("models: [").unwrap_err();
        assert!(matches!(err, RenderError::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load_from_file("/nonexistent/representations.yaml").unwrap_err();
        let RenderError::Config(msg) = &err else {
            panic!("read failures should be configuration errors, got {:?}", err);
        };
        assert!(msg.contains("Failed to read config file"));
        assert!(msg.contains("/nonexistent/representations.yaml"));
    }
}
