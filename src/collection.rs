//! Projection of model sequences under a pluralized root key.

use crate::error::{RenderError, Result};
use crate::mime::{self, Format};
use crate::model::Model;
use crate::registry::Registry;
use crate::representation::{Node, Representation};

/// A built tree together with the format it should be rendered in.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Root key (collections) or root element name (single models)
    pub root: String,
    pub tree: Representation,
    pub format: Format,
}

/// Builds collection representations.
#[derive(Debug, Clone, Copy)]
pub struct CollectionProjector<'r> {
    registry: &'r Registry,
}

impl<'r> CollectionProjector<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Project every model, inferring the type from the first element.
    ///
    /// The version and format are resolved once; an empty slice fails with
    /// `EmptyCollection`.
    pub fn project_all(&self, models: &[&dyn Model], media_type: &str) -> Result<Projection> {
        let first = models.first().ok_or(RenderError::EmptyCollection)?;
        self.project_all_as(first.type_name(), models, media_type)
    }

    /// Project every model as `type_name`.
    ///
    /// The explicit type makes an empty slice valid: it yields an empty
    /// sequence under the pluralized key.
    pub fn project_all_as(
        &self,
        type_name: &str,
        models: &[&dyn Model],
        media_type: &str,
    ) -> Result<Projection> {
        let resolution = mime::resolve(self.registry, type_name, media_type)?;
        let associations = self.registry.rendered_associations(type_name, media_type)?;
        let builder = self.registry.representation_builder();

        let items = models
            .iter()
            .map(|model| builder.build(*model, resolution.version, &associations))
            .collect();

        let root = self.registry.inflector().collection_name(type_name);
        let mut tree = Representation::new();
        tree.insert(root.clone(), Node::Sequence(items));

        tracing::debug!(
            "Projected {} {} as {}",
            models.len(),
            root,
            resolution.format
        );

        Ok(Projection {
            root,
            tree,
            format: resolution.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::version::AttributeProjection;
    use serde_json::json;
    use std::sync::Arc;

    const V1_JSON: &str = "vnd.acme.artist-v1+json";

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.define("Artist");
        registry
            .register_version(
                "Artist",
                [V1_JSON, "vnd.acme.artist-v1+xml"],
                Arc::new(AttributeProjection::new(["id", "name"])),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_project_all_wraps_under_plural_key() {
        let registry = registry();
        let busta = Record::new("Artist", "busta-rhymes").with_attribute("name", "Busta Rhymes");
        let jayz = Record::new("Artist", "jay-z").with_attribute("name", "Jay-Z");

        let projection = CollectionProjector::new(&registry)
            .project_all(&[&busta, &jayz], V1_JSON)
            .unwrap();

        assert_eq!(projection.root, "artists");
        assert_eq!(projection.format, Format::Json);
        assert_eq!(
            projection.tree.to_value(),
            json!({
                "artists": [
                    {"id": "busta-rhymes", "name": "Busta Rhymes",
                     "links": [{"href": "/artists/busta-rhymes", "rel": "/self"}]},
                    {"id": "jay-z", "name": "Jay-Z",
                     "links": [{"href": "/artists/jay-z", "rel": "/self"}]}
                ]
            })
        );
    }

    #[test]
    fn test_empty_collection_without_hint_fails() {
        let registry = registry();
        let err = CollectionProjector::new(&registry)
            .project_all(&[], V1_JSON)
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyCollection));
    }

    #[test]
    fn test_empty_collection_with_hint() {
        let registry = registry();
        let projection = CollectionProjector::new(&registry)
            .project_all_as("Artist", &[], V1_JSON)
            .unwrap();
        assert_eq!(projection.tree.to_value(), json!({"artists": []}));
    }

    #[test]
    fn test_unknown_media_type_fails() {
        let registry = registry();
        let busta = Record::new("Artist", "busta-rhymes");
        let err = CollectionProjector::new(&registry)
            .project_all(&[&busta], "vnd.acme.artist-v9+json")
            .unwrap_err();
        assert!(matches!(err, RenderError::MimeTypeNotRecognized(_)));
    }
}
