//! Rendering entry points used by the HTTP layer.
//!
//! A [`Renderer`] borrows a fully populated [`Registry`]: it resolves the
//! requested media type, builds the representation and serializes it.

use crate::collection::{CollectionProjector, Projection};
use crate::error::Result;
use crate::mime::{self, Format};
use crate::model::Model;
use crate::registry::Registry;
use crate::serializer::{StructuralSerializer, XmlOptions};

/// Serialized output plus what the HTTP layer needs to label it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: Vec<u8>,
    pub format: Format,
    /// The media type the caller asked for
    pub media_type: String,
}

impl Rendered {
    /// Value for a `Content-Type` header.
    ///
    /// Full `type/subtype` media types are echoed back; bare vendor tokens
    /// such as `vnd.acme.artist-v1+json` fall back to the format's generic
    /// content type.
    pub fn content_type(&self) -> String {
        if self.media_type.contains('/') {
            self.media_type.clone()
        } else {
            self.format.content_type()
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

/// Renders models against a registry.
#[derive(Debug, Clone)]
pub struct Renderer<'r> {
    registry: &'r Registry,
    options: XmlOptions,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, XmlOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: XmlOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Build (but do not serialize) a single model's representation.
    ///
    /// The XML root element is the lowercased type name.
    pub fn project(&self, model: &dyn Model, media_type: &str) -> Result<Projection> {
        let type_name = model.type_name();
        let resolution = mime::resolve(self.registry, type_name, media_type)?;
        let associations = self.registry.rendered_associations(type_name, media_type)?;
        let tree = self
            .registry
            .representation_builder()
            .build(model, resolution.version, &associations);

        Ok(Projection {
            root: self.registry.inflector().lowercase_type(type_name),
            tree,
            format: resolution.format,
        })
    }

    /// Render one model.
    ///
    /// # Errors
    /// `ModelNotFound` for undefined types, `MimeTypeNotRecognized` when no
    /// version matches, `UnsupportedFormat` when the matched media type names
    /// a format without a serializer.
    pub fn negotiate(&self, model: &dyn Model, media_type: &str) -> Result<Rendered> {
        let projection = self.project(model, media_type)?;
        self.finish(projection, media_type, true)
    }

    pub fn render(&self, model: &dyn Model, media_type: &str) -> Result<Vec<u8>> {
        Ok(self.negotiate(model, media_type)?.body)
    }

    /// Render a collection, inferring the type from its first element.
    pub fn negotiate_all(&self, models: &[&dyn Model], media_type: &str) -> Result<Rendered> {
        let projection = CollectionProjector::new(self.registry).project_all(models, media_type)?;
        self.finish(projection, media_type, false)
    }

    pub fn render_all(&self, models: &[&dyn Model], media_type: &str) -> Result<Vec<u8>> {
        Ok(self.negotiate_all(models, media_type)?.body)
    }

    /// Render a collection of an explicit type; an empty slice is allowed.
    pub fn render_all_as(
        &self,
        type_name: &str,
        models: &[&dyn Model],
        media_type: &str,
    ) -> Result<Vec<u8>> {
        let projection = CollectionProjector::new(self.registry)
            .project_all_as(type_name, models, media_type)?;
        Ok(self.finish(projection, media_type, false)?.body)
    }

    fn finish(
        &self,
        projection: Projection,
        media_type: &str,
        wrap_root: bool,
    ) -> Result<Rendered> {
        let serializer =
            StructuralSerializer::with_options(self.registry.inflector(), self.options.clone());
        let root = wrap_root.then_some(projection.root.as_str());
        let body = serializer.serialize(&projection.format, media_type, &projection.tree, root)?;

        Ok(Rendered {
            body,
            format: projection.format,
            media_type: media_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::model::Record;
    use crate::version::AttributeProjection;
    use std::sync::Arc;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.define("Artist");
        registry
            .register_version(
                "Artist",
                [
                    "application/vnd.acme.artist-v1+json",
                    "vnd.acme.artist-v1+xml",
                    "vnd.acme.artist-v1+yaml",
                ],
                Arc::new(AttributeProjection::new(["id", "name"])),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_negotiate_reports_content_type() {
        let registry = registry();
        let renderer = Renderer::new(&registry);
        let busta = Record::new("Artist", "busta-rhymes").with_attribute("name", "Busta Rhymes");

        let rendered = renderer
            .negotiate(&busta, "application/vnd.acme.artist-v1+json")
            .unwrap();
        assert_eq!(rendered.format, Format::Json);
        assert_eq!(rendered.content_type(), "application/vnd.acme.artist-v1+json");

        let rendered = renderer.negotiate(&busta, "vnd.acme.artist-v1+xml").unwrap();
        assert_eq!(rendered.content_type(), "application/xml");
    }

    #[test]
    fn test_single_model_xml_uses_type_root() {
        let registry = registry();
        let renderer = Renderer::new(&registry);
        let busta = Record::new("Artist", "busta-rhymes").with_attribute("name", "Busta Rhymes");

        let body = renderer.render(&busta, "vnd.acme.artist-v1+xml").unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("\n<artist>\n  <id>busta-rhymes</id>\n  <name>Busta Rhymes</name>\n"));
        assert!(body.contains("<link href=\"/artists/busta-rhymes\" rel=\"/self\"/>"));
    }

    #[test]
    fn test_registered_but_unserializable_format() {
        let registry = registry();
        let renderer = Renderer::new(&registry);
        let busta = Record::new("Artist", "busta-rhymes");

        let err = renderer.render(&busta, "vnd.acme.artist-v1+yaml").unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat { .. }));
        assert!(!err.is_negotiation_failure());
    }

    #[test]
    fn test_undefined_model_type() {
        let registry = registry();
        let renderer = Renderer::new(&registry);
        let gopher = Record::new("Gopher", "goldie");

        let err = renderer.render(&gopher, "application/vnd.acme.artist-v1+json").unwrap_err();
        assert!(matches!(err, RenderError::ModelNotFound(name) if name == "Gopher"));
    }

    #[test]
    fn test_render_all_as_empty() {
        let registry = registry();
        let renderer = Renderer::new(&registry);

        let body = renderer
            .render_all_as("Artist", &[], "application/vnd.acme.artist-v1+json")
            .unwrap();
        assert_eq!(body, br#"{"artists":[]}"#.to_vec());
    }
}
