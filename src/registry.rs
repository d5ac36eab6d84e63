//! Explicit registry of model types, their versions and associations.
//!
//! The registry is populated during start-up (or from an
//! [`EngineConfig`](crate::config::EngineConfig)) and then shared read-only
//! with the renderer. Mutation needs `&mut Registry`, so registration can
//! never happen from inside a rendering call.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::association::AssociationSet;
use crate::error::{RenderError, Result};
use crate::model::ModelType;
use crate::naming::{EnglishInflector, Inflector};
use crate::relationship::RelationshipTypes;
use crate::representation::RepresentationBuilder;
use crate::version::{Projector, VersionEntry, VersionSet};

/// Versions and associations registered for one model type.
#[derive(Debug, Clone, Default)]
pub struct ModelSchema {
    versions: VersionSet,
    associations: AssociationSet,
}

impl ModelSchema {
    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    pub fn associations(&self) -> &AssociationSet {
        &self.associations
    }
}

/// Registry for model types and the naming conventions used to render them
pub struct Registry {
    models: IndexMap<String, ModelSchema>,
    relationship_types: RelationshipTypes,
    inflector: Arc<dyn Inflector>,
}

impl Registry {
    /// Create an empty registry using the default English inflector
    pub fn new() -> Self {
        Self::with_inflector(Arc::new(EnglishInflector::new()))
    }

    /// Create an empty registry with a custom inflector
    pub fn with_inflector(inflector: Arc<dyn Inflector>) -> Self {
        Self {
            models: IndexMap::new(),
            relationship_types: RelationshipTypes::new(),
            inflector,
        }
    }

    /// Define a model type.
    ///
    /// Defining an already-defined type keeps its existing registrations.
    /// Returns `true` if the type is new.
    pub fn define(&mut self, type_name: impl Into<String>) -> bool {
        let type_name = type_name.into();
        if self.models.contains_key(&type_name) {
            return false;
        }
        tracing::debug!("Defined model type {}", type_name);
        self.models.insert(type_name, ModelSchema::default());
        true
    }

    /// Define a statically named model type
    pub fn define_type<T: ModelType>(&mut self) -> bool {
        self.define(T::NAME)
    }

    pub fn is_defined(&self, type_name: &str) -> bool {
        self.models.contains_key(type_name)
    }

    /// Remove a model type and everything registered for it.
    ///
    /// Returns `true` if the type was defined.
    pub fn reset(&mut self, type_name: &str) -> bool {
        let removed = self.models.shift_remove(type_name).is_some();
        if removed {
            tracing::debug!("Reset model type {}", type_name);
        }
        removed
    }

    /// Remove every model type and restore the default relationship types
    pub fn clear(&mut self) {
        self.models.clear();
        self.relationship_types = RelationshipTypes::new();
    }

    /// Names of all defined model types, in definition order
    pub fn model_types(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn schema(&self, type_name: &str) -> Result<&ModelSchema> {
        self.models
            .get(type_name)
            .ok_or_else(|| RenderError::ModelNotFound(type_name.to_string()))
    }

    fn schema_mut(&mut self, type_name: &str) -> Result<&mut ModelSchema> {
        self.models
            .get_mut(type_name)
            .ok_or_else(|| RenderError::ModelNotFound(type_name.to_string()))
    }

    /// Map media types to an attribute projection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use hyperrender::{Attributes, Model, Registry};
    /// use std::sync::Arc;
    ///
    /// let mut registry = Registry::new();
    /// registry.define("Artist");
    /// registry.register_version(
    ///     "Artist",
    ///     ["vnd.acme.artist-v1+json", "vnd.acme.artist-v1+xml"],
    ///     Arc::new(|artist: &dyn Model| {
    ///         let mut attrs = Attributes::new();
    ///         attrs.insert("id".to_string(), artist.id().into());
    ///         attrs
    ///     }),
    /// )?;
    /// ```
    pub fn register_version<I, S>(
        &mut self,
        type_name: &str,
        media_types: I,
        projector: Arc<dyn Projector>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = self.schema_mut(type_name)?;
        let before = schema.versions.len();
        schema.versions.register(media_types, projector);
        tracing::debug!(
            "Registered {} media type(s) for {}",
            schema.versions.len() - before,
            type_name
        );
        Ok(())
    }

    /// Legacy spelling of [`Registry::register_version`].
    #[deprecated(note = "use `register_version` instead")]
    pub fn version<I, S>(
        &mut self,
        type_name: &str,
        media_types: I,
        projector: Arc<dyn Projector>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tracing::warn!("[DEPRECATION] `version` is deprecated. Please use `register_version` instead.");
        self.register_version(type_name, media_types, projector)
    }

    /// Declare an association, optionally scoped to media types.
    ///
    /// Re-declaring a name leaves the first declaration untouched.
    pub fn declare_association<I, S>(
        &mut self,
        type_name: &str,
        name: &str,
        media_types: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = self.schema_mut(type_name)?;
        if !schema.associations.declare(name, media_types) {
            tracing::debug!("Association {}.{} already declared, keeping first", type_name, name);
        }
        Ok(())
    }

    /// Association names for a type, optionally restricted to a media type.
    ///
    /// See [`AssociationSet::names_for`] for the scoping rules.
    pub fn associations_for(
        &self,
        type_name: &str,
        media_type: Option<&str>,
    ) -> Result<Vec<String>> {
        Ok(self.schema(type_name)?.associations.names_for(media_type))
    }

    /// Associations embedded when rendering `type_name` as `media_type`
    pub fn rendered_associations(&self, type_name: &str, media_type: &str) -> Result<Vec<String>> {
        Ok(self.schema(type_name)?.associations.names_for_rendering(media_type))
    }

    /// First version entry of `type_name` registered for `media_type`
    pub fn lookup(&self, type_name: &str, media_type: &str) -> Result<Option<&VersionEntry>> {
        Ok(self.schema(type_name)?.versions.lookup(media_type))
    }

    /// Every media type a type can be rendered as, in registration order.
    ///
    /// HTTP layers use this to advertise or pre-filter acceptable types.
    pub fn acceptable_media_types(&self, type_name: &str) -> Result<Vec<&str>> {
        Ok(self.schema(type_name)?.versions.media_types())
    }

    /// Replace the configured relationship-type extensions.
    ///
    /// The default tokens are always kept; `extra` is appended to them.
    pub fn configure_relationship_types<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationship_types = RelationshipTypes::with_extensions(extra);
        tracing::debug!(
            "Relationship types: {}",
            self.relationship_types.tokens().join(", ")
        );
    }

    pub fn relationship_types(&self) -> &RelationshipTypes {
        &self.relationship_types
    }

    pub fn inflector(&self) -> &dyn Inflector {
        self.inflector.as_ref()
    }

    /// Builder wired to this registry's naming and relationship vocabulary
    pub fn representation_builder(&self) -> RepresentationBuilder<'_> {
        RepresentationBuilder::new(self.inflector.as_ref(), &self.relationship_types)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("models", &self.models)
            .field("relationship_types", &self.relationship_types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, Model};
    use crate::version::AttributeProjection;

    struct Artist;

    impl ModelType for Artist {
        const NAME: &'static str = "Artist";
    }

    fn id_only(model: &dyn Model) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("id".to_string(), model.id().into());
        attrs
    }

    #[test]
    fn test_registration_requires_definition() {
        let mut registry = Registry::new();
        let result = registry.register_version("Gopher", ["json"], Arc::new(id_only));
        assert!(matches!(result, Err(RenderError::ModelNotFound(name)) if name == "Gopher"));

        let result = registry.declare_association("Gopher", "groups", Vec::<String>::new());
        assert!(matches!(result, Err(RenderError::ModelNotFound(_))));
    }

    #[test]
    fn test_lookup_returns_registered_projector() {
        let mut registry = Registry::new();
        registry.define_type::<Artist>();

        let projector: Arc<dyn Projector> = Arc::new(id_only);
        registry
            .register_version("Artist", ["vnd.acme.artist-v1+json"], Arc::clone(&projector))
            .unwrap();

        let entry = registry
            .lookup("Artist", "vnd.acme.artist-v1+json")
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(entry.projector(), &projector));
        assert!(registry.lookup("Artist", "vnd.acme.artist-v2+json").unwrap().is_none());
    }

    #[test]
    #[allow(deprecated)]
    fn test_deprecated_version_still_registers() {
        let mut registry = Registry::new();
        registry.define("Artist");
        registry
            .version(
                "Artist",
                ["vnd.acme.artist-v3+xml"],
                Arc::new(AttributeProjection::new(["name"])),
            )
            .unwrap();

        assert_eq!(
            registry.acceptable_media_types("Artist").unwrap(),
            vec!["vnd.acme.artist-v3+xml"]
        );
    }

    #[test]
    fn test_define_is_idempotent_and_reset_removes() {
        let mut registry = Registry::new();
        assert!(registry.define("Artist"));
        registry.register_version("Artist", ["json"], Arc::new(id_only)).unwrap();
        assert!(!registry.define("Artist"));
        assert_eq!(registry.acceptable_media_types("Artist").unwrap().len(), 1);

        assert!(registry.reset("Artist"));
        assert!(!registry.is_defined("Artist"));
        assert!(!registry.reset("Artist"));
        assert!(matches!(registry.lookup("Artist", "json"), Err(RenderError::ModelNotFound(_))));
    }

    #[test]
    fn test_association_queries() {
        let mut registry = Registry::new();
        registry.define("Artist");
        registry
            .declare_association("Artist", "groups", ["application/vnd.acme.artist-v2+json"])
            .unwrap();
        registry.declare_association("Artist", "labels", Vec::<String>::new()).unwrap();

        assert_eq!(registry.associations_for("Artist", None).unwrap(), vec!["groups", "labels"]);
        assert_eq!(
            registry
                .associations_for("Artist", Some("application/vnd.acme.artist-v2+json"))
                .unwrap(),
            vec!["groups"]
        );
    }

    #[test]
    fn test_configure_relationship_types_replaces_extensions() {
        let mut registry = Registry::new();
        registry.configure_relationship_types(["service"]);
        assert!(registry.relationship_types().contains("service"));

        registry.configure_relationship_types(["sibling"]);
        assert!(!registry.relationship_types().contains("service"));
        assert!(registry.relationship_types().contains("sibling"));
        assert!(registry.relationship_types().contains("part_of"));

        registry.clear();
        assert!(registry.relationship_types().extensions().is_empty());
    }
}
