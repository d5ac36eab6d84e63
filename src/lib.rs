//! # Hyperrender: Versioned Hypermedia Representations
//!
//! Hyperrender turns domain models into versioned, link-rich JSON or XML
//! representations selected by media type.
//!
//! ## Features
//!
//! - **Media-type versioning**: map exact media types to attribute projections
//! - **Associations**: embed related models with `/children` links, optionally per version
//! - **Relationship links**: `part_of`, `next`, `same_as`, ... accessors become `/partOf`-style links
//! - **Structural serializers**: JSON via serde, XML with singularized sequence items
//! - **YAML configuration**: declare models, versions and associations without code
//!
//! ## Example
//!
//! ```ignore
//! use hyperrender::{AttributeProjection, Record, Registry, Renderer};
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! registry.define("Artist");
//! registry.register_version(
//!     "Artist",
//!     ["application/vnd.acme.artist-v1+json", "application/vnd.acme.artist-v1+xml"],
//!     Arc::new(AttributeProjection::new(["id", "name"])),
//! )?;
//!
//! let busta = Record::new("Artist", "busta-rhymes").with_attribute("name", "Busta Rhymes");
//! let body = Renderer::new(&registry).render(&busta, "application/vnd.acme.artist-v1+json")?;
//! // {"id":"busta-rhymes","name":"Busta Rhymes","links":[{"href":"/artists/busta-rhymes","rel":"/self"}]}
//! ```

// Core modules
pub mod error;
pub mod model;
pub mod naming;

// Registration
pub mod association;
pub mod relationship;
pub mod registry;
pub mod version;

// Negotiation and building
pub mod collection;
pub mod links;
pub mod mime;
pub mod representation;

// Output
pub mod render;
pub mod serializer;

pub mod config;

// Re-export key types
pub use association::{AssociationEntry, AssociationSet};
pub use collection::{CollectionProjector, Projection};
pub use config::{AssociationConfig, EngineConfig, MimeTypeConfig, ModelConfig};
pub use error::{RenderError, Result};
pub use links::{Link, LinkBuilder};
pub use mime::{resolve, Format, Resolution};
pub use model::{Attributes, Model, ModelRef, ModelType, Record, Related};
pub use naming::{EnglishInflector, Inflector};
pub use registry::{ModelSchema, Registry};
pub use relationship::{RelationshipTypes, DEFAULT_RELATIONSHIP_TYPES};
pub use render::{Rendered, Renderer};
pub use representation::{Node, Representation, RepresentationBuilder};
pub use serializer::{LinkStyle, StructuralSerializer, XmlOptions};
pub use version::{AttributeProjection, Projector, VersionEntry, VersionSet};
