//! Representation trees and the builder that produces them.
//!
//! A [`Representation`] is the format-neutral intermediate structure handed to
//! the serializer: projected attributes, embedded associations and the
//! reserved `links` sequence.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{RenderError, Result};
use crate::links::{Link, LinkBuilder};
use crate::model::{Attributes, Model};
use crate::naming::Inflector;
use crate::relationship::RelationshipTypes;
use crate::version::VersionEntry;

/// Reserved key holding the link sequence.
pub const LINKS_KEY: &str = "links";

/// A value in a representation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain JSON value (strings, numbers, booleans, null, arrays of scalars)
    Scalar(Value),
    /// Nested object
    Object(Representation),
    /// Ordered sequence of nested objects
    Sequence(Vec<Representation>),
    /// Hypermedia links
    Links(Vec<Link>),
}

impl Node {
    /// Classify an arbitrary JSON value.
    ///
    /// Objects become nested representations and non-empty arrays of objects
    /// become sequences; everything else stays scalar.
    pub fn from_value(value: Value) -> Node {
        match value {
            Value::Object(map) => Node::Object(Representation::from_json_map(map)),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                Node::Sequence(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(map) => Some(Representation::from_json_map(map)),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Node::Scalar(other),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(value) => value.clone(),
            Node::Object(rep) => rep.to_value(),
            Node::Sequence(items) => {
                Value::Array(items.iter().map(Representation::to_value).collect())
            }
            Node::Links(links) => Value::Array(
                links
                    .iter()
                    .map(|link| {
                        let mut map = serde_json::Map::new();
                        map.insert("href".to_string(), Value::String(link.href.clone()));
                        map.insert("rel".to_string(), Value::String(link.rel.clone()));
                        Value::Object(map)
                    })
                    .collect(),
            ),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(value) => value.serialize(serializer),
            Node::Object(rep) => rep.serialize(serializer),
            Node::Sequence(items) => items.serialize(serializer),
            Node::Links(links) => links.serialize(serializer),
        }
    }
}

/// Insertion-ordered mapping from key to [`Node`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Representation {
    fields: IndexMap<String, Node>,
}

impl Representation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from projected attributes.
    pub fn from_attributes(attributes: Attributes) -> Self {
        let mut rep = Self::new();
        for (key, value) in attributes {
            rep.insert_value(key, value);
        }
        rep
    }

    /// Build a tree from a JSON object.
    ///
    /// A `links` key holding `{href, rel}` objects is recognised as the link
    /// sequence. Fails if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(RenderError::Config(format!(
                "A representation must be a JSON object, got {}",
                other
            ))),
        }
    }

    fn from_json_map(map: serde_json::Map<String, Value>) -> Self {
        let mut rep = Self::new();
        for (key, value) in map {
            rep.insert_value(key, value);
        }
        rep
    }

    fn insert_value(&mut self, key: String, value: Value) {
        if key == LINKS_KEY {
            if let Ok(links) = serde_json::from_value::<Vec<Link>>(value.clone()) {
                self.fields.insert(key, Node::Links(links));
                return;
            }
        }
        self.fields.insert(key, Node::from_value(value));
    }

    /// Insert or replace a node. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        self.fields.insert(key.into(), node);
    }

    /// Set the link sequence, overwriting any same-named attribute and
    /// moving the key to the end.
    pub fn set_links(&mut self, links: Vec<Link>) {
        self.fields.shift_remove(LINKS_KEY);
        self.fields.insert(LINKS_KEY.to_string(), Node::Links(links));
    }

    pub fn links(&self) -> Option<&[Link]> {
        match self.fields.get(LINKS_KEY) {
            Some(Node::Links(links)) => Some(links),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to a `serde_json::Value` object
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }
}

impl Serialize for Representation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, node) in &self.fields {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Representation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Representation::from_value(value).map_err(D::Error::custom)
    }
}

/// Builds the representation of a single model.
pub struct RepresentationBuilder<'a> {
    inflector: &'a dyn Inflector,
    relationship_types: &'a RelationshipTypes,
}

impl<'a> RepresentationBuilder<'a> {
    pub fn new(inflector: &'a dyn Inflector, relationship_types: &'a RelationshipTypes) -> Self {
        Self {
            inflector,
            relationship_types,
        }
    }

    fn link_builder(&self) -> LinkBuilder<'a> {
        LinkBuilder::new(self.inflector)
    }

    /// Merge projected attributes, embedded associations and links.
    ///
    /// 1. The version's projector supplies the attributes.
    /// 2. Each association (accessor and key are the pluralized name) is
    ///    embedded as a sequence of the related models' attributes, each with
    ///    a `/children` link. Associations the model returns nothing for are
    ///    omitted entirely.
    /// 3. `links` is the self link followed by the extended relationship
    ///    links, and always overwrites an attribute of the same name.
    pub fn build(
        &self,
        model: &dyn Model,
        version: &VersionEntry,
        associations: &[String],
    ) -> Representation {
        let links = self.link_builder();
        let mut rep = Representation::from_attributes(version.project(model));

        for association in associations {
            let key = self.inflector.pluralize(association);
            let Some(related) = model.related(&key) else {
                tracing::debug!(
                    "{} '{}' has no '{}' association, omitting",
                    model.type_name(),
                    model.id(),
                    key
                );
                continue;
            };

            let members = related
                .into_models()
                .iter()
                .map(|member| {
                    let mut child = Representation::from_attributes(member.attributes());
                    child.set_links(vec![links.child_link(member.as_ref(), association)]);
                    child
                })
                .collect();
            rep.insert(key, Node::Sequence(members));
        }

        rep.set_links(self.links_for(model));
        rep
    }

    /// Self link first, then the extended relationship links
    pub fn links_for(&self, model: &dyn Model) -> Vec<Link> {
        let links = self.link_builder();
        let mut all = vec![links.self_link(model)];
        all.extend(links.extended_relationship_links(model, self.relationship_types));
        all
    }
}
