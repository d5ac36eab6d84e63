//! Hypermedia link construction.
//!
//! Every href has the shape `/<plural lowercase type>/<id>`; the rel tells a
//! client how the target relates to the represented model.

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::naming::Inflector;
use crate::relationship::RelationshipTypes;

pub const SELF_REL: &str = "/self";
pub const CHILDREN_REL: &str = "/children";

/// A `{href, rel}` pair describing one relationship.
///
/// Deserialization only accepts objects with exactly these two fields, so
/// an attribute that merely looks like a link list is never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
        }
    }
}

/// Builds links for models using the registry's naming conventions.
#[derive(Clone, Copy)]
pub struct LinkBuilder<'a> {
    inflector: &'a dyn Inflector,
}

impl<'a> LinkBuilder<'a> {
    pub fn new(inflector: &'a dyn Inflector) -> Self {
        Self { inflector }
    }

    /// `/artists/busta-rhymes`
    pub fn href(&self, model: &dyn Model) -> String {
        format!(
            "/{}/{}",
            self.inflector.collection_name(model.type_name()),
            model.id()
        )
    }

    /// Link every representation carries to itself
    pub fn self_link(&self, model: &dyn Model) -> Link {
        Link::new(self.href(model), SELF_REL)
    }

    /// Link attached to an embedded association member.
    ///
    /// The association name does not influence the href, which always points
    /// at the related model's own resource.
    pub fn child_link(&self, related: &dyn Model, _association: &str) -> Link {
        Link::new(self.href(related), CHILDREN_REL)
    }

    /// Link for a relationship-type token (`part_of` -> `/partOf`)
    pub fn custom_relation_link(&self, related: &dyn Model, relationship_type: &str) -> Link {
        Link::new(
            self.href(related),
            format!("/{}", self.inflector.camelize_lower(relationship_type)),
        )
    }

    /// Links for every relationship-type token the model answers.
    ///
    /// Tokens are visited in vocabulary order; tokens the model does not
    /// implement, and empty results, contribute nothing.
    pub fn extended_relationship_links(
        &self,
        model: &dyn Model,
        relationship_types: &RelationshipTypes,
    ) -> Vec<Link> {
        relationship_types
            .tokens()
            .iter()
            .filter_map(|token| model.related(token).map(|related| (token, related)))
            .flat_map(|(token, related)| {
                related
                    .into_models()
                    .into_iter()
                    .map(move |part| self.custom_relation_link(part.as_ref(), token))
            })
            .collect()
    }
}
