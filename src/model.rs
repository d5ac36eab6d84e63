//! Model capability interface consumed by the engine.
//!
//! The engine never inspects concrete domain types. Anything that can report a
//! type name, an identifier, its plain attributes and the models it is related
//! to can be represented.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{RenderError, Result};

/// Insertion-ordered attribute mapping (attribute name -> value).
pub type Attributes = IndexMap<String, Value>;

/// Shared handle to a related model.
pub type ModelRef = Arc<dyn Model>;

/// Core trait for anything the engine can represent.
///
/// All methods are read-only from the engine's point of view; building a
/// representation never mutates the model.
///
/// # Example
///
/// ```ignore
/// use hyperrender::{Attributes, Model, Related};
/// use serde_json::json;
///
/// struct Artist {
///     slug: String,
///     name: String,
/// }
///
/// impl Model for Artist {
///     fn type_name(&self) -> &str {
///         "Artist"
///     }
///
///     fn id(&self) -> String {
///         self.slug.clone()
///     }
///
///     fn attributes(&self) -> Attributes {
///         let mut attrs = Attributes::new();
///         attrs.insert("id".to_string(), json!(self.slug));
///         attrs.insert("name".to_string(), json!(self.name));
///         attrs
///     }
/// }
/// ```
pub trait Model: Send + Sync {
    /// Name of the registered model type (e.g. `Artist`)
    fn type_name(&self) -> &str;

    /// Unique identifier used in hrefs
    fn id(&self) -> String;

    /// Plain attributes of the model
    fn attributes(&self) -> Attributes;

    /// Single attribute lookup
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes().get(name).cloned()
    }

    /// Models reachable through a named accessor.
    ///
    /// The name is either a relationship-type token (`part_of`, `next`, ...)
    /// or a pluralized association name. Returns `None` when the model has
    /// no such accessor or the accessor yields nothing.
    fn related(&self, _name: &str) -> Option<Related> {
        None
    }
}

/// Statically named model types, used for typed registration.
pub trait ModelType {
    /// The name of this model type
    const NAME: &'static str;
}

/// Result of a relationship accessor: one model or a sequence of models.
#[derive(Clone)]
pub enum Related {
    One(ModelRef),
    Many(Vec<ModelRef>),
}

impl Related {
    /// Normalize to a sequence (a single model becomes a one-element vec).
    pub fn into_models(self) -> Vec<ModelRef> {
        match self {
            Related::One(model) => vec![model],
            Related::Many(models) => models,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Related::One(_) => 1,
            Related::Many(models) => models.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<ModelRef> for Related {
    fn from(model: ModelRef) -> Self {
        Related::One(model)
    }
}

impl From<Vec<ModelRef>> for Related {
    fn from(models: Vec<ModelRef>) -> Self {
        Related::Many(models)
    }
}

impl fmt::Debug for Related {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self
            .clone()
            .into_models()
            .iter()
            .map(|m| format!("{}#{}", m.type_name(), m.id()))
            .collect();
        f.debug_tuple("Related").field(&ids).finish()
    }
}

/// Generic attribute/relationship bag implementing [`Model`].
///
/// Hosts without their own model types (and tests) can describe models as
/// records instead of writing a trait impl per type.
#[derive(Clone, Debug)]
pub struct Record {
    type_name: String,
    id: String,
    attributes: Attributes,
    relations: IndexMap<String, Related>,
}

impl Record {
    /// Create a record whose attributes start with its `id`.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), Value::String(id.clone()));

        Self {
            type_name: type_name.into(),
            id,
            attributes,
            relations: IndexMap::new(),
        }
    }

    /// Build a record from any serializable struct.
    ///
    /// The value must serialize to a JSON object; its fields become the
    /// record's attributes (after `id`).
    pub fn from_serialize<T: Serialize>(
        type_name: impl Into<String>,
        id: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let mut record = Self::new(type_name, id);
        match serde_json::to_value(value)? {
            Value::Object(map) => {
                record.attributes.extend(map);
                Ok(record)
            }
            other => Err(RenderError::Config(format!(
                "Record attributes must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a relationship accessor returning several models.
    pub fn with_related(mut self, name: impl Into<String>, models: Vec<ModelRef>) -> Self {
        self.relations.insert(name.into(), Related::Many(models));
        self
    }

    /// Attach a relationship accessor returning a single model.
    pub fn with_one(mut self, name: impl Into<String>, model: ModelRef) -> Self {
        self.relations.insert(name.into(), Related::One(model));
        self
    }

    pub fn into_ref(self) -> ModelRef {
        Arc::new(self)
    }
}

impl Model for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    fn related(&self, name: &str) -> Option<Related> {
        self.relations.get(name).cloned()
    }
}
