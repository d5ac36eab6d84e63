//! Versioned attribute projections keyed by media type.
//!
//! Each model type owns a [`VersionSet`]: an ordered list of
//! (media type -> projector) pairs. Registration appends, lookup returns the
//! first exact match.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::model::{Attributes, Model};

/// Trait for attribute projection functions
///
/// A projector selects (and may compute) the attributes exposed by one
/// version of a representation. It must not mutate the model.
pub trait Projector: Send + Sync {
    fn project(&self, model: &dyn Model) -> Attributes;
}

/// Simple function-based implementation of Projector
impl<F> Projector for F
where
    F: Fn(&dyn Model) -> Attributes + Send + Sync,
{
    fn project(&self, model: &dyn Model) -> Attributes {
        self(model)
    }
}

/// Projector that copies a fixed list of attributes from the model.
///
/// Attributes the model does not have are emitted as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeProjection {
    attributes: Vec<String>,
}

impl AttributeProjection {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attribute_names(&self) -> &[String] {
        &self.attributes
    }
}

impl Projector for AttributeProjection {
    fn project(&self, model: &dyn Model) -> Attributes {
        let source = model.attributes();
        self.attributes
            .iter()
            .map(|name| {
                let value = source.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }
}

/// One registered (media type -> projector) pair.
#[derive(Clone)]
pub struct VersionEntry {
    media_type: String,
    projector: Arc<dyn Projector>,
}

impl VersionEntry {
    pub fn new(media_type: impl Into<String>, projector: Arc<dyn Projector>) -> Self {
        Self {
            media_type: media_type.into(),
            projector,
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The exact projector instance registered for this entry
    pub fn projector(&self) -> &Arc<dyn Projector> {
        &self.projector
    }

    /// Run the projection against a model
    pub fn project(&self, model: &dyn Model) -> Attributes {
        self.projector.project(model)
    }
}

impl fmt::Debug for VersionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionEntry")
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}

/// Ordered version entries for a single model type.
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    entries: Vec<VersionEntry>,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry per media type, all sharing the same projector.
    ///
    /// Duplicates are kept; lookup always prefers the earliest entry.
    pub fn register<I, S>(&mut self, media_types: I, projector: Arc<dyn Projector>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for media_type in media_types {
            self.entries
                .push(VersionEntry::new(media_type, Arc::clone(&projector)));
        }
    }

    /// First entry whose media type equals `media_type` exactly
    pub fn lookup(&self, media_type: &str) -> Option<&VersionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.media_type == media_type)
    }

    /// All registered media types in registration order
    pub fn media_types(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.media_type.as_str()).collect()
    }

    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
