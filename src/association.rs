//! Declared associations of a model type.
//!
//! Associations are embedded as nested representations with `/children`
//! links. Each may be scoped to a subset of media types.

/// One declared association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEntry {
    name: String,
    media_types: Vec<String>,
}

impl AssociationEntry {
    pub fn new(name: impl Into<String>, media_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            media_types,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media types this association is scoped to (empty = unscoped)
    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }

    pub fn is_scoped(&self) -> bool {
        !self.media_types.is_empty()
    }

    fn applies_to(&self, media_type: &str) -> bool {
        self.media_types.iter().any(|mt| mt == media_type)
    }
}

/// Associations of a single model type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AssociationSet {
    entries: Vec<AssociationEntry>,
}

impl AssociationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an association.
    ///
    /// Re-declaring an existing name is a no-op: the first declaration and
    /// its scope are kept. Returns `true` if the association was added.
    pub fn declare<I, S>(&mut self, name: &str, media_types: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.contains(name) {
            return false;
        }
        let media_types = media_types.into_iter().map(Into::into).collect();
        self.entries.push(AssociationEntry::new(name, media_types));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Association names visible for a media type.
    ///
    /// * `None` - every declared name.
    /// * `Some(mt)` - only associations explicitly scoped to `mt`. Unscoped
    ///   associations never appear in a versioned query.
    pub fn names_for(&self, media_type: Option<&str>) -> Vec<String> {
        match media_type {
            None => self.entries.iter().map(|e| e.name.clone()).collect(),
            Some(mt) => self
                .entries
                .iter()
                .filter(|e| e.is_scoped() && e.applies_to(mt))
                .map(|e| e.name.clone())
                .collect(),
        }
    }

    /// Associations embedded when rendering `media_type`: unscoped ones plus
    /// those scoped to `media_type`, in declaration order.
    pub fn names_for_rendering(&self, media_type: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.is_scoped() || e.applies_to(media_type))
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn entries(&self) -> &[AssociationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
