//! Relationship-type vocabulary used for link-only relationships.

/// Tokens every registry knows about.
pub const DEFAULT_RELATIONSHIP_TYPES: [&str; 7] =
    ["part_of", "parent", "child", "contains", "prev", "next", "same_as"];

/// Ordered set of relationship-type tokens: the defaults followed by any
/// configured extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTypes {
    tokens: Vec<String>,
}

impl RelationshipTypes {
    /// The default vocabulary
    pub fn new() -> Self {
        Self {
            tokens: DEFAULT_RELATIONSHIP_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Defaults plus `extra`, appended in order and without duplicates.
    pub fn with_extensions<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types = Self::new();
        for token in extra {
            let token = token.into();
            if !types.contains(&token) {
                types.tokens.push(token);
            }
        }
        types
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens added on top of the defaults
    pub fn extensions(&self) -> &[String] {
        &self.tokens[DEFAULT_RELATIONSHIP_TYPES.len()..]
    }
}

impl Default for RelationshipTypes {
    fn default() -> Self {
        Self::new()
    }
}
