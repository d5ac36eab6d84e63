//! Error type shared by registration, negotiation and rendering.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors surfaced by the engine.
///
/// Every failure is a deterministic function of the input and the registry
/// state, so none of these are retryable.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The model type was never defined on the registry.
    #[error("Model type '{0}' has not been defined")]
    ModelNotFound(String),

    /// No version entry matches the requested media type.
    #[error("Mime type not recognised: {0}")]
    MimeTypeNotRecognized(String),

    /// A collection was rendered with no elements and no type hint.
    #[error("Cannot infer a model type from an empty collection")]
    EmptyCollection,

    /// The media type matched a version but names an output format the
    /// serializer cannot produce.
    #[error("Media type '{media_type}' resolves to unsupported format '{format}'")]
    UnsupportedFormat { media_type: String, format: String },

    /// Invalid or unreadable configuration. Read failures carry the path.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),
}

impl RenderError {
    /// Whether the error is a client-facing negotiation failure (as opposed to
    /// a host configuration problem). HTTP layers usually map these to 406.
    pub fn is_negotiation_failure(&self) -> bool {
        matches!(self, RenderError::MimeTypeNotRecognized(_))
    }
}
