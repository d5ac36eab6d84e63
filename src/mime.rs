//! Media-type resolution.
//!
//! Matching is exact string comparison against the registered version
//! entries; there is no quality-value or wildcard negotiation.

use std::fmt;

use crate::error::{RenderError, Result};
use crate::registry::Registry;
use crate::version::VersionEntry;

/// Generic prefixes stripped before the format token is extracted.
const GENERIC_PREFIXES: [&str; 2] = ["application/", "text/"];

/// Output format selected by a media type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    /// A token no serializer handles (e.g. `yaml`)
    Other(String),
}

impl Format {
    /// Extract the format token from a raw media type.
    ///
    /// `vnd.acme.artist-v1+xml` -> `xml`, `application/json` -> `json`,
    /// `json` -> `json`.
    pub fn from_media_type(raw: &str) -> Format {
        let trimmed = raw.trim();
        let stripped = GENERIC_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);

        let token = match stripped.rsplit_once('+') {
            Some((_, suffix)) => suffix,
            None => stripped.rsplit_once('/').map_or(stripped, |(_, subtype)| subtype),
        };

        Format::from_token(token)
    }

    pub fn from_token(token: &str) -> Format {
        match token.to_ascii_lowercase().as_str() {
            "json" => Format::Json,
            "xml" => Format::Xml,
            other => Format::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Other(token) => token,
        }
    }

    /// Generic content type for this format, used when the negotiated media
    /// type is not itself a full `type/subtype` string.
    pub fn content_type(&self) -> String {
        match self {
            Format::Json => "application/json".to_string(),
            Format::Xml => "application/xml".to_string(),
            Format::Other(token) => format!("application/{}", token),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution<'r> {
    pub version: &'r VersionEntry,
    pub format: Format,
}

/// Resolve a media type for a model type.
///
/// Fails with `ModelNotFound` if the type was never defined and with
/// `MimeTypeNotRecognized` if no version entry matches exactly.
pub fn resolve<'r>(registry: &'r Registry, type_name: &str, raw: &str) -> Result<Resolution<'r>> {
    let version = registry
        .lookup(type_name, raw)?
        .ok_or_else(|| {
            tracing::debug!("No version of {} registered for '{}'", type_name, raw);
            RenderError::MimeTypeNotRecognized(raw.to_string())
        })?;

    Ok(Resolution {
        version,
        format: Format::from_media_type(raw),
    })
}
