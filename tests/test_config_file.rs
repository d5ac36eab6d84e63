//! Tests for YAML-driven registration
//!
//! Writes configuration files to a temporary directory, loads them and
//! renders records against the resulting registry.

use hyperrender::{
    AttributeProjection, EngineConfig, LinkStyle, Record, Registry, RenderError, Renderer,
};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

const REPRESENTATIONS: &str = r#"
relationship_types: [produced_by]
xml:
  indent: 4
  link_style: elements
models:
  Artist:
    mime_types:
      - media_types: [application/vnd.acme.artist-v1+json, application/vnd.acme.artist-v1+xml]
        attributes: [id, name]
      - media_types: [application/vnd.acme.artist-v2+json]
        attributes: [id, name, aliases]
    associations:
      - name: groups
        media_types: [application/vnd.acme.artist-v2+json]
  Group:
    mime_types:
      - media_types: [application/vnd.acme.group-v1+json]
        attributes: [id, name]
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("representations.yaml");
    fs::write(&path, contents).unwrap();
    path
}

fn busta() -> Record {
    Record::new("Artist", "busta-rhymes")
        .with_attribute("name", "Busta Rhymes")
        .with_attribute("aliases", json!(["Busta Bus"]))
        .with_related(
            "groups",
            vec![Record::new("Group", "flipmode-squad")
                .with_attribute("name", "Flipmode Squad")
                .into_ref()],
        )
        .with_one(
            "produced_by",
            Record::new("Producer", "dj-scratch").into_ref(),
        )
}

#[test]
fn test_load_apply_and_render() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, REPRESENTATIONS);

    let config = EngineConfig::load_from_file(&path).unwrap();
    let mut registry = Registry::new();
    config.apply(&mut registry).unwrap();

    let renderer = Renderer::with_options(&registry, config.xml_options());
    let body = renderer
        .render(&busta(), "application/vnd.acme.artist-v1+json")
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "busta-rhymes",
            "name": "Busta Rhymes",
            "links": [
                {"href": "/artists/busta-rhymes", "rel": "/self"},
                {"href": "/producers/dj-scratch", "rel": "/producedBy"}
            ]
        })
    );

    let body = renderer
        .render(&busta(), "application/vnd.acme.artist-v2+json")
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["aliases"], json!(["Busta Bus"]));
    assert_eq!(value["groups"][0]["id"], json!("flipmode-squad"));
}

#[test]
fn test_xml_options_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, REPRESENTATIONS);

    let config = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(config.xml.indent, 4);
    assert_eq!(config.xml.link_style, LinkStyle::Elements);

    let registry = config.to_registry().unwrap();
    let renderer = Renderer::with_options(&registry, config.xml_options());
    let busta = Record::new("Artist", "busta-rhymes").with_attribute("name", "Busta Rhymes");

    let xml = String::from_utf8(
        renderer
            .render(&busta, "application/vnd.acme.artist-v1+xml")
            .unwrap(),
    )
    .unwrap();
    assert!(xml.contains("\n<artist>\n    <id>busta-rhymes</id>\n"));
    assert!(xml.contains("<href>/artists/busta-rhymes</href>"));
    assert!(xml.contains("<rel>/self</rel>"));
}

#[test]
fn test_reapplying_config_is_idempotent_for_definitions() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, REPRESENTATIONS);
    let config = EngineConfig::load_from_file(&path).unwrap();

    let mut registry = Registry::new();
    config.apply(&mut registry).unwrap();
    config.apply(&mut registry).unwrap();

    assert_eq!(registry.model_types(), vec!["Artist", "Group"]);
    assert_eq!(
        registry.associations_for("Artist", None).unwrap(),
        vec!["groups"]
    );
    // Extensions are replaced, not accumulated
    assert_eq!(
        registry
            .relationship_types()
            .tokens()
            .iter()
            .filter(|t| t.as_str() == "produced_by")
            .count(),
        1
    );
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "models:\n  Artist:\n    associations:\n      - name: \"\"\n",
    );

    let err = EngineConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, RenderError::Config(msg) if msg.contains("without a name")));
}

#[test]
#[allow(deprecated)]
fn test_deprecated_version_registration() {
    init_tracing();
    let mut registry = Registry::new();
    registry.define("Artist");
    registry
        .version(
            "Artist",
            ["vnd.acme.artist-v1+json"],
            Arc::new(AttributeProjection::new(["id"])),
        )
        .unwrap();

    let body = Renderer::new(&registry)
        .render(&busta(), "vnd.acme.artist-v1+json")
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["id"], json!("busta-rhymes"));
    assert!(value.get("name").is_none());
}
