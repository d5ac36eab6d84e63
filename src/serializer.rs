//! Structural serialization of representation trees.
//!
//! JSON is a direct serde encoding of the tree. XML is produced by walking
//! the tree: nested objects become elements, sequences become a wrapper
//! element around singularized item elements, and `links` becomes a
//! `<links>` wrapper of `<link>` entries.
//!
//! Keys are used verbatim as element names. A key that is not a valid XML
//! name (`first name`, `1st`, an empty string) fails the render with
//! [`RenderError::Xml`] instead of producing an ill-formed document.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{RenderError, Result};
use crate::links::Link;
use crate::mime::Format;
use crate::naming::Inflector;
use crate::representation::{Node, Representation};

/// How `<link>` entries carry their href and rel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `<link href="..." rel="..."/>`
    #[default]
    Attributes,
    /// `<link><href>...</href><rel>...</rel></link>`
    Elements,
}

/// XML output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// Spaces per nesting level; 0 writes the document on one line
    pub indent: usize,
    pub link_style: LinkStyle,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            link_style: LinkStyle::Attributes,
        }
    }
}

/// Encode a tree as JSON bytes
pub fn to_json(rep: &Representation) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(rep)?)
}

/// Serializer for representation trees.
pub struct StructuralSerializer<'a> {
    inflector: &'a dyn Inflector,
    options: XmlOptions,
}

impl<'a> StructuralSerializer<'a> {
    pub fn new(inflector: &'a dyn Inflector) -> Self {
        Self::with_options(inflector, XmlOptions::default())
    }

    pub fn with_options(inflector: &'a dyn Inflector, options: XmlOptions) -> Self {
        Self { inflector, options }
    }

    /// Dispatch on the resolved format.
    ///
    /// `root` only applies to XML. Formats without a serializer are a
    /// configuration error of the registering host.
    pub fn serialize(
        &self,
        format: &Format,
        media_type: &str,
        rep: &Representation,
        root: Option<&str>,
    ) -> Result<Vec<u8>> {
        match format {
            Format::Json => self.to_json(rep),
            Format::Xml => self.to_xml(rep, root),
            Format::Other(token) => Err(RenderError::UnsupportedFormat {
                media_type: media_type.to_string(),
                format: token.clone(),
            }),
        }
    }

    pub fn to_json(&self, rep: &Representation) -> Result<Vec<u8>> {
        to_json(rep)
    }

    /// Render an XML document, optionally wrapped in a `root` element.
    pub fn to_xml(&self, rep: &Representation, root: Option<&str>) -> Result<Vec<u8>> {
        let mut writer = if self.options.indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', self.options.indent)
        };

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        match root {
            Some(root) => {
                emit(&mut writer, Event::Start(start(root)?))?;
                self.walk(&mut writer, rep)?;
                emit(&mut writer, Event::End(BytesEnd::new(root)))?;
            }
            None => self.walk(&mut writer, rep)?,
        }

        let mut out = writer.into_inner();
        out.push(b'\n');
        Ok(out)
    }

    fn walk(&self, writer: &mut Writer<Vec<u8>>, rep: &Representation) -> Result<()> {
        for (key, node) in rep.iter() {
            self.write_node(writer, key, node)?;
        }
        Ok(())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, key: &str, node: &Node) -> Result<()> {
        match node {
            Node::Links(links) => self.write_links(writer, key, links),
            Node::Object(child) => {
                emit(writer, Event::Start(start(key)?))?;
                self.walk(writer, child)?;
                emit(writer, Event::End(BytesEnd::new(key)))
            }
            Node::Sequence(items) if items.is_empty() => {
                emit(writer, Event::Empty(start(key)?))
            }
            Node::Sequence(items) => {
                let item_name = self.inflector.singularize(key);
                emit(writer, Event::Start(start(key)?))?;
                for item in items {
                    emit(writer, Event::Start(start(item_name.as_str())?))?;
                    self.walk(writer, item)?;
                    emit(writer, Event::End(BytesEnd::new(item_name.as_str())))?;
                }
                emit(writer, Event::End(BytesEnd::new(key)))
            }
            Node::Scalar(value) => self.write_scalar(writer, key, value),
        }
    }

    fn write_scalar(&self, writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Null => emit(writer, Event::Empty(start(key)?)),
            Value::String(text) => write_text_element(writer, key, text),
            Value::Number(n) => write_text_element(writer, key, &n.to_string()),
            Value::Bool(b) => write_text_element(writer, key, &b.to_string()),
            Value::Array(items) if items.is_empty() => {
                emit(writer, Event::Empty(start(key)?))
            }
            Value::Array(items) => {
                let item_name = self.inflector.singularize(key);
                emit(writer, Event::Start(start(key)?))?;
                for item in items {
                    self.write_node(writer, &item_name, &Node::from_value(item.clone()))?;
                }
                emit(writer, Event::End(BytesEnd::new(key)))
            }
            Value::Object(_) => self.write_node(writer, key, &Node::from_value(value.clone())),
        }
    }

    fn write_links(&self, writer: &mut Writer<Vec<u8>>, key: &str, links: &[Link]) -> Result<()> {
        if links.is_empty() {
            return emit(writer, Event::Empty(start(key)?));
        }

        let link_name = self.inflector.singularize(key);
        emit(writer, Event::Start(start(key)?))?;
        for link in links {
            match self.options.link_style {
                LinkStyle::Attributes => {
                    let element = start(link_name.as_str())?.with_attributes([
                        ("href", link.href.as_str()),
                        ("rel", link.rel.as_str()),
                    ]);
                    emit(writer, Event::Empty(element))?;
                }
                LinkStyle::Elements => {
                    emit(writer, Event::Start(start(link_name.as_str())?))?;
                    write_text_element(writer, "href", &link.href)?;
                    write_text_element(writer, "rel", &link.rel)?;
                    emit(writer, Event::End(BytesEnd::new(link_name.as_str())))?;
                }
            }
        }
        emit(writer, Event::End(BytesEnd::new(key)))
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(start(name)?))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Letters or `_` first, then letters, digits, `_`, `-` or `.`
fn xml_name_pattern() -> &'static Regex {
    static XML_NAME: OnceLock<Regex> = OnceLock::new();
    XML_NAME.get_or_init(|| {
        Regex::new(r"^[\p{L}_][\p{L}\p{N}_.\-]*$")
            .expect("XML name pattern must be a valid regex")
    })
}

/// Whether `name` can be written as an element name.
fn is_xml_name(name: &str) -> bool {
    xml_name_pattern().is_match(name)
}

fn start(name: &str) -> Result<BytesStart<'_>> {
    if is_xml_name(name) {
        Ok(BytesStart::new(name))
    } else {
        Err(RenderError::Xml(format!("'{}' is not a valid XML element name", name)))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Xml(e.to_string()))
}
