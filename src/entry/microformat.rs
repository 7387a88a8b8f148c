//! Parsed microformats2 documents, as handed over by the mention verifier.
//!
//! The verifier fetches the source page and parses it; this crate only stores
//! the result and searches it for the originating `h-entry`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const H_ENTRY: &str = "h-entry";

/// Top-level parse result of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub items: Vec<Microformat>,
    #[serde(default)]
    pub rels: BTreeMap<String, Vec<String>>,
    /// Anything else the parser emitted (`rel-urls`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single microformat item (`h-entry`, `h-card`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microformat {
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Microformat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Other item members such as `id`, `lang` or `html`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Property values are either nested items, plain text, or structured
/// values such as `{"html": .., "value": ..}` for `e-*` properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Item(Box<Microformat>),
    Text(String),
    Other(Value),
}

impl Microformat {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }

    /// First value of a property, if any.
    pub fn first(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property).and_then(|values| values.first())
    }

    /// Depth-first search: the item itself, then its children, then items
    /// nested inside property values.
    fn find_entry(&self) -> Option<&Microformat> {
        if self.has_type(H_ENTRY) {
            return Some(self);
        }
        if let Some(found) = self.children.iter().find_map(Microformat::find_entry) {
            return Some(found);
        }
        self.properties
            .values()
            .flatten()
            .filter_map(|value| match value {
                PropertyValue::Item(item) => Some(item.as_ref()),
                _ => None,
            })
            .find_map(Microformat::find_entry)
    }
}

impl PropertyValue {
    /// Textual rendering: plain text as-is, nested items and `e-*` objects
    /// by their `value`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Item(item) => item.value.as_deref(),
            PropertyValue::Other(value) => value.get("value").and_then(Value::as_str),
        }
    }
}

/// The originating entry of a mention: the first `h-entry` reachable from the
/// document's items.
pub fn find_entry(document: &ParsedDocument) -> Option<&Microformat> {
    document.items.iter().find_map(Microformat::find_entry)
}
