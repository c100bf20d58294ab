//! Content-type data model
//!
//! A [`Section`] is a user-defined schema: display metadata plus an ordered
//! list of typed [`Field`]s. A [`SectionDataEntry`] is one stored record
//! conforming to a section's field list at the time it was written.
//!
//! Wire format is camelCase JSON, matching what the admin SPA exchanges
//! with the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::catalog::FieldType;

/// Default icon shown for sections created without one
pub const DEFAULT_SECTION_ICON: &str = "▦";

/// Descriptive grouping for sections. Purely informational, never alters
/// engine behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Product,
    Content,
    Gallery,
    #[default]
    Custom,
}

/// One typed, named slot within a section's schema.
///
/// Fields are embedded in their section and are not independently
/// addressable; they are appended and removed one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Machine key, lowercase with underscores, derived from the label
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Only meaningful for select fields; ignored otherwise
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A user-defined content-type schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    /// Machine slug, lowercase with hyphens, unique within a namespace
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
    #[serde(rename = "type", default)]
    pub kind: SectionKind,
    #[serde(default)]
    pub fields: Vec<Field>,
    pub is_active: bool,
    /// Advisory flag for the public site; not enforced by the engine
    pub show_on_frontend: bool,
    pub order: i64,
}

/// One stored record conforming to a section's field list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDataEntry {
    pub id: String,
    pub section_id: String,
    pub data: Map<String, Value>,
    pub is_active: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a section
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub display_name: String,
    /// Optional explicit slug source; defaults to the display name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SectionKind,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub show_on_frontend: bool,
    #[serde(default)]
    pub order: i64,
}

/// Partial update for a section. Absent attributes keep their value.
/// The field list is mutated through add/remove operations, never patched
/// wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SectionKind>,
    pub is_active: Option<bool>,
    pub show_on_frontend: Option<bool>,
    pub order: Option<i64>,
}

/// Input for appending a field to a section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub label: String,
    /// Optional explicit key source; defaults to the label
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Body of an entry create/update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
}

impl Default for SectionDraft {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            name: None,
            description: String::new(),
            icon: None,
            kind: SectionKind::default(),
            is_active: true,
            show_on_frontend: false,
            order: 0,
        }
    }
}

impl Default for EntryPayload {
    fn default() -> Self {
        Self { data: Map::new(), is_active: true, order: 0 }
    }
}

fn default_true() -> bool {
    true
}

fn default_field_type() -> FieldType {
    FieldType::Text
}

/// Derive a section slug: lowercase, runs of whitespace become one hyphen
pub fn section_slug(input: &str) -> String {
    slugify(input, '-')
}

/// Derive a field key: lowercase, runs of whitespace become one underscore
pub fn field_key(input: &str) -> String {
    slugify(input, '_')
}

fn slugify(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push(sep);
                pending_sep = false;
            }
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
    }
    out
}

/// Fresh opaque identifier for sections and entries
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Section {
    /// Position of a field by machine key
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_slug_derivation() {
        assert_eq!(section_slug("X Y"), "x-y");
        assert_eq!(section_slug("  Promo   Banner "), "promo-banner");
        assert_eq!(section_slug("Único"), "único");
    }

    #[test]
    fn test_field_key_derivation() {
        assert_eq!(field_key("Product Name"), "product_name");
        assert_eq!(field_key("Headline"), "headline");
    }

    #[test]
    fn test_whitespace_only_input_yields_empty_slug() {
        assert_eq!(section_slug("   "), "");
        assert_eq!(field_key(""), "");
    }

    #[test]
    fn test_section_wire_format_is_camel_case() {
        let section = Section {
            id: "s1".into(),
            name: "promo".into(),
            display_name: "Promo".into(),
            description: String::new(),
            icon: DEFAULT_SECTION_ICON.into(),
            kind: SectionKind::Content,
            fields: vec![],
            is_active: true,
            show_on_frontend: false,
            order: 0,
        };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["displayName"], "Promo");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["showOnFrontend"], false);
        assert_eq!(json["type"], "content");
    }

    #[test]
    fn test_field_type_tag_on_wire() {
        let field = Field {
            name: "headline".into(),
            label: "Headline".into(),
            field_type: FieldType::Text,
            required: true,
            options: vec![],
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "text");
        assert!(json.get("options").is_none());
    }
}
