//! Dynamic form rendering and submission handling
//!
//! Given a section's field list, this module produces the widget sequence
//! for one entry, coerces a raw submission into its storage shape, and
//! validates required fields. Linear per-field dispatch with no branching
//! beyond the type switch: a new field type touches the catalog and nothing
//! here.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::Widget;
use crate::error::{EngineError, Result};
use crate::model::Field;

/// One rendered form row: the widget to present, seeded with the current
/// value (or the catalog default when the entry has no value yet)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWidget {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    pub required: bool,
    /// Dropdown choices; empty for every other widget
    pub options: Vec<String>,
    pub value: Value,
}

/// Build the widget sequence for an entry form, in field order.
///
/// `data` is the entry's current data map, or empty for a new entry.
pub fn render_form(fields: &[Field], data: &Map<String, Value>) -> Vec<FieldWidget> {
    fields
        .iter()
        .map(|field| {
            let value = data
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| field.field_type.default_value());
            FieldWidget {
                name: field.name.clone(),
                label: field.label.clone(),
                widget: field.field_type.widget(),
                required: field.required,
                options: field.options.clone(),
                value,
            }
        })
        .collect()
}

/// Coerce a raw submission into its storage shape.
///
/// Declared fields are coerced per the catalog; absent declared fields get
/// their default. Keys that match no declared field pass through unchanged —
/// entries keep orphaned keys from since-removed fields, and the engine
/// tolerates them rather than rejecting or purging.
pub fn collect_submission(fields: &[Field], raw: &Map<String, Value>) -> Map<String, Value> {
    let mut data = Map::new();
    for field in fields {
        let value = match raw.get(&field.name) {
            Some(v) => field.field_type.coerce(v, &field.options),
            None => field.field_type.default_value(),
        };
        data.insert(field.name.clone(), value);
    }
    for (key, value) in raw {
        if !data.contains_key(key) {
            data.insert(key.clone(), value.clone());
        }
    }
    data
}

/// Check that every required field carries a non-empty value
pub fn validate_required(fields: &[Field], data: &Map<String, Value>) -> Result<()> {
    for field in fields {
        if !field.required {
            continue;
        }
        let missing = match data.get(&field.name) {
            Some(value) => field.field_type.is_empty_value(value),
            None => true,
        };
        if missing {
            return Err(EngineError::validation(format!(
                "required field '{}' is missing or empty",
                field.name
            )));
        }
    }
    Ok(())
}
