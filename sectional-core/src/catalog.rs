//! Field type catalog
//!
//! The single source of truth for the supported field kinds. Both the
//! schema editor (to populate the "choose field type" control) and the
//! dynamic form renderer (to pick a widget and a default value) consult
//! this table. Adding a ninth type means touching this module and nothing
//! else besides the renderer's dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The supported field kinds.
///
/// Unknown tags deserialize to [`FieldType::Text`] so that schemas written
/// by a newer deployment never crash the renderer of an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Textarea,
    Number,
    Boolean,
    Select,
    Date,
    Image,
    Images,
    // Last so the catch-all covers every unknown tag
    #[default]
    #[serde(other)]
    Text,
}

/// Widget contract consumed by whatever renders the data-entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    SingleLine,
    MultiLine,
    NumberInput,
    Checkbox,
    Dropdown,
    DatePicker,
    FileReference,
    FileReferenceList,
}

impl FieldType {
    /// All catalog entries, in display order for the type picker
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::Date,
        FieldType::Image,
        FieldType::Images,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Date => "date",
            FieldType::Image => "image",
            FieldType::Images => "images",
        }
    }

    /// The default/empty value stored for a field of this type
    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Number => Value::from(0.0),
            FieldType::Boolean => Value::Bool(false),
            FieldType::Images => Value::Array(Vec::new()),
            _ => Value::String(String::new()),
        }
    }

    /// The widget the renderer presents for this type
    pub fn widget(&self) -> Widget {
        match self {
            FieldType::Text => Widget::SingleLine,
            FieldType::Textarea => Widget::MultiLine,
            FieldType::Number => Widget::NumberInput,
            FieldType::Boolean => Widget::Checkbox,
            FieldType::Select => Widget::Dropdown,
            FieldType::Date => Widget::DatePicker,
            FieldType::Image => Widget::FileReference,
            FieldType::Images => Widget::FileReferenceList,
        }
    }

    /// Coerce a raw submitted value into its storage shape.
    ///
    /// Coercion never fails: invalid numbers become 0, a select value
    /// outside `options` collapses to the empty default, and anything a
    /// type cannot interpret becomes that type's default.
    pub fn coerce(&self, raw: &Value, options: &[String]) -> Value {
        match self {
            FieldType::Text | FieldType::Textarea => match raw {
                Value::String(s) => Value::String(s.trim().to_string()),
                Value::Number(n) => Value::String(n.to_string()),
                Value::Bool(b) => Value::String(b.to_string()),
                _ => self.default_value(),
            },
            FieldType::Number => coerce_number(raw),
            FieldType::Boolean => match raw {
                Value::Bool(b) => Value::Bool(*b),
                Value::String(s) => Value::Bool(s == "true"),
                _ => Value::Bool(false),
            },
            FieldType::Select => match raw {
                Value::String(s) if options.iter().any(|o| o == s) => Value::String(s.clone()),
                _ => self.default_value(),
            },
            FieldType::Date | FieldType::Image => match raw {
                Value::String(s) => Value::String(s.trim().to_string()),
                _ => self.default_value(),
            },
            FieldType::Images => match raw {
                // Bare string submissions get wrapped; non-string elements dropped
                Value::String(s) if !s.trim().is_empty() => {
                    Value::Array(vec![Value::String(s.trim().to_string())])
                }
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(|s| Value::String(s.trim().to_string()))
                        .collect(),
                ),
                _ => self.default_value(),
            },
        }
    }

    /// Whether a stored value counts as empty for required-field checks.
    ///
    /// Boolean false and number 0 are real values, not absences.
    pub fn is_empty_value(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
            Value::Object(_) => false,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse anything number-ish as f64; everything else coerces to 0
fn coerce_number(raw: &Value) -> Value {
    let parsed = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    // NaN/inf are not representable in JSON
    if parsed.is_finite() {
        Value::from(parsed)
    } else {
        Value::from(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_tag_falls_back_to_text() {
        let ty: FieldType = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(ty, FieldType::Text);
    }

    #[test]
    fn test_default_type_is_text() {
        assert_eq!(FieldType::default(), FieldType::Text);
    }

    #[test]
    fn test_known_tags_round_trip() {
        for ty in FieldType::ALL {
            let encoded = serde_json::to_string(&ty).unwrap();
            assert_eq!(encoded, format!("\"{}\"", ty.as_str()));
            let decoded: FieldType = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, ty);
        }
    }

    #[test]
    fn test_number_coercion_never_throws() {
        let ty = FieldType::Number;
        assert_eq!(ty.coerce(&json!("12.5"), &[]), json!(12.5));
        assert_eq!(ty.coerce(&json!("not a number"), &[]), json!(0.0));
        assert_eq!(ty.coerce(&json!(null), &[]), json!(0.0));
        assert_eq!(ty.coerce(&json!({"a": 1}), &[]), json!(0.0));
    }

    #[test]
    fn test_select_bounded_to_options() {
        let ty = FieldType::Select;
        let options = vec!["A".to_string(), "B".to_string()];
        assert_eq!(ty.coerce(&json!("A"), &options), json!("A"));
        assert_eq!(ty.coerce(&json!("B"), &options), json!("B"));
        assert_eq!(ty.coerce(&json!("C"), &options), json!(""));
        assert_eq!(ty.coerce(&json!(42), &options), json!(""));
    }

    #[test]
    fn test_images_wraps_bare_string() {
        let ty = FieldType::Images;
        assert_eq!(ty.coerce(&json!("/media/a.jpg"), &[]), json!(["/media/a.jpg"]));
        assert_eq!(
            ty.coerce(&json!(["/media/a.jpg", 7, "/media/b.jpg"]), &[]),
            json!(["/media/a.jpg", "/media/b.jpg"])
        );
        assert_eq!(ty.coerce(&json!(""), &[]), json!([]));
    }

    #[test]
    fn test_text_trims() {
        assert_eq!(FieldType::Text.coerce(&json!("  hi  "), &[]), json!("hi"));
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldType::Text.is_empty_value(&json!("   ")));
        assert!(FieldType::Images.is_empty_value(&json!([])));
        assert!(!FieldType::Boolean.is_empty_value(&json!(false)));
        assert!(!FieldType::Number.is_empty_value(&json!(0)));
    }
}
