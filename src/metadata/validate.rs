//! Validation of untrusted metadata documents.
//!
//! Gateway responses are arbitrary JSON. [`validate`] turns them into a
//! [`CourseMetadata`] using one explicit decoding rule per field: a usable
//! value is kept, anything else (absent, `null`, falsy, wrong type) falls
//! back to the field's default. Flags follow JavaScript truthiness. Only `name`, `description` and `image`
//! are required.
//!
//! Every field that fell back to a default is reported in
//! [`Validated::defaulted`], so callers can audit how much of a document was
//! actually present.

use coursenft_common::{Error, Result};
use serde_json::{Map, Value};

use super::model::{Attribute, AttributeValue, CourseMetadata, CourseProperties};

/// Result of decoding one field.
#[derive(Debug, Clone, PartialEq)]
enum Field<T> {
    /// The document supplied a usable value.
    Present(T),
    /// The value was absent or unusable; the default was substituted.
    Defaulted(T),
}

impl<T> Field<T> {
    fn into_value(self) -> T {
        match self {
            Field::Present(v) | Field::Defaulted(v) => v,
        }
    }

    fn is_defaulted(&self) -> bool {
        matches!(self, Field::Defaulted(_))
    }
}

/// A validated document plus the paths of fields that were defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub metadata: CourseMetadata,
    pub defaulted: Vec<String>,
}

/// Validate a raw JSON document, discarding the defaulted-field report.
pub fn validate_metadata(raw: &Value) -> Result<CourseMetadata> {
    validate(raw).map(|v| v.metadata)
}

/// Validate a raw JSON document into canonical course metadata.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `raw` is not an object or when `name`,
/// `description` or `image` is missing, not a string, or empty.
pub fn validate(raw: &Value) -> Result<Validated> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::validation("metadata document must be a JSON object"))?;

    let name = require_text(obj, "name")?;
    let description = require_text(obj, "description")?;
    let image = require_text(obj, "image")?;

    let mut defaulted = Vec::new();
    let attributes = decode_attributes(obj.get("attributes"), &mut defaulted);
    let properties = decode_properties(obj.get("properties"), &mut defaulted);

    Ok(Validated {
        metadata: CourseMetadata {
            name,
            description,
            image,
            attributes,
            properties,
        },
        defaulted,
    })
}

fn require_text(obj: &Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(Error::validation(format!("required field `{key}` is empty"))),
        Some(_) => Err(Error::validation(format!("required field `{key}` must be a string"))),
        None => Err(Error::validation(format!("missing required field `{key}`"))),
    }
}

fn decode_attributes(value: Option<&Value>, defaulted: &mut Vec<String>) -> Vec<Attribute> {
    let Some(Value::Array(items)) = value else {
        defaulted.push("attributes".to_string());
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let fallback_trait = format!("attribute_{index}");
            let Some(attr) = item.as_object() else {
                defaulted.push(format!("attributes[{index}]"));
                return Attribute {
                    trait_type: fallback_trait,
                    value: AttributeValue::default(),
                };
            };

            let trait_type = match decode_text(attr.get("trait_type")) {
                Field::Present(t) => t,
                Field::Defaulted(_) => {
                    defaulted.push(format!("attributes[{index}].trait_type"));
                    fallback_trait
                }
            };

            let value = decode_attribute_value(attr.get("value"));
            if value.is_defaulted() {
                defaulted.push(format!("attributes[{index}].value"));
            }

            Attribute {
                trait_type,
                value: value.into_value(),
            }
        })
        .collect()
}

fn decode_properties(value: Option<&Value>, defaulted: &mut Vec<String>) -> CourseProperties {
    let Some(Value::Object(props)) = value else {
        defaulted.push("properties".to_string());
        return CourseProperties::default();
    };

    let mut text = |key: &str| {
        let field = decode_text(props.get(key));
        if field.is_defaulted() {
            defaulted.push(format!("properties.{key}"));
        }
        field.into_value()
    };
    let category = text("category");
    let course_type = text("course_type");
    let accessibility_level = text("accessibility_level");
    let style = text("style");

    let mut flag = |key: &str| {
        let field = decode_flag(props.get(key));
        if field.is_defaulted() {
            defaulted.push(format!("properties.{key}"));
        }
        field.into_value()
    };
    let redeemable = flag("redeemable");
    let instructor_certified = flag("instructor_certified");

    CourseProperties {
        category,
        course_type,
        accessibility_level,
        redeemable,
        instructor_certified,
        style,
    }
}

/// Non-empty strings are kept; numbers and booleans are rendered as text.
fn decode_text(value: Option<&Value>) -> Field<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Field::Present(s.clone()),
        Some(Value::Number(n)) => Field::Present(n.to_string()),
        Some(Value::Bool(b)) => Field::Present(b.to_string()),
        _ => Field::Defaulted(String::new()),
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy,
/// every other value (including arrays and objects) is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthy values give `true`; falsy or absent values default to `false`.
fn decode_flag(value: Option<&Value>) -> Field<bool> {
    match value {
        Some(v) if is_truthy(v) => Field::Present(true),
        _ => Field::Defaulted(false),
    }
}

/// Falsy values become `""`. Strings and numbers are kept and `true` is
/// rendered as text; arrays and objects have no attribute form.
fn decode_attribute_value(value: Option<&Value>) -> Field<AttributeValue> {
    match value {
        Some(v) if !is_truthy(v) => Field::Defaulted(AttributeValue::default()),
        Some(Value::String(s)) => Field::Present(AttributeValue::Text(s.clone())),
        Some(Value::Number(n)) => Field::Present(AttributeValue::Number(n.clone())),
        Some(Value::Bool(b)) => Field::Present(AttributeValue::Text(b.to_string())),
        _ => Field::Defaulted(AttributeValue::default()),
    }
}
