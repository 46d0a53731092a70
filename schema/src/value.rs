//! Typed value trees produced by successful validation.

use serde_json::{json, Value as JsonValue};

/// A payload that passed validation, shaped like the schema it was checked
/// against and carrying concrete, range-checked data.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedValue {
    Bool(bool),
    Float(f32),
    Double(f64),
    Short(i16),
    Long(i32),
    Octet(u8),
    String(String),
    Array(Vec<ValidatedValue>),
    /// Struct value. Fields are in schema member order.
    Object {
        name: String,
        fields: Vec<(String, ValidatedValue)>,
    },
    /// Value admitted through an `Unknown` schema node, kept verbatim.
    Opaque(JsonValue),
}

impl ValidatedValue {
    /// A convenience method to extract the value out of a [Bool](#variant.Bool).
    /// Returns `None` for other value kinds.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ValidatedValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ValidatedValue::Float(value) => Some(value as f64),
            ValidatedValue::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ValidatedValue::Short(value) => Some(value as i64),
            ValidatedValue::Long(value) => Some(value as i64),
            ValidatedValue::Octet(value) => Some(value as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            ValidatedValue::String(ref value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ValidatedValue]> {
        match *self {
            ValidatedValue::Array(ref values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Looks up a field of an [Object](#variant.Object) by name.
    pub fn field(&self, name: &str) -> Option<&ValidatedValue> {
        match *self {
            ValidatedValue::Object { ref fields, .. } => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Renders the tree back into JSON, field order following the schema.
    pub fn to_json(&self) -> JsonValue {
        match self {
            ValidatedValue::Bool(value) => json!(value),
            ValidatedValue::Float(value) => json!(value),
            ValidatedValue::Double(value) => json!(value),
            ValidatedValue::Short(value) => json!(value),
            ValidatedValue::Long(value) => json!(value),
            ValidatedValue::Octet(value) => json!(value),
            ValidatedValue::String(value) => json!(value),
            ValidatedValue::Array(values) => {
                JsonValue::Array(values.iter().map(ValidatedValue::to_json).collect())
            }
            ValidatedValue::Object { fields, .. } => JsonValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            ValidatedValue::Opaque(value) => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(ValidatedValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ValidatedValue::Octet(200).as_i64(), Some(200));
        assert_eq!(ValidatedValue::Short(-7).as_i64(), Some(-7));
        assert_eq!(ValidatedValue::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(ValidatedValue::Long(1).as_bool(), None);
    }

    #[test]
    fn object_field_lookup() {
        let value = ValidatedValue::Object {
            name: "A".to_owned(),
            fields: vec![
                ("x".to_owned(), ValidatedValue::Long(1)),
                ("y".to_owned(), ValidatedValue::Bool(false)),
            ],
        };
        assert_eq!(value.field("y"), Some(&ValidatedValue::Bool(false)));
        assert_eq!(value.field("z"), None);
    }

    #[test]
    fn to_json_round_trip_shape() {
        let value = ValidatedValue::Object {
            name: "A".to_owned(),
            fields: vec![
                ("x".to_owned(), ValidatedValue::Float(12300.0)),
                (
                    "tags".to_owned(),
                    ValidatedValue::Array(vec![ValidatedValue::String("p".to_owned())]),
                ),
            ],
        };
        assert_eq!(value.to_json(), json!({"x": 12300.0, "tags": ["p"]}));
    }
}
