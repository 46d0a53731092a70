//! Structural validation of JSON payloads against a schema registry.
//!
//! Validation is exhaustive: the walk keeps going after a violation and
//! reports every problem found in a payload, each tagged with a dotted and
//! indexed field path such as `b.c[2]`. A caller can therefore fix all
//! problems in one round trip.

use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::schema::{Primitive, SchemaNode, SchemaRegistry, StructDefinition};
use crate::value::ValidatedValue;

/// One violation found while validating a payload.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("unknown topic \"{topic}\", available topics: {available:?}")]
    UnknownTopic {
        topic: String,
        available: Vec<String>,
    },

    #[error("missing required field \"{path}\"")]
    MissingField { path: String },

    #[error("unexpected field \"{path}\"")]
    UnexpectedField { path: String },

    #[error("type mismatch at \"{path}\": expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("value at \"{path}\" out of range [{min}, {max}]")]
    OutOfRange { path: String, min: f64, max: f64 },

    #[error("length mismatch at \"{path}\": expected {expected}, found {actual}")]
    LengthMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("unresolved reference at \"{path}\": no struct named \"{target}\"")]
    UnresolvedReference { path: String, target: String },
}

/// How to treat payload keys not declared in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Undeclared keys are violations.
    #[default]
    Strict,
    /// Undeclared keys are ignored.
    Lenient,
}

/// Read-only validation dispatcher over a registry snapshot.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
    policy: UnknownFieldPolicy,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Validator {
            registry,
            policy: UnknownFieldPolicy::default(),
        }
    }

    pub fn with_policy(registry: &'a SchemaRegistry, policy: UnknownFieldPolicy) -> Self {
        Validator { registry, policy }
    }

    /// Validates `payload` against the struct registered under `topic`
    /// (exact, case-sensitive match).
    ///
    /// Returns the typed value tree on success, or every violation found.
    pub fn validate(
        &self,
        topic: &str,
        payload: &JsonValue,
    ) -> Result<ValidatedValue, Vec<ValidationError>> {
        let def = match self.registry.lookup(topic) {
            Some(def) => def,
            None => {
                return Err(vec![ValidationError::UnknownTopic {
                    topic: topic.to_owned(),
                    available: self.registry.list_names(),
                }])
            }
        };

        let mut errors = Vec::new();
        let value = self.check_struct(def, payload, "", &mut errors);
        match value {
            Some(value) if errors.is_empty() => Ok(value),
            _ => Err(errors),
        }
    }

    fn check_struct(
        &self,
        def: &StructDefinition,
        value: &JsonValue,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<ValidatedValue> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                errors.push(ValidationError::TypeMismatch {
                    path: path.to_owned(),
                    expected: format!("object ({})", def.name()),
                    found: json_kind(value).to_owned(),
                });
                return None;
            }
        };

        let mut fields = Vec::with_capacity(def.members().len());
        let mut complete = true;
        for member in def.members() {
            let member_path = join_field(path, &member.name);
            match object.get(&member.name) {
                Some(field_value) => {
                    match self.check_node(&member.node, field_value, &member_path, errors) {
                        Some(checked) => fields.push((member.name.clone(), checked)),
                        None => complete = false,
                    }
                }
                None => {
                    errors.push(ValidationError::MissingField { path: member_path });
                    complete = false;
                }
            }
        }

        if self.policy == UnknownFieldPolicy::Strict {
            for key in object.keys() {
                if def.member(key).is_none() {
                    errors.push(ValidationError::UnexpectedField {
                        path: join_field(path, key),
                    });
                    complete = false;
                }
            }
        }

        if complete {
            Some(ValidatedValue::Object {
                name: def.name().to_owned(),
                fields,
            })
        } else {
            None
        }
    }

    fn check_node(
        &self,
        node: &SchemaNode,
        value: &JsonValue,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<ValidatedValue> {
        match node {
            SchemaNode::Primitive(primitive) => {
                self.check_primitive(*primitive, value, path, errors)
            }

            SchemaNode::Reference { target } => match self.registry.lookup(target) {
                Some(def) => self.check_struct(def, value, path, errors),
                None => {
                    errors.push(ValidationError::UnresolvedReference {
                        path: path.to_owned(),
                        target: target.clone(),
                    });
                    None
                }
            },

            SchemaNode::Sequence { element, bound } => {
                let items = match value.as_array() {
                    Some(items) => items,
                    None => {
                        errors.push(ValidationError::TypeMismatch {
                            path: path.to_owned(),
                            expected: "array".to_owned(),
                            found: json_kind(value).to_owned(),
                        });
                        return None;
                    }
                };
                if let Some(bound) = bound {
                    if items.len() as u64 > *bound {
                        errors.push(ValidationError::LengthMismatch {
                            path: path.to_owned(),
                            expected: *bound,
                            actual: items.len() as u64,
                        });
                        return None;
                    }
                }
                self.check_elements(element, items, path, errors)
            }

            SchemaNode::FixedArray { element, length } => {
                let items = match value.as_array() {
                    Some(items) => items,
                    None => {
                        errors.push(ValidationError::TypeMismatch {
                            path: path.to_owned(),
                            expected: "array".to_owned(),
                            found: json_kind(value).to_owned(),
                        });
                        return None;
                    }
                };
                if items.len() as u64 != *length {
                    errors.push(ValidationError::LengthMismatch {
                        path: path.to_owned(),
                        expected: *length,
                        actual: items.len() as u64,
                    });
                    return None;
                }
                self.check_elements(element, items, path, errors)
            }

            // No contract to check against: admit the value verbatim.
            SchemaNode::Unknown { .. } => Some(ValidatedValue::Opaque(value.clone())),
        }
    }

    fn check_elements(
        &self,
        element: &SchemaNode,
        items: &[JsonValue],
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<ValidatedValue> {
        let mut checked = Vec::with_capacity(items.len());
        let mut complete = true;
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            match self.check_node(element, item, &item_path, errors) {
                Some(value) => checked.push(value),
                None => complete = false,
            }
        }
        if complete {
            Some(ValidatedValue::Array(checked))
        } else {
            None
        }
    }

    fn check_primitive(
        &self,
        primitive: Primitive,
        value: &JsonValue,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<ValidatedValue> {
        let mismatch = |errors: &mut Vec<ValidationError>| {
            errors.push(ValidationError::TypeMismatch {
                path: path.to_owned(),
                expected: primitive.keyword().to_owned(),
                found: json_kind(value).to_owned(),
            });
            None
        };

        match primitive {
            Primitive::Boolean => match value.as_bool() {
                Some(b) => Some(ValidatedValue::Bool(b)),
                None => mismatch(errors),
            },

            Primitive::String => match value.as_str() {
                Some(s) => Some(ValidatedValue::String(s.to_owned())),
                None => mismatch(errors),
            },

            Primitive::Double => match value.as_f64() {
                Some(n) => Some(ValidatedValue::Double(n)),
                None => mismatch(errors),
            },

            Primitive::Float => {
                let n = match value.as_f64() {
                    Some(n) => n,
                    None => return mismatch(errors),
                };
                if n.abs() > f32::MAX as f64 {
                    errors.push(ValidationError::OutOfRange {
                        path: path.to_owned(),
                        min: f32::MIN as f64,
                        max: f32::MAX as f64,
                    });
                    return None;
                }
                Some(ValidatedValue::Float(n as f32))
            }

            Primitive::Short | Primitive::Long | Primitive::Octet => {
                if !value.is_number() {
                    return mismatch(errors);
                }
                let n = match integer_of(value) {
                    Some(n) => n,
                    None => {
                        // A number, but not an integer (fractional part, or
                        // beyond i64): fractions are a kind mismatch, huge
                        // magnitudes are out of range for every integer kind.
                        if value.as_f64().is_some_and(|f| f.fract() != 0.0) {
                            errors.push(ValidationError::TypeMismatch {
                                path: path.to_owned(),
                                expected: format!("integer ({})", primitive.keyword()),
                                found: "fractional number".to_owned(),
                            });
                            return None;
                        }
                        let (min, max) = primitive
                            .integer_range()
                            .unwrap_or((i64::MIN, i64::MAX));
                        errors.push(ValidationError::OutOfRange {
                            path: path.to_owned(),
                            min: min as f64,
                            max: max as f64,
                        });
                        return None;
                    }
                };
                let (min, max) = primitive
                    .integer_range()
                    .unwrap_or((i64::MIN, i64::MAX));
                if n < min || n > max {
                    errors.push(ValidationError::OutOfRange {
                        path: path.to_owned(),
                        min: min as f64,
                        max: max as f64,
                    });
                    return None;
                }
                Some(match primitive {
                    Primitive::Short => ValidatedValue::Short(n as i16),
                    Primitive::Long => ValidatedValue::Long(n as i32),
                    Primitive::Octet => ValidatedValue::Octet(n as u8),
                    _ => unreachable!(),
                })
            }
        }
    }
}

/// Extracts an integral number, tolerating encoders that emit `1.0` for `1`.
fn integer_of(value: &JsonValue) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    // u64 beyond i64::MAX is out of range for every supported integer kind.
    if value.as_u64().is_some() {
        return None;
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn join_field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", path, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StructDefinition;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut a = StructDefinition::new("A".to_owned());
        a.insert_member("x".to_owned(), SchemaNode::Primitive(Primitive::Float))
            .unwrap();
        a.insert_member("y".to_owned(), SchemaNode::Primitive(Primitive::Boolean))
            .unwrap();

        let mut b = StructDefinition::new("B".to_owned());
        b.insert_member(
            "a".to_owned(),
            SchemaNode::Reference {
                target: "A".to_owned(),
            },
        )
        .unwrap();
        b.insert_member(
            "b".to_owned(),
            SchemaNode::FixedArray {
                element: Box::new(SchemaNode::Primitive(Primitive::Short)),
                length: 3,
            },
        )
        .unwrap();
        b.insert_member(
            "c".to_owned(),
            SchemaNode::Sequence {
                element: Box::new(SchemaNode::Primitive(Primitive::String)),
                bound: None,
            },
        )
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register(a).unwrap();
        registry.register(b).unwrap();
        registry
    }

    #[test]
    fn flat_struct_validates_and_echoes() {
        let registry = registry();
        let value = Validator::new(&registry)
            .validate("A", &json!({"x": 12300.0, "y": true}))
            .unwrap();
        assert_eq!(value.to_json(), json!({"x": 12300.0, "y": true}));
    }

    #[test]
    fn nested_struct_with_array_and_sequence() {
        let registry = registry();
        let payload = json!({"a": {"x": 1, "y": false}, "b": [1, 2, 3], "c": ["p"]});
        let value = Validator::new(&registry).validate("B", &payload).unwrap();
        assert_eq!(value.field("b").unwrap().as_array().unwrap().len(), 3);
    }

    #[test]
    fn fixed_array_length_is_exact() {
        let registry = registry();
        let payload = json!({"a": {"x": 1, "y": false}, "b": [1, 2], "c": ["p"]});
        let errors = Validator::new(&registry).validate("B", &payload).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::LengthMismatch {
                path: "b".to_owned(),
                expected: 3,
                actual: 2,
            }]
        );
    }

    #[test]
    fn unknown_topic_reports_available() {
        let registry = registry();
        let errors = Validator::new(&registry)
            .validate("Unknown", &json!({}))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownTopic {
                topic: "Unknown".to_owned(),
                available: vec!["A".to_owned(), "B".to_owned()],
            }]
        );
    }

    #[test]
    fn octet_range_checks() {
        let mut def = StructDefinition::new("O".to_owned());
        def.insert_member("v".to_owned(), SchemaNode::Primitive(Primitive::Octet))
            .unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(def).unwrap();
        let validator = Validator::new(&registry);

        assert!(validator.validate("O", &json!({"v": 200})).is_ok());
        for bad in [300, -1] {
            let errors = validator.validate("O", &json!({ "v": bad })).unwrap_err();
            assert_eq!(
                errors,
                vec![ValidationError::OutOfRange {
                    path: "v".to_owned(),
                    min: 0.0,
                    max: 255.0,
                }]
            );
        }
    }

    #[test]
    fn all_violations_reported_in_one_pass() {
        let registry = registry();
        // y missing, x out of no range but wrong kind: two independent problems
        let errors = Validator::new(&registry)
            .validate("A", &json!({"x": "not a number"}))
            .unwrap_err();
        assert!(errors.contains(&ValidationError::TypeMismatch {
            path: "x".to_owned(),
            expected: "float".to_owned(),
            found: "string".to_owned(),
        }));
        assert!(errors.contains(&ValidationError::MissingField {
            path: "y".to_owned()
        }));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn strict_rejects_undeclared_keys_lenient_ignores() {
        let registry = registry();
        let payload = json!({"x": 1.0, "y": true, "extra": 1});

        let errors = Validator::new(&registry).validate("A", &payload).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnexpectedField {
                path: "extra".to_owned()
            }]
        );

        let value = Validator::with_policy(&registry, UnknownFieldPolicy::Lenient)
            .validate("A", &payload)
            .unwrap();
        assert_eq!(value.field("extra"), None);
    }

    #[test]
    fn nested_paths_are_dotted_and_indexed() {
        let registry = registry();
        let payload = json!({"a": {"x": 1, "y": 2}, "b": [1, 2, 70000], "c": [3]});
        let errors = Validator::new(&registry).validate("B", &payload).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::TypeMismatch { path, .. } if path == "a.y"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::OutOfRange { path, .. } if path == "b[2]"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::TypeMismatch { path, .. } if path == "c[0]"
        )));
    }

    #[test]
    fn unresolved_reference_is_late_bound() {
        let mut def = StructDefinition::new("Holder".to_owned());
        def.insert_member(
            "inner".to_owned(),
            SchemaNode::Reference {
                target: "Missing".to_owned(),
            },
        )
        .unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(def).unwrap();

        let errors = Validator::new(&registry)
            .validate("Holder", &json!({"inner": {}}))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnresolvedReference {
                path: "inner".to_owned(),
                target: "Missing".to_owned(),
            }]
        );
    }

    #[test]
    fn fractional_number_for_integer_member_is_mismatch() {
        let registry = registry();
        let payload = json!({"a": {"x": 1, "y": false}, "b": [1, 2.5, 3], "c": []});
        let errors = Validator::new(&registry).validate("B", &payload).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::TypeMismatch { path, .. } if path == "b[1]"
        )));
    }

    #[test]
    fn whole_float_accepted_for_integer_member() {
        let registry = registry();
        let payload = json!({"a": {"x": 1, "y": false}, "b": [1.0, 2.0, 3.0], "c": []});
        let value = Validator::new(&registry).validate("B", &payload).unwrap();
        assert_eq!(
            value.field("b").unwrap().as_array().unwrap()[0],
            ValidatedValue::Short(1)
        );
    }

    #[test]
    fn bounded_sequence_enforces_bound() {
        let mut def = StructDefinition::new("S".to_owned());
        def.insert_member(
            "tags".to_owned(),
            SchemaNode::Sequence {
                element: Box::new(SchemaNode::Primitive(Primitive::String)),
                bound: Some(2),
            },
        )
        .unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(def).unwrap();
        let validator = Validator::new(&registry);

        assert!(validator.validate("S", &json!({"tags": ["a", "b"]})).is_ok());
        let errors = validator
            .validate("S", &json!({"tags": ["a", "b", "c"]}))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::LengthMismatch {
                path: "tags".to_owned(),
                expected: 2,
                actual: 3,
            }]
        );
    }

    #[test]
    fn unknown_node_admits_anything() {
        let mut def = StructDefinition::new("U".to_owned());
        def.insert_member(
            "blob".to_owned(),
            SchemaNode::Unknown {
                raw: "wchar".to_owned(),
            },
        )
        .unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(def).unwrap();

        let value = Validator::new(&registry)
            .validate("U", &json!({"blob": [1, {"k": null}]}))
            .unwrap();
        assert_eq!(
            value.field("blob"),
            Some(&ValidatedValue::Opaque(json!([1, {"k": null}])))
        );
    }
}
