//! Canonical schema model and JSON payload validator for idlgate.
//!
//! A [`SchemaRegistry`] maps topic names to [`StructDefinition`]s compiled
//! from IDL struct declarations. A [`Validator`] checks a `serde_json::Value`
//! payload against a registered definition, returning either a typed
//! [`ValidatedValue`] tree or the full list of violations found.
//!
//! ```
//! use idlgate_schema::*;
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! let mut def = StructDefinition::new("Point".to_owned());
//! def.insert_member("x".to_owned(), SchemaNode::Primitive(Primitive::Float)).unwrap();
//! def.insert_member("y".to_owned(), SchemaNode::Primitive(Primitive::Float)).unwrap();
//! registry.register(def).unwrap();
//!
//! let value = Validator::new(&registry)
//!     .validate("Point", &json!({"x": 0.5, "y": -0.5}))
//!     .unwrap();
//! assert_eq!(value.to_json(), json!({"x": 0.5, "y": -0.5}));
//! ```

pub mod document;
pub mod schema;
pub mod validate;
pub mod value;

pub use schema::*;
pub use validate::*;
pub use value::*;
