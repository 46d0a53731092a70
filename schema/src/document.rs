//! Canonical JSON-Schema-like document emission.
//!
//! The document doubles as human-facing topic documentation and as the
//! validation contract, consumable by any tool that understands
//! `definitions` / `$ref` style schemas:
//!
//! ```text
//! {"definitions": {"<Struct>": {"type": "object", "properties": {"<field>": <TypeDescriptor>}}}}
//! ```

use serde_json::{json, Map, Value as JsonValue};

use crate::schema::{SchemaNode, SchemaRegistry, StructDefinition};

impl SchemaNode {
    /// The TypeDescriptor for this node.
    pub fn descriptor(&self) -> JsonValue {
        match self {
            SchemaNode::Primitive(primitive) => match primitive.format() {
                Some(format) => json!({"type": primitive.json_type(), "format": format}),
                None => json!({"type": primitive.json_type()}),
            },
            SchemaNode::Reference { target } => {
                json!({"$ref": format!("#/definitions/{}", target)})
            }
            SchemaNode::Sequence { element, bound } => match bound {
                Some(bound) => {
                    json!({"type": "array", "items": element.descriptor(), "maxItems": bound})
                }
                None => json!({"type": "array", "items": element.descriptor()}),
            },
            SchemaNode::FixedArray { element, length } => {
                json!({"type": "array", "items": element.descriptor(), "length": length})
            }
            // Same passthrough the original bridge used: unmapped type text
            // surfaces verbatim as the "type" value.
            SchemaNode::Unknown { raw } => json!({ "type": raw }),
        }
    }
}

impl StructDefinition {
    /// The `{"type":"object","properties":{...}}` entry for this struct.
    pub fn to_document(&self) -> JsonValue {
        let mut properties = Map::new();
        for member in self.members() {
            properties.insert(member.name.clone(), member.node.descriptor());
        }
        json!({"type": "object", "properties": properties})
    }
}

impl SchemaRegistry {
    /// The canonical document covering every registered struct.
    pub fn to_document(&self) -> JsonValue {
        let mut definitions = Map::new();
        for def in self.iter() {
            definitions.insert(def.name().to_owned(), def.to_document());
        }
        json!({ "definitions": definitions })
    }
}
