use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// Base types of the supported IDL subset.
///
/// Width, signedness, and format live here so every consumer (resolver,
/// validator, document emitter) reads from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Primitive {
    Float,
    Double,
    Boolean,
    Short,
    Long,
    Octet,
    String,
}

impl Primitive {
    /// The IDL keyword for this base type.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Boolean => "boolean",
            Primitive::Short => "short",
            Primitive::Long => "long",
            Primitive::Octet => "octet",
            Primitive::String => "string",
        }
    }

    pub fn bit_width(self) -> u32 {
        match self {
            Primitive::Float => 32,
            Primitive::Double => 64,
            Primitive::Boolean => 8,
            Primitive::Short => 16,
            Primitive::Long => 32,
            Primitive::Octet => 8,
            Primitive::String => 0,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, Primitive::Octet | Primitive::Boolean | Primitive::String)
    }

    /// Format tag carried in the canonical document, `None` where the JSON
    /// type alone is exact (boolean, string).
    pub fn format(self) -> Option<&'static str> {
        match self {
            Primitive::Float => Some("float"),
            Primitive::Double => Some("double"),
            Primitive::Short => Some("int16"),
            Primitive::Long => Some("int32"),
            Primitive::Octet => Some("uint8"),
            Primitive::Boolean | Primitive::String => None,
        }
    }

    /// JSON type name used in the canonical document.
    pub fn json_type(self) -> &'static str {
        match self {
            Primitive::Float | Primitive::Double => "number",
            Primitive::Boolean => "boolean",
            Primitive::Short | Primitive::Long | Primitive::Octet => "integer",
            Primitive::String => "string",
        }
    }

    /// Inclusive value range for the integer kinds, `None` otherwise.
    pub fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            Primitive::Short => Some((i16::MIN as i64, i16::MAX as i64)),
            Primitive::Long => Some((i32::MIN as i64, i32::MAX as i64)),
            Primitive::Octet => Some((u8::MIN as i64, u8::MAX as i64)),
            _ => None,
        }
    }
}

/// One node of a compiled schema tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SchemaNode {
    Primitive(Primitive),
    /// Late-bound pointer to another struct. Resolved against the registry at
    /// validation time, never inlined, so declaration order is irrelevant.
    Reference { target: String },
    Sequence {
        element: Box<SchemaNode>,
        bound: Option<u64>,
    },
    /// Exact-length array. Multiple declared dimensions nest as repeated
    /// layers, outermost dimension first.
    FixedArray {
        element: Box<SchemaNode>,
        length: u64,
    },
    /// Base-type text the resolver has no mapping for. Kept verbatim so one
    /// unmapped construct does not block an otherwise-valid build.
    Unknown { raw: String },
}

/// A named member of a struct definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub name: String,
    pub node: SchemaNode,
}

/// Raised by [`StructDefinition::insert_member`] on a repeated field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate member \"{member}\" in struct \"{struct_name}\"")]
pub struct DuplicateMember {
    pub struct_name: String,
    pub member: String,
}

/// Raised by [`SchemaRegistry::register`] on a repeated struct name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("struct \"{0}\" is defined twice")]
pub struct DuplicateStruct(pub String);

/// A compiled struct: a name plus its members in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDefinition {
    name: String,
    members: Vec<Member>,
}

impl StructDefinition {
    pub fn new(name: String) -> Self {
        StructDefinition {
            name,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a member, preserving declaration order.
    pub fn insert_member(&mut self, name: String, node: SchemaNode) -> Result<(), DuplicateMember> {
        if self.members.iter().any(|m| m.name == name) {
            return Err(DuplicateMember {
                struct_name: self.name.clone(),
                member: name,
            });
        }
        self.members.push(Member { name, node });
        Ok(())
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&SchemaNode> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.node)
    }
}

/// Immutable mapping from struct name to finalized [`StructDefinition`].
///
/// Built once per compile pass and published as a single snapshot; lookups
/// and listings are read-only, so a snapshot may be shared across threads
/// without locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    definitions: Vec<StructDefinition>,
    by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Inserts a finalized definition. Fails if the name is already taken in
    /// this build.
    pub fn register(&mut self, def: StructDefinition) -> Result<(), DuplicateStruct> {
        if self.by_name.contains_key(def.name()) {
            return Err(DuplicateStruct(def.name().to_owned()));
        }
        self.by_name
            .insert(def.name().to_owned(), self.definitions.len());
        self.definitions.push(def);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&StructDefinition> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Struct names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StructDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_table() {
        assert_eq!(Primitive::Float.bit_width(), 32);
        assert_eq!(Primitive::Double.bit_width(), 64);
        assert_eq!(Primitive::Octet.integer_range(), Some((0, 255)));
        assert_eq!(Primitive::Short.integer_range(), Some((-32768, 32767)));
        assert!(!Primitive::Octet.is_signed());
        assert!(Primitive::Long.is_signed());
        assert_eq!(Primitive::Long.format(), Some("int32"));
        assert_eq!(Primitive::Boolean.format(), None);
        assert_eq!(Primitive::String.json_type(), "string");
    }

    #[test]
    fn member_order_is_declaration_order() {
        let mut def = StructDefinition::new("A".to_owned());
        def.insert_member("b".to_owned(), SchemaNode::Primitive(Primitive::Long))
            .unwrap();
        def.insert_member("a".to_owned(), SchemaNode::Primitive(Primitive::Short))
            .unwrap();
        let names: Vec<_> = def.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn duplicate_member_rejected() {
        let mut def = StructDefinition::new("A".to_owned());
        def.insert_member("x".to_owned(), SchemaNode::Primitive(Primitive::Long))
            .unwrap();
        let err = def
            .insert_member("x".to_owned(), SchemaNode::Primitive(Primitive::Long))
            .unwrap_err();
        assert_eq!(err.struct_name, "A");
        assert_eq!(err.member, "x");
    }

    #[test]
    fn registry_preserves_registration_order() {
        let mut registry = SchemaRegistry::new();
        registry.register(StructDefinition::new("B".to_owned())).unwrap();
        registry.register(StructDefinition::new("A".to_owned())).unwrap();
        assert_eq!(registry.list_names(), ["B", "A"]);
        assert!(registry.lookup("A").is_some());
        assert!(registry.lookup("a").is_none());
    }

    #[test]
    fn registry_rejects_duplicate_struct() {
        let mut registry = SchemaRegistry::new();
        registry.register(StructDefinition::new("A".to_owned())).unwrap();
        let err = registry
            .register(StructDefinition::new("A".to_owned()))
            .unwrap_err();
        assert_eq!(err, DuplicateStruct("A".to_owned()));
    }
}
