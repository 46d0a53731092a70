use idlgate_schema::SchemaRegistry;
use tracing::debug;

use crate::builder::SchemaCompiler;
use crate::error::CompileError;
use crate::parser::parse_events;
use crate::tokenizer::tokenize_idl;

/// Compile IDL source into a finished `SchemaRegistry`.
///
/// Single-pass and fail-fast: the first error aborts the whole build, so a
/// caller either gets a complete registry or none at all. References between
/// structs are left by name for validation-time lookup, so declaration order
/// does not matter.
pub fn compile_schema(text: &str) -> Result<SchemaRegistry, CompileError> {
    let tokens = tokenize_idl(text)?;
    let events = parse_events(&tokens)?;

    let mut compiler = SchemaCompiler::new();
    for event in events {
        compiler.apply(event)?;
    }
    let registry = compiler.finish()?;
    debug!(structs = registry.len(), "compiled schema registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgate_schema::{Primitive, SchemaNode};

    #[test]
    fn compiles_forward_reference() {
        // Holder refers to Inner before Inner is declared.
        let registry = compile_schema(
            "struct Holder { Inner inner; };\
             struct Inner { long n; };",
        )
        .unwrap();
        assert_eq!(
            registry.lookup("Holder").unwrap().member("inner"),
            Some(&SchemaNode::Reference {
                target: "Inner".to_owned()
            })
        );
        assert!(registry.contains("Inner"));
    }

    #[test]
    fn compiles_cyclic_references() {
        let registry = compile_schema(
            "struct A { B other; };\
             struct B { A other; };",
        )
        .unwrap();
        assert_eq!(registry.list_names(), ["A", "B"]);
    }

    #[test]
    fn duplicate_struct_yields_no_registry() {
        let err = compile_schema("struct A { long x; }; struct A { long y; };").unwrap_err();
        assert!(matches!(err, CompileError::DuplicateStruct(name) if name == "A"));
    }

    #[test]
    fn unknown_base_type_does_not_fail_build() {
        let registry = compile_schema("struct A { wchar c; long n; };").unwrap();
        assert_eq!(
            registry.lookup("A").unwrap().member("c"),
            Some(&SchemaNode::Unknown {
                raw: "wchar".to_owned()
            })
        );
        assert_eq!(
            registry.lookup("A").unwrap().member("n"),
            Some(&SchemaNode::Primitive(Primitive::Long))
        );
    }
}
