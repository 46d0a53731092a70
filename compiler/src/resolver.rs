//! Maps IDL type specifiers to canonical schema nodes.

use idlgate_schema::{Primitive, SchemaNode};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CompileError;
use crate::event::{Span, TypeSpec};

lazy_static! {
    static ref SCOPED_NAME: Regex =
        Regex::new(r"^(::)?[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// Looks up a single base-type keyword.
fn primitive_of(text: &str) -> Option<Primitive> {
    match text {
        "float" => Some(Primitive::Float),
        "double" => Some(Primitive::Double),
        "boolean" => Some(Primitive::Boolean),
        "short" => Some(Primitive::Short),
        "long" => Some(Primitive::Long),
        "octet" => Some(Primitive::Octet),
        "string" => Some(Primitive::String),
        _ => None,
    }
}

/// Resolves one type specifier to one schema node.
///
/// Pure and deterministic. Unmapped base-type text resolves to
/// `SchemaNode::Unknown` rather than failing, so an undocumented construct
/// does not block an otherwise-valid build. Only structurally broken
/// specifiers (empty text, names that are not identifier-shaped) are
/// `MalformedType` errors.
pub fn resolve(spec: &TypeSpec) -> Result<SchemaNode, CompileError> {
    match spec {
        TypeSpec::Basic { text, span } => {
            if text.is_empty() {
                return Err(malformed("empty type specifier", *span));
            }
            Ok(match primitive_of(text) {
                Some(primitive) => SchemaNode::Primitive(primitive),
                None => SchemaNode::Unknown { raw: text.clone() },
            })
        }

        TypeSpec::Scoped { name, span } => {
            if !SCOPED_NAME.is_match(name) {
                return Err(malformed(
                    &format!("\"{}\" is not a valid scoped name", name),
                    *span,
                ));
            }
            // Event producers other than the bundled parser may hand base
            // types through as scoped names; give them the same table.
            if let Some(primitive) = primitive_of(name) {
                return Ok(SchemaNode::Primitive(primitive));
            }
            Ok(SchemaNode::Reference {
                target: name.clone(),
            })
        }

        TypeSpec::Sequence {
            element,
            bound,
            span: _,
        } => Ok(SchemaNode::Sequence {
            element: Box::new(resolve(element)?),
            bound: *bound,
        }),
    }
}

/// Wraps `node` in one `FixedArray` layer per declared dimension, outermost
/// dimension first, so `short b[2][3]` reads as two rows of three.
pub fn apply_array_dims(
    node: SchemaNode,
    dims: &[u64],
    span: Span,
) -> Result<SchemaNode, CompileError> {
    let mut wrapped = node;
    for &dim in dims.iter().rev() {
        if dim == 0 {
            return Err(malformed("array dimension must be positive", span));
        }
        wrapped = SchemaNode::FixedArray {
            element: Box::new(wrapped),
            length: dim,
        };
    }
    Ok(wrapped)
}

fn malformed(detail: &str, span: Span) -> CompileError {
    CompileError::MalformedType {
        detail: detail.to_owned(),
        line: span.line,
        column: span.column,
    }
}
