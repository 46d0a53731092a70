//! idlgate-compiler
//!
//! This crate implements:
//!  1) A tokenizer + event-producing parser for the supported IDL subset,
//!  2) A type resolver mapping IDL type specifiers to schema nodes,
//!  3) An event-driven schema compiler (`SchemaCompiler`) that builds a
//!     `SchemaRegistry` from struct/member traversal events,
//!  4) `compile_schema` tying the pipeline together, and
//!  5) Error types (`CompileError`).
//!
//! The compiler core depends only on the [`event::StructEvent`] contract;
//! the bundled tokenizer/parser is one producer of that stream, and any
//! grammar front end emitting the same events can drive it.

pub mod builder;
pub mod compiler;
pub mod error;
pub mod event;
pub mod parser;
pub mod resolver;
pub mod tokenizer;

pub use builder::SchemaCompiler;
pub use compiler::compile_schema;
pub use error::CompileError;
pub use event::{Declarator, Span, StructEvent, TypeSpec};
pub use resolver::resolve;
