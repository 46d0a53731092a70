//! Event-driven schema compiler.

use idlgate_schema::{SchemaRegistry, StructDefinition};

use crate::error::CompileError;
use crate::event::{Declarator, Span, StructEvent, TypeSpec};
use crate::resolver::{apply_array_dims, resolve};

enum State {
    Idle,
    InStruct(StructDefinition),
}

/// Builds a [`SchemaRegistry`] from a stream of traversal events.
///
/// The builder owns its whole state (`Idle` / `InStruct` plus the registry
/// under construction), so independent compiles never share anything.
/// Compilation is fail-fast at registry granularity: a driving loop stops at
/// the first error and never reaches [`SchemaCompiler::finish`], so no
/// partially-valid registry is ever published.
pub struct SchemaCompiler {
    state: State,
    registry: SchemaRegistry,
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        SchemaCompiler::new()
    }
}

impl SchemaCompiler {
    pub fn new() -> Self {
        SchemaCompiler {
            state: State::Idle,
            registry: SchemaRegistry::new(),
        }
    }

    /// Dispatches one event.
    pub fn apply(&mut self, event: StructEvent) -> Result<(), CompileError> {
        match event {
            StructEvent::EnterStruct { name, span } => self.enter_struct(name, span),
            StructEvent::Member {
                type_spec,
                declarators,
                span,
            } => self.enter_member(&type_spec, &declarators, span),
            StructEvent::ExitStruct => self.exit_struct(),
        }
    }

    /// Starts a new struct. A previous struct still open is finalized first;
    /// the arrival of the next `EnterStruct` implies the old one ended.
    pub fn enter_struct(&mut self, name: String, _span: Span) -> Result<(), CompileError> {
        if let State::InStruct(_) = self.state {
            self.finalize_current()?;
        }
        if self.registry.contains(&name) {
            return Err(CompileError::DuplicateStruct(name));
        }
        self.state = State::InStruct(StructDefinition::new(name));
        Ok(())
    }

    /// Resolves the member type once, then inserts one member per declarator
    /// in declaration order.
    pub fn enter_member(
        &mut self,
        type_spec: &TypeSpec,
        declarators: &[Declarator],
        span: Span,
    ) -> Result<(), CompileError> {
        let def = match self.state {
            State::InStruct(ref mut def) => def,
            State::Idle => {
                return Err(CompileError::UnexpectedEvent {
                    detail: "member declaration outside of a struct".to_owned(),
                    line: span.line,
                    column: span.column,
                })
            }
        };

        let base = resolve(type_spec)?;
        for declarator in declarators {
            let node = apply_array_dims(base.clone(), &declarator.dims, declarator.span)?;
            def.insert_member(declarator.name.clone(), node).map_err(|e| {
                CompileError::DuplicateMember {
                    struct_name: e.struct_name,
                    member: e.member,
                }
            })?;
        }
        Ok(())
    }

    /// Finalizes the current struct into the registry under construction.
    pub fn exit_struct(&mut self) -> Result<(), CompileError> {
        match self.state {
            State::InStruct(_) => self.finalize_current(),
            State::Idle => Err(CompileError::UnexpectedEvent {
                detail: "struct exit without a matching entry".to_owned(),
                line: 0,
                column: 0,
            }),
        }
    }

    /// Finalizes a trailing unclosed struct and returns the finished
    /// registry.
    pub fn finish(mut self) -> Result<SchemaRegistry, CompileError> {
        if let State::InStruct(_) = self.state {
            self.finalize_current()?;
        }
        Ok(self.registry)
    }

    fn finalize_current(&mut self) -> Result<(), CompileError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::InStruct(def) => self
                .registry
                .register(def)
                .map_err(|e| CompileError::DuplicateStruct(e.0)),
            State::Idle => Ok(()),
        }
    }
}
