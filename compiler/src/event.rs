//! Traversal events consumed by the schema compiler.
//!
//! A grammar front end walks the declaration tree in document order and
//! emits, per struct, `EnterStruct`, one `Member` per member declaration,
//! and `ExitStruct`. The compiler depends only on this contract, not on any
//! particular parser.

/// Source position carried through events for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }
}

/// An IDL type specifier as the front end saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// A base-type keyword phrase, possibly multi-word (`unsigned short`).
    Basic { text: String, span: Span },
    /// A (possibly `::`-qualified) name referring to another declaration.
    Scoped { name: String, span: Span },
    /// `sequence<T>` or `sequence<T, N>`.
    Sequence {
        element: Box<TypeSpec>,
        bound: Option<u64>,
        span: Span,
    },
}

impl TypeSpec {
    pub fn span(&self) -> Span {
        match self {
            TypeSpec::Basic { span, .. }
            | TypeSpec::Scoped { span, .. }
            | TypeSpec::Sequence { span, .. } => *span,
        }
    }
}

/// One declared name in a member declaration, with its array dimensions in
/// declaration order (`short b[2][3]` has dims `[2, 3]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub dims: Vec<u64>,
    pub span: Span,
}

/// One traversal event.
#[derive(Debug, Clone, PartialEq)]
pub enum StructEvent {
    EnterStruct {
        name: String,
        span: Span,
    },
    /// A member declaration. One declaration may list several declarators
    /// (`long a, b;`), expanding to one member each in order.
    Member {
        type_spec: TypeSpec,
        declarators: Vec<Declarator>,
        span: Span,
    },
    ExitStruct,
}
