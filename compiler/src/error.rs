use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg: String,
        line: usize,
        column: usize,
    },

    #[error("Struct \"{0}\" is declared twice")]
    DuplicateStruct(String),

    #[error("Duplicate member \"{member}\" in struct \"{struct_name}\"")]
    DuplicateMember {
        struct_name: String,
        member: String,
    },

    #[error("Malformed type at line {line}, column {column}: {detail}")]
    MalformedType {
        detail: String,
        line: usize,
        column: usize,
    },

    #[error("Unexpected event at line {line}, column {column}: {detail}")]
    UnexpectedEvent {
        detail: String,
        line: usize,
        column: usize,
    },
}
