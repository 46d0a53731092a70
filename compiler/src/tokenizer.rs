use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CompileError;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(
        r"(\b\d+\b|::|[<>,;{}\[\]]|\b[A-Za-z_][A-Za-z0-9_]*\b|//[^\n]*|/\*[\s\S]*?\*/|#[^\n]*|\s+)"
    )
    .unwrap();
    pub static ref SKIP_RX: Regex = Regex::new(r"^(//[^\n]*|/\*[\s\S]*?\*/|#[^\n]*|\s+)$").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Splits IDL source into tokens, tracking line and column.
///
/// Comments (`//`, `/* */`) and preprocessor lines (`#include` and friends)
/// are skipped. Text the token pattern cannot account for is a parse error.
/// A trailing empty token marks end of input.
pub fn tokenize_idl(text: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end = mat.end();
        let part = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(syntax_error(unexpected, line, column));
        }

        if !SKIP_RX.is_match(part) {
            tokens.push(Token {
                text: part.to_string(),
                line,
                column,
            });
        }

        // Update line/column
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(syntax_error(unexpected, line, column));
    }

    // Append EOF token
    tokens.push(Token {
        text: "".to_string(),
        line,
        column,
    });
    Ok(tokens)
}

fn syntax_error(unexpected: &str, line: usize, column: usize) -> CompileError {
    CompileError::ParseError {
        msg: format!("Syntax error: {:?}", unexpected),
        line,
        column,
    }
}
