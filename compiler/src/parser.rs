use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CompileError;
use crate::event::{Declarator, Span, StructEvent, TypeSpec};
use crate::tokenizer::Token;

lazy_static! {
    static ref IDENTIFIER:     Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref INTEGER:        Regex = Regex::new(r"^\d+$").unwrap();
    static ref SEMICOLON:      Regex = Regex::new(r"^;$").unwrap();
    static ref COMMA:          Regex = Regex::new(r"^,$").unwrap();
    static ref LEFT_BRACE:     Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:    Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_ANGLE:     Regex = Regex::new(r"^<$").unwrap();
    static ref RIGHT_ANGLE:    Regex = Regex::new(r"^>$").unwrap();
    static ref LEFT_BRACKET:   Regex = Regex::new(r"^\[$").unwrap();
    static ref RIGHT_BRACKET:  Regex = Regex::new(r"^\]$").unwrap();
    static ref SCOPE:          Regex = Regex::new(r"^::$").unwrap();
    static ref STRUCT_KEYWORD: Regex = Regex::new(r"^struct$").unwrap();
    static ref EOF:            Regex = Regex::new(r"^$").unwrap();
}

/// Base-type keywords that begin a primitive type phrase.
const BASE_KEYWORDS: [&str; 10] = [
    "float", "double", "boolean", "short", "long", "octet", "string", "char", "wchar", "unsigned",
];

/// Declaration keywords the subset deliberately does not model. Named in the
/// error so nothing is silently dropped.
const UNSUPPORTED_KEYWORDS: [&str; 6] =
    ["enum", "union", "typedef", "module", "interface", "const"];

/// Parses tokens into the traversal event stream the compiler consumes:
/// `EnterStruct`, `Member*`, `ExitStruct` per declared struct, in document
/// order.
pub fn parse_events(tokens: &[Token]) -> Result<Vec<StructEvent>, CompileError> {
    let mut events = Vec::new();
    let mut index = 0;

    while index < tokens.len() && !eat(tokens, &mut index, &EOF) {
        parse_struct(tokens, &mut index, &mut events)?;
    }

    Ok(events)
}

fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
    // The EOF sentinel is never consumed, so the index stays in bounds.
    tokens.get(index).expect("unexpected end of tokens")
}

fn span_of(token: &Token) -> Span {
    Span::new(token.line, token.column)
}

fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
    if test.is_match(&current_token(tokens, *index).text) {
        *index += 1;
        true
    } else {
        false
    }
}

fn expect(
    tokens: &[Token],
    index: &mut usize,
    test: &Regex,
    expected: &str,
) -> Result<(), CompileError> {
    if !eat(tokens, index, test) {
        let tok = current_token(tokens, *index);
        return Err(parse_error(
            &format!("Expected {} but found {:?}", expected, tok.text),
            tok,
        ));
    }
    Ok(())
}

fn parse_error(msg: &str, token: &Token) -> CompileError {
    CompileError::ParseError {
        msg: msg.to_owned(),
        line: token.line,
        column: token.column,
    }
}

fn parse_struct(
    tokens: &[Token],
    index: &mut usize,
    events: &mut Vec<StructEvent>,
) -> Result<(), CompileError> {
    let keyword = current_token(tokens, *index);
    if UNSUPPORTED_KEYWORDS.contains(&keyword.text.as_str()) {
        return Err(parse_error(
            &format!(
                "Unsupported construct {:?}: only struct declarations are supported",
                keyword.text
            ),
            keyword,
        ));
    }
    expect(tokens, index, &STRUCT_KEYWORD, "\"struct\"")?;

    let name_tok = current_token(tokens, *index);
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    expect(tokens, index, &LEFT_BRACE, "\"{\"")?;

    events.push(StructEvent::EnterStruct {
        name: name_tok.text.clone(),
        span: span_of(name_tok),
    });

    while !eat(tokens, index, &RIGHT_BRACE) {
        if EOF.is_match(&current_token(tokens, *index).text) {
            return Err(parse_error(
                &format!("Unterminated struct {:?}", name_tok.text),
                current_token(tokens, *index),
            ));
        }
        parse_member(tokens, index, events)?;
    }
    // Trailing `;` after the closing brace is conventional but optional.
    eat(tokens, index, &SEMICOLON);

    events.push(StructEvent::ExitStruct);
    Ok(())
}

fn parse_member(
    tokens: &[Token],
    index: &mut usize,
    events: &mut Vec<StructEvent>,
) -> Result<(), CompileError> {
    let first = current_token(tokens, *index);
    let span = span_of(first);
    let type_spec = parse_type_spec(tokens, index)?;

    let mut declarators = vec![parse_declarator(tokens, index)?];
    while eat(tokens, index, &COMMA) {
        declarators.push(parse_declarator(tokens, index)?);
    }
    expect(tokens, index, &SEMICOLON, "\";\"")?;

    events.push(StructEvent::Member {
        type_spec,
        declarators,
        span,
    });
    Ok(())
}

fn parse_type_spec(tokens: &[Token], index: &mut usize) -> Result<TypeSpec, CompileError> {
    let first = current_token(tokens, *index);
    let span = span_of(first);

    if first.text == "sequence" {
        *index += 1;
        expect(tokens, index, &LEFT_ANGLE, "\"<\"")?;
        let element = parse_type_spec(tokens, index)?;
        let bound = if eat(tokens, index, &COMMA) {
            Some(parse_uint(tokens, index)?)
        } else {
            None
        };
        expect(tokens, index, &RIGHT_ANGLE, "\">\"")?;
        return Ok(TypeSpec::Sequence {
            element: Box::new(element),
            bound,
            span,
        });
    }

    if UNSUPPORTED_KEYWORDS.contains(&first.text.as_str()) {
        return Err(parse_error(
            &format!("Unsupported construct {:?} in type specifier", first.text),
            first,
        ));
    }

    if BASE_KEYWORDS.contains(&first.text.as_str()) {
        *index += 1;
        if first.text == "string" {
            if LEFT_ANGLE.is_match(&current_token(tokens, *index).text) {
                return Err(parse_error("Bounded strings are not supported", first));
            }
            return Ok(TypeSpec::Basic {
                text: first.text.clone(),
                span,
            });
        }
        // Greedily extend multi-word base phrases: `unsigned short`,
        // `long long`, `unsigned long long`, `long double`, ...
        let mut phrase = first.text.clone();
        loop {
            let next = &current_token(tokens, *index).text;
            let continues = matches!(phrase.as_str(), "unsigned" | "long" | "unsigned long")
                && matches!(next.as_str(), "short" | "long" | "double" | "char");
            if !continues {
                break;
            }
            phrase.push(' ');
            phrase.push_str(next);
            *index += 1;
        }
        return Ok(TypeSpec::Basic { text: phrase, span });
    }

    // Anything else must be a (possibly ::-qualified) reference to another
    // declared struct.
    let name = parse_scoped_name(tokens, index)?;
    Ok(TypeSpec::Scoped { name, span })
}

fn parse_scoped_name(tokens: &[Token], index: &mut usize) -> Result<String, CompileError> {
    let mut name = String::new();
    if eat(tokens, index, &SCOPE) {
        name.push_str("::");
    }
    let first = current_token(tokens, *index);
    expect(tokens, index, &IDENTIFIER, "type name")?;
    name.push_str(&first.text);
    while eat(tokens, index, &SCOPE) {
        let part = current_token(tokens, *index);
        expect(tokens, index, &IDENTIFIER, "identifier after \"::\"")?;
        name.push_str("::");
        name.push_str(&part.text);
    }
    Ok(name)
}

fn parse_declarator(tokens: &[Token], index: &mut usize) -> Result<Declarator, CompileError> {
    let name_tok = current_token(tokens, *index);
    expect(tokens, index, &IDENTIFIER, "member name")?;
    let span = span_of(name_tok);

    let mut dims = Vec::new();
    while eat(tokens, index, &LEFT_BRACKET) {
        dims.push(parse_uint(tokens, index)?);
        expect(tokens, index, &RIGHT_BRACKET, "\"]\"")?;
    }

    Ok(Declarator {
        name: name_tok.text.clone(),
        dims,
        span,
    })
}

fn parse_uint(tokens: &[Token], index: &mut usize) -> Result<u64, CompileError> {
    let tok = current_token(tokens, *index);
    expect(tokens, index, &INTEGER, "integer")?;
    tok.text
        .parse::<u64>()
        .map_err(|_| parse_error(&format!("Invalid integer {:?}", tok.text), tok))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_idl;

    fn events(source: &str) -> Vec<StructEvent> {
        parse_events(&tokenize_idl(source).unwrap()).unwrap()
    }

    #[test]
    fn parses_struct_with_members() {
        let got = events("struct A { float x; boolean y; };");
        assert_eq!(got.len(), 4);
        assert!(matches!(&got[0], StructEvent::EnterStruct { name, .. } if name == "A"));
        assert!(matches!(&got[3], StructEvent::ExitStruct));
        match &got[1] {
            StructEvent::Member {
                type_spec: TypeSpec::Basic { text, .. },
                declarators,
                ..
            } => {
                assert_eq!(text, "float");
                assert_eq!(declarators[0].name, "x");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parses_declarator_list_and_dims() {
        let got = events("struct M { short a, b[3]; };");
        match &got[1] {
            StructEvent::Member { declarators, .. } => {
                assert_eq!(declarators.len(), 2);
                assert_eq!(declarators[0].name, "a");
                assert!(declarators[0].dims.is_empty());
                assert_eq!(declarators[1].name, "b");
                assert_eq!(declarators[1].dims, [3]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parses_multi_dimension_arrays() {
        let got = events("struct M { short grid[2][3]; };");
        match &got[1] {
            StructEvent::Member { declarators, .. } => {
                assert_eq!(declarators[0].dims, [2, 3]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parses_bounded_sequence() {
        let got = events("struct M { sequence<string, 4> tags; };");
        match &got[1] {
            StructEvent::Member {
                type_spec: TypeSpec::Sequence { element, bound, .. },
                ..
            } => {
                assert_eq!(*bound, Some(4));
                assert!(matches!(&**element, TypeSpec::Basic { text, .. } if text == "string"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parses_nested_sequence() {
        let got = events("struct M { sequence<sequence<long>> rows; };");
        match &got[1] {
            StructEvent::Member {
                type_spec: TypeSpec::Sequence { element, .. },
                ..
            } => assert!(matches!(&**element, TypeSpec::Sequence { .. })),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parses_scoped_reference() {
        let got = events("struct M { geo::Position p; };");
        match &got[1] {
            StructEvent::Member {
                type_spec: TypeSpec::Scoped { name, .. },
                ..
            } => assert_eq!(name, "geo::Position"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn multi_word_base_types_stay_one_phrase() {
        let got = events("struct M { unsigned long long big; };");
        match &got[1] {
            StructEvent::Member {
                type_spec: TypeSpec::Basic { text, .. },
                declarators,
                ..
            } => {
                assert_eq!(text, "unsigned long long");
                assert_eq!(declarators[0].name, "big");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn unsupported_construct_is_loud() {
        let tokens = tokenize_idl("enum Kind { A };").unwrap();
        let err = parse_events(&tokens).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ParseError { ref msg, .. } if msg.contains("enum")
        ));
    }

    #[test]
    fn bounded_string_is_rejected() {
        let tokens = tokenize_idl("struct M { string<8> s; };").unwrap();
        let err = parse_events(&tokens).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ParseError { ref msg, .. } if msg.contains("Bounded strings")
        ));
    }

    #[test]
    fn unterminated_struct_is_rejected() {
        let tokens = tokenize_idl("struct M { long x;").unwrap();
        assert!(parse_events(&tokens).is_err());
    }
}
