//! Syntax tree to value tree.

use crate::element::Element;
use crate::int::Int;
use crate::ion_type::IonType;
use crate::text::lexer::{Position, Token, TokenKind};
use crate::text::tree::SyntaxTree;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// This type represents error that can arise during converting a syntax tree into values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConvertError {
    kind: ConvertErrorKind,
    position: Option<Position>,
}

impl ConvertError {
    #[inline]
    fn new(kind: ConvertErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }

    #[inline]
    pub fn kind(&self) -> &ConvertErrorKind {
        &self.kind
    }

    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl Display for ConvertError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} at {}", self.kind, position),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Error for ConvertError {}

/// Possible errors that can arise during converting a syntax tree into values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConvertErrorKind {
    UnsupportedType(IonType),
    NotAValue,
    ExpectedSingleValue(usize),
    InvalidInt,
    InvalidEscape,
    SyntaxError(&'static str),
}

impl Display for ConvertErrorKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertErrorKind::UnsupportedType(t) => write!(f, "converting {} values is not supported yet", t),
            ConvertErrorKind::NotAValue => write!(f, "syntax node is not a value"),
            ConvertErrorKind::ExpectedSingleValue(n) => write!(f, "expected a single value, found {}", n),
            ConvertErrorKind::InvalidInt => write!(f, "invalid integer literal"),
            ConvertErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
            ConvertErrorKind::SyntaxError(message) => write!(f, "syntax error: {}", message),
        }
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Converts a value node, failing on the first syntax error found inside it.
pub fn to_element(node: &SyntaxTree) -> ConvertResult<Element> {
    if let Some(error) = node.syntax_errors().first() {
        let message = match error {
            SyntaxTree::SyntaxError { message, .. } => *message,
            _ => "",
        };
        return Err(ConvertError::new(ConvertErrorKind::SyntaxError(message), error.position()));
    }
    convert_value(node)
}

/// Converts every top-level value of a forest.
pub fn to_elements(forest: &[SyntaxTree]) -> ConvertResult<Vec<Element>> {
    let mut elements = Vec::new();
    for node in forest {
        match node {
            SyntaxTree::Token(token) if token.is_trivia() => {}
            node => elements.push(to_element(node)?),
        }
    }
    Ok(elements)
}

/// Converts a forest that holds exactly one value, ignoring whitespace and comments.
pub fn to_single_element(forest: &[SyntaxTree]) -> ConvertResult<Element> {
    let mut elements = to_elements(forest)?;
    if elements.len() != 1 {
        let position = forest.first().and_then(SyntaxTree::position);
        return Err(ConvertError::new(
            ConvertErrorKind::ExpectedSingleValue(elements.len()),
            position,
        ));
    }
    Ok(elements.remove(0))
}

fn convert_value(node: &SyntaxTree) -> ConvertResult<Element> {
    let (ion_type, children) = match node {
        SyntaxTree::Value { ion_type, children } => (*ion_type, children),
        _ => return Err(ConvertError::new(ConvertErrorKind::NotAValue, node.position())),
    };

    let parts: Vec<&Token> = children
        .iter()
        .filter_map(|child| match child {
            SyntaxTree::Token(token) if token.kind == TokenKind::PartialValue => Some(token),
            _ => None,
        })
        .collect();
    let first = || {
        parts
            .first()
            .copied()
            .ok_or_else(|| ConvertError::new(ConvertErrorKind::NotAValue, node.position()))
    };

    let element = match ion_type {
        _ if parts.len() == 1 && (parts[0].content == "null" || parts[0].content.starts_with("null.")) => {
            Element::null_of(ion_type)
        }
        IonType::Bool => Element::bool(first()?.content == "true"),
        IonType::Int => {
            let token = first()?;
            let int = token
                .content
                .parse::<Int>()
                .map_err(|_| ConvertError::new(ConvertErrorKind::InvalidInt, Some(token.position)))?;
            Element::int(int)
        }
        IonType::String => {
            let mut s = String::new();
            for token in &parts {
                s.push_str(&quoted_text(token)?);
            }
            Element::string(s)
        }
        IonType::Symbol => Element::symbol(quoted_text(first()?)?),
        IonType::List => Element::list(convert_children(children)?),
        IonType::Sexp => Element::sexp(convert_children(children)?),
        IonType::Struct => {
            let mut fields = Vec::new();
            for child in children {
                if let (Some(name), Some(value)) = (child.field_name(), child.field_value()) {
                    fields.push((quoted_text(name)?, convert_value(value)?));
                }
            }
            Element::structure(fields)
        }
        t => return Err(ConvertError::new(ConvertErrorKind::UnsupportedType(t), node.position())),
    };

    let mut annotations = Vec::new();
    for token in node.annotations() {
        annotations.push(quoted_text(token)?);
    }
    Ok(element.with_annotations(annotations))
}

fn convert_children(children: &[SyntaxTree]) -> ConvertResult<Vec<Element>> {
    children.iter().filter(|child| child.is_value()).map(convert_value).collect()
}

/// Text of a string, symbol or field name token with quotes removed and escapes resolved.
fn quoted_text(token: &Token) -> ConvertResult<String> {
    let content = token.content;
    let inner = if let Some(inner) = strip_quotes(content, "'''") {
        inner
    } else if let Some(inner) = strip_quotes(content, "\"").or_else(|| strip_quotes(content, "'")) {
        inner
    } else {
        return Ok(content.to_string());
    };
    unescape(inner).ok_or_else(|| ConvertError::new(ConvertErrorKind::InvalidEscape, Some(token.position)))
}

#[inline]
fn strip_quotes<'a>(content: &'a str, quote: &str) -> Option<&'a str> {
    if content.len() >= 2 * quote.len() {
        content.strip_prefix(quote)?.strip_suffix(quote)
    } else {
        None
    }
}

fn hex_char(chars: &mut std::str::Chars, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}

/// Resolves backslash escapes; `None` on an unknown or truncated escape.
fn unescape(s: &str) -> Option<String> {
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            buf.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'v' => '\x0B',
            c @ ('\\' | '"' | '\'' | '/' | '?') => c,
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            '\n' => continue,
            '\r' => {
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('\n') {
                    chars = lookahead;
                }
                continue;
            }
            _ => return None,
        };
        buf.push(escaped);
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::parse::parse;

    fn convert(input: &str) -> ConvertResult<Element> {
        to_single_element(&parse(input).unwrap())
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb").as_deref(), Some("a\nb"));
        assert_eq!(unescape(r"\x41é\U0001F600").as_deref(), Some("Aé😀"));
        assert_eq!(unescape("a\\\nb").as_deref(), Some("ab"));
        assert_eq!(unescape(r"\q"), None);
        assert_eq!(unescape(r"\x4"), None);
    }

    #[test]
    fn test_string_and_bool() {
        assert_eq!(convert(r#""a\tb""#).unwrap(), Element::string("a\tb"));
        assert_eq!(convert("'''ab''' // c\n '''cd'''").unwrap(), Element::string("abcd"));
        assert_eq!(convert("true").unwrap(), Element::bool(true));
        assert_eq!(convert(" false ").unwrap(), Element::bool(false));
    }

    #[test]
    fn test_list() {
        let input = "[\n  \"a\", // first\n  \"b\",\n]";
        assert_eq!(
            convert(input).unwrap(),
            Element::list([Element::string("a"), Element::string("b")])
        );
    }

    #[test]
    fn test_other_types() {
        assert_eq!(convert("null.list").unwrap(), Element::null_of(IonType::List));
        assert_eq!(convert("-0x10").unwrap(), Element::int(-16));
        assert_eq!(convert("'a b'").unwrap(), Element::symbol("a b"));
        assert_eq!(
            convert("(+ 1 x)").unwrap(),
            Element::sexp([Element::symbol("+"), Element::int(1), Element::symbol("x")])
        );
        assert_eq!(
            convert("{a: 1, 'b': x::\"s\"}").unwrap(),
            Element::structure([("a", Element::int(1)), ("b", Element::string("s").with_annotations(["x"]))])
        );
        assert_eq!(
            convert("'n'::m::[]").unwrap(),
            Element::list([]).with_annotations(["n", "m"])
        );
    }

    #[test]
    fn test_errors() {
        let err = convert("1.5").unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::UnsupportedType(IonType::Decimal));
        assert_eq!(err.position(), Some(Position::START));

        let err = convert("{{aGk=}}").unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::UnsupportedType(IonType::Blob));

        let err = convert("1 2").unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::ExpectedSingleValue(2));

        let err = convert("[1 2]").unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::SyntaxError("Comma missing between values"));

        let err = convert("12a").unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::InvalidInt);

        let err = convert(r#""\q""#).unwrap_err();
        assert_eq!(err.kind(), &ConvertErrorKind::InvalidEscape);
    }
}
