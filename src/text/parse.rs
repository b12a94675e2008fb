//! Concrete syntax tree builder.
//!
//! The builder never drops or reorders tokens. Malformed input becomes
//! [`SyntaxTree::SyntaxError`] nodes inside the tree; only a container without its closing
//! delimiter aborts the build.

use crate::ion_type::IonType;
use crate::text::lexer::{tokenize, Position, Token, TokenKind};
use crate::text::tree::SyntaxTree;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::{debug, trace};

pub const COMMA_MISSING: &str = "Comma missing between values";
pub const FIELD_NAME_WITHOUT_COLON: &str = "Field name not followed by ':'";
pub const FIELD_WITHOUT_VALUE: &str = "Field missing a value";
pub const UNEXPECTED_DELIMITER: &str = "Unexpected delimiter";
pub const NOT_VALID_ION: &str = "Not valid Ion";
pub const ANNOTATIONS_WITHOUT_VALUE: &str = "Annotations followed by a non-value";
pub const UNKNOWN_NULL_TYPE: &str = "Unknown null type";

/// Possible errors that can arise during building a syntax tree.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TreeError {
    /// No closing delimiter matches the opening one at `position`.
    UnbalancedDelimiter { delimiter: char, position: Position },
}

impl Display for TreeError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::UnbalancedDelimiter { delimiter, position } => {
                write!(f, "unbalanced delimiter '{}' at {}", delimiter, position)
            }
        }
    }
}

impl Error for TreeError {}

pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Lexes and builds the syntax forest of `input`.
#[inline]
pub fn parse(input: &str) -> TreeResult<Vec<SyntaxTree<'_>>> {
    build_forest(&tokenize(input))
}

/// Builds the syntax forest of a token sequence.
pub fn build_forest<'a>(tokens: &[Token<'a>]) -> TreeResult<Vec<SyntaxTree<'a>>> {
    let mut forest = Vec::new();
    let mut index = 0;
    while index < tokens.len() {
        let prefix_len = annotation_prefix_len(tokens, index);
        let annotations = &tokens[index..index + prefix_len];

        let node = if index + prefix_len < tokens.len() {
            let node = build_node(tokens, index + prefix_len)?;
            attach_annotations(annotations, node)
        } else {
            attach_annotations(annotations, SyntaxTree::error(ANNOTATIONS_WITHOUT_VALUE, Vec::new()))
        };

        let count = node.token_count();
        debug_assert!(count > 0);
        trace!(index, count, ion_type = ?node.ion_type(), "built syntax node");
        forest.push(node);
        index += count;
    }
    Ok(forest)
}

#[inline]
fn skip_trivia(tokens: &[Token], mut index: usize) -> usize {
    while index < tokens.len() && tokens[index].is_trivia() {
        index += 1;
    }
    index
}

/// A token that may be an annotation: a bare or single-quoted symbol.
#[inline]
fn is_annotation_candidate(token: &Token) -> bool {
    if !token.is_partial_value() || token.is_long_string() {
        return false;
    }
    match token.content.as_bytes()[0] {
        b'\'' => true,
        b => b.is_ascii_alphabetic() || b == b'_' || b == b'$',
    }
}

/// Number of tokens in the annotation prefix starting at `start`.
///
/// A candidate symbol belongs to the prefix only when the next non-trivia token is `::`.
/// Trivia after the last `::` is part of the prefix.
fn annotation_prefix_len(tokens: &[Token], start: usize) -> usize {
    let mut end = start;
    while end < tokens.len() && is_annotation_candidate(&tokens[end]) {
        let next = skip_trivia(tokens, end + 1);
        if next < tokens.len() && tokens[next].is_delimiter("::") {
            end = skip_trivia(tokens, next + 1);
        } else {
            break;
        }
    }
    end - start
}

fn attach_annotations<'a>(annotations: &[Token<'a>], node: SyntaxTree<'a>) -> SyntaxTree<'a> {
    if annotations.is_empty() {
        return node;
    }

    let mut children: Vec<SyntaxTree<'a>> = annotations
        .iter()
        .map(|token| {
            if token.is_partial_value() {
                SyntaxTree::Annotation(*token)
            } else {
                SyntaxTree::Token(*token)
            }
        })
        .collect();

    match node {
        SyntaxTree::Value {
            ion_type,
            children: value_children,
        } => {
            children.extend(value_children);
            SyntaxTree::value(ion_type, children)
        }
        SyntaxTree::SyntaxError { message, children: error_children } if error_children.is_empty() => {
            debug!(position = ?annotations[0].position, "{}", message);
            SyntaxTree::error(message, children)
        }
        node => {
            debug!(position = ?annotations[0].position, "{}", ANNOTATIONS_WITHOUT_VALUE);
            children.push(node);
            SyntaxTree::error(ANNOTATIONS_WITHOUT_VALUE, children)
        }
    }
}

#[inline]
fn leaf_error<'a>(message: &'static str, token: Token<'a>) -> SyntaxTree<'a> {
    debug!(position = ?token.position, content = token.content, "{}", message);
    SyntaxTree::error(message, vec![SyntaxTree::Token(token)])
}

#[inline]
fn leaf_value(ion_type: IonType, token: Token) -> SyntaxTree {
    SyntaxTree::value(ion_type, vec![SyntaxTree::Token(token)])
}

/// Builds the node that starts at `index`.
fn build_node<'a>(tokens: &[Token<'a>], index: usize) -> TreeResult<SyntaxTree<'a>> {
    let token = tokens[index];
    match token.kind {
        TokenKind::Whitespace | TokenKind::Comment => return Ok(SyntaxTree::Token(token)),
        TokenKind::NotIon => return Ok(leaf_error(NOT_VALID_ION, token)),
        TokenKind::Delimiter | TokenKind::PartialValue => {}
    }

    let content = token.content;
    let bytes = content.as_bytes();
    let node = match content {
        "[" => build_list(&tokens[index..=balanced_end(tokens, index)?])?,
        "(" => build_sexp(&tokens[index..=balanced_end(tokens, index)?])?,
        "{" => build_struct(&tokens[index..=balanced_end(tokens, index)?])?,
        "{{" => build_lob(tokens, index),
        "true" | "false" => leaf_value(IonType::Bool, token),
        _ if token.kind == TokenKind::Delimiter => leaf_error(UNEXPECTED_DELIMITER, token),
        _ if token.is_long_string() => build_long_string(tokens, index),
        _ if bytes[0] == b'"' => leaf_value(IonType::String, token),
        _ if bytes[0] == b'\'' => leaf_value(IonType::Symbol, token),
        _ if is_numeric(bytes) => leaf_value(classify_number(content), token),
        _ if content == "null" || content.starts_with("null.") => build_null(token),
        _ if bytes[0].is_ascii_alphabetic() || bytes[0] == b'_' || bytes[0] == b'$' => {
            leaf_value(IonType::Symbol, token)
        }
        _ if b"!#%&*+-./;<=>?@^`|~".contains(&bytes[0]) => leaf_value(IonType::Symbol, token),
        _ => leaf_error(NOT_VALID_ION, token),
    };
    Ok(node)
}

#[inline]
fn is_numeric(bytes: &[u8]) -> bool {
    match bytes {
        [b'-', second, ..] => second.is_ascii_digit(),
        [first, ..] => first.is_ascii_digit(),
        [] => false,
    }
}

/// Sub-classifies a numeric literal. The checks run in order and ignore case.
fn classify_number(content: &str) -> IonType {
    let bytes = content.as_bytes();
    let has = |c: u8| bytes.iter().any(|b| b.to_ascii_lowercase() == c);

    let date_shaped = bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-';
    if has(b':') || date_shaped || bytes.last() == Some(&b'T') {
        IonType::Timestamp
    } else if has(b'x') || has(b'b') {
        IonType::Int
    } else if has(b'd') {
        IonType::Decimal
    } else if has(b'e') {
        IonType::Float
    } else if has(b'.') {
        IonType::Decimal
    } else {
        IonType::Int
    }
}

fn build_null(token: Token) -> SyntaxTree {
    let type_name = content_after_dot(token.content);
    match IonType::from_name(type_name) {
        Ok(ion_type) => leaf_value(ion_type, token),
        Err(_) => leaf_error(UNKNOWN_NULL_TYPE, token),
    }
}

#[inline]
fn content_after_dot(content: &str) -> &str {
    content.rsplit('.').next().unwrap_or(content)
}

#[inline]
fn is_open(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && matches!(token.content, "[" | "(" | "{")
}

#[inline]
fn is_close(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && matches!(token.content, "]" | ")" | "}")
}

/// Index of the delimiter closing the one at `start`.
///
/// Every bracket kind moves the same depth counter, so mismatched kinds are not detected.
fn balanced_end(tokens: &[Token], start: usize) -> TreeResult<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        if is_open(token) {
            depth += 1;
        } else if is_close(token) {
            depth -= 1;
            if depth == 0 {
                return Ok(index);
            }
        }
    }

    let open = tokens[start];
    debug!(position = ?open.position, delimiter = open.content, "unbalanced delimiter");
    Err(TreeError::UnbalancedDelimiter {
        delimiter: open.content.chars().next().unwrap_or('?'),
        position: open.position,
    })
}

enum Split<'t, 'a> {
    Group(&'t [Token<'a>]),
    Comma(Token<'a>),
}

/// Splits the interior of a container on commas outside nested containers.
fn split_on_commas<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<Split<'t, 'a>> {
    let mut splits = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if is_open(token) {
            depth += 1;
        } else if is_close(token) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_delimiter(",") {
            splits.push(Split::Group(&tokens[start..index]));
            splits.push(Split::Comma(*token));
            start = index + 1;
        }
    }
    splits.push(Split::Group(&tokens[start..]));
    splits
}

/// Wraps each value of a comma group in a syntax error once the group already holds a value.
fn push_group<'a, I>(children: &mut Vec<SyntaxTree<'a>>, group: I, mut seen_value: bool)
where
    I: IntoIterator<Item = SyntaxTree<'a>>,
{
    for node in group {
        if !node.is_value() {
            children.push(node);
        } else if seen_value {
            debug!(position = ?node.position(), "{}", COMMA_MISSING);
            children.push(SyntaxTree::error(COMMA_MISSING, vec![node]));
        } else {
            seen_value = true;
            children.push(node);
        }
    }
}

/// `tokens` starts with `[` and ends with the matching `]`.
fn build_list<'a>(tokens: &[Token<'a>]) -> TreeResult<SyntaxTree<'a>> {
    let (open, interior, close) = split_brackets(tokens);
    let mut children = vec![SyntaxTree::Token(open)];
    for split in split_on_commas(interior) {
        match split {
            Split::Comma(token) => children.push(SyntaxTree::Token(token)),
            Split::Group(group) => push_group(&mut children, build_forest(group)?, false),
        }
    }
    children.push(SyntaxTree::Token(close));
    Ok(SyntaxTree::value(IonType::List, children))
}

fn build_sexp<'a>(tokens: &[Token<'a>]) -> TreeResult<SyntaxTree<'a>> {
    let (open, interior, close) = split_brackets(tokens);
    let mut children = vec![SyntaxTree::Token(open)];
    children.extend(build_forest(interior)?);
    children.push(SyntaxTree::Token(close));
    Ok(SyntaxTree::value(IonType::Sexp, children))
}

fn build_struct<'a>(tokens: &[Token<'a>]) -> TreeResult<SyntaxTree<'a>> {
    let (open, interior, close) = split_brackets(tokens);
    let mut children = vec![SyntaxTree::Token(open)];
    for split in split_on_commas(interior) {
        match split {
            Split::Comma(token) => children.push(SyntaxTree::Token(token)),
            Split::Group(group) => build_fields(&mut children, group)?,
        }
    }
    children.push(SyntaxTree::Token(close));
    Ok(SyntaxTree::value(IonType::Struct, children))
}

/// Builds one comma group of a struct: stray tokens, then `name : value`, then the rest.
fn build_fields<'a>(children: &mut Vec<SyntaxTree<'a>>, group: &[Token<'a>]) -> TreeResult<()> {
    let name_index = match group.iter().position(Token::is_partial_value) {
        Some(index) => index,
        None => {
            children.extend(group.iter().map(|token| SyntaxTree::Token(*token)));
            return Ok(());
        }
    };
    children.extend(group[..name_index].iter().map(|token| SyntaxTree::Token(*token)));

    let name = group[name_index];
    let mut field = vec![SyntaxTree::FieldName(name)];
    let colon_index = skip_trivia(group, name_index + 1);
    field.extend(group[name_index + 1..colon_index].iter().map(|token| SyntaxTree::Token(*token)));

    if colon_index >= group.len() || !group[colon_index].is_delimiter(":") {
        debug!(position = ?name.position, "{}", FIELD_NAME_WITHOUT_COLON);
        children.push(SyntaxTree::error(FIELD_NAME_WITHOUT_COLON, field));
        children.extend(build_forest(&group[colon_index..])?);
        return Ok(());
    }
    field.push(SyntaxTree::Token(group[colon_index]));

    let mut remainder = build_forest(&group[colon_index + 1..])?.into_iter();
    while let Some(node) = remainder.next() {
        let is_value = node.is_value();
        field.push(node);
        if is_value {
            children.push(SyntaxTree::Field { children: field });
            push_group(children, remainder.by_ref(), true);
            return Ok(());
        }
    }

    debug!(position = ?name.position, "{}", FIELD_WITHOUT_VALUE);
    children.push(SyntaxTree::error(FIELD_WITHOUT_VALUE, field));
    Ok(())
}

#[inline]
fn split_brackets<'t, 'a>(tokens: &'t [Token<'a>]) -> (Token<'a>, &'t [Token<'a>], Token<'a>) {
    debug_assert!(tokens.len() >= 2);
    (tokens[0], &tokens[1..tokens.len() - 1], tokens[tokens.len() - 1])
}

/// Builds `{{ ... }}`, running to the end of input when `}}` is missing.
///
/// A lob is a clob when its parts are all long strings or a single quoted string.
fn build_lob<'a>(tokens: &[Token<'a>], start: usize) -> SyntaxTree<'a> {
    let end = tokens[start + 1..]
        .iter()
        .position(|token| token.is_delimiter("}}"))
        .map_or(tokens.len(), |i| start + 1 + i + 1);
    let contents = &tokens[start..end];

    let parts: Vec<&Token> = contents.iter().filter(|token| token.is_partial_value()).collect();
    let is_clob = (!parts.is_empty() && parts.iter().all(|token| token.is_long_string()))
        || (parts.len() == 1 && parts[0].content.starts_with('"'));
    let ion_type = if is_clob { IonType::Clob } else { IonType::Blob };

    SyntaxTree::value(ion_type, contents.iter().map(|token| SyntaxTree::Token(*token)).collect())
}

/// Groups consecutive long string segments separated only by trivia into one string.
fn build_long_string<'a>(tokens: &[Token<'a>], start: usize) -> SyntaxTree<'a> {
    let mut end = start + 1;
    let mut index = start + 1;
    while index < tokens.len() && (tokens[index].is_trivia() || tokens[index].is_long_string()) {
        index += 1;
        if tokens[index - 1].is_long_string() {
            end = index;
        }
    }
    SyntaxTree::value(
        IonType::String,
        tokens[start..end].iter().map(|token| SyntaxTree::Token(*token)).collect(),
    )
}
