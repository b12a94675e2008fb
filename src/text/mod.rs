//! Ion text: lexing, lossless syntax trees and conversion to values.

mod convert;
mod lexer;
mod parse;
mod tree;

pub use convert::{to_element, to_elements, to_single_element, ConvertError, ConvertErrorKind, ConvertResult};
pub use lexer::{tokenize, Lexer, Position, Token, TokenKind};
pub use parse::{
    build_forest, parse, TreeError, TreeResult, ANNOTATIONS_WITHOUT_VALUE, COMMA_MISSING, FIELD_NAME_WITHOUT_COLON,
    FIELD_WITHOUT_VALUE, NOT_VALID_ION, UNEXPECTED_DELIMITER, UNKNOWN_NULL_TYPE,
};
pub use tree::{forest_tokens, SyntaxTree, Tokens};

use crate::element::Element;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Possible errors that can arise during loading Ion text into values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TextError {
    TreeError(TreeError),
    ConvertError(ConvertError),
}

impl Display for TextError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::TreeError(e) => write!(f, "{}", e),
            TextError::ConvertError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for TextError {}

impl From<TreeError> for TextError {
    #[inline]
    fn from(e: TreeError) -> Self {
        TextError::TreeError(e)
    }
}

impl From<ConvertError> for TextError {
    #[inline]
    fn from(e: ConvertError) -> Self {
        TextError::ConvertError(e)
    }
}

pub type TextResult<T> = std::result::Result<T, TextError>;

/// Parses Ion text into its top-level values.
#[inline]
pub fn load(input: &str) -> TextResult<Vec<Element>> {
    let forest = parse(input)?;
    Ok(to_elements(&forest)?)
}

/// Parses Ion text that holds exactly one top-level value.
#[inline]
pub fn load_single(input: &str) -> TextResult<Element> {
    let forest = parse(input)?;
    Ok(to_single_element(&forest)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load() {
        let elements = load("a::1 // one\n[true, \"x\"]").unwrap();
        assert_eq!(
            elements,
            [
                Element::int(1).with_annotations(["a"]),
                Element::list([Element::bool(true), Element::string("x")]),
            ]
        );
        assert!(load("").unwrap().is_empty());

        let err = load("[1").unwrap_err();
        assert!(matches!(err, TextError::TreeError(TreeError::UnbalancedDelimiter { delimiter: '[', .. })));

        let err = load_single("1 2").unwrap_err();
        assert!(matches!(err, TextError::ConvertError(e) if e.kind() == &ConvertErrorKind::ExpectedSingleValue(2)));
    }
}
