//! Concrete syntax tree.

use crate::ion_type::IonType;
use crate::text::lexer::{Position, Token};
use std::fmt::Write;

/// A node of the lossless syntax tree.
///
/// Visiting the tokens of a forest depth-first yields every token of the input, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxTree<'a> {
    /// A value; leading [`SyntaxTree::Annotation`] children are its annotations.
    Value {
        ion_type: IonType,
        children: Vec<SyntaxTree<'a>>,
    },
    /// A struct field: a [`SyntaxTree::FieldName`] first and a [`SyntaxTree::Value`] last.
    Field { children: Vec<SyntaxTree<'a>> },
    FieldName(Token<'a>),
    Annotation(Token<'a>),
    /// Whitespace, comments, punctuation and value parts.
    Token(Token<'a>),
    SyntaxError {
        message: &'static str,
        children: Vec<SyntaxTree<'a>>,
    },
}

impl<'a> SyntaxTree<'a> {
    #[inline]
    pub(crate) fn value(ion_type: IonType, children: Vec<SyntaxTree<'a>>) -> Self {
        SyntaxTree::Value { ion_type, children }
    }

    #[inline]
    pub(crate) fn error(message: &'static str, children: Vec<SyntaxTree<'a>>) -> Self {
        SyntaxTree::SyntaxError { message, children }
    }

    #[inline]
    pub fn children(&self) -> &[SyntaxTree<'a>] {
        match self {
            SyntaxTree::Value { children, .. }
            | SyntaxTree::Field { children }
            | SyntaxTree::SyntaxError { children, .. } => children,
            SyntaxTree::FieldName(_) | SyntaxTree::Annotation(_) | SyntaxTree::Token(_) => &[],
        }
    }

    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, SyntaxTree::Value { .. })
    }

    #[inline]
    pub fn ion_type(&self) -> Option<IonType> {
        match self {
            SyntaxTree::Value { ion_type, .. } => Some(*ion_type),
            _ => None,
        }
    }

    /// All tokens under this node, depth-first.
    #[inline]
    pub fn tokens(&self) -> Tokens<'_, 'a> {
        Tokens {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    /// Position of the first token, if the node has any.
    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.tokens().next().map(|t| t.position)
    }

    /// Concatenated content of all tokens, which is the exact source text of the node.
    pub fn text(&self) -> String {
        self.tokens().map(|t| t.content).collect()
    }

    /// Annotation tokens of a value, in order.
    pub fn annotations(&self) -> impl Iterator<Item = &Token<'a>> {
        let children: &[SyntaxTree<'a>] = match self {
            SyntaxTree::Value { children, .. } => children,
            _ => &[],
        };
        children.iter().filter_map(|child| match child {
            SyntaxTree::Annotation(token) => Some(token),
            _ => None,
        })
    }

    /// Name token of a field.
    pub fn field_name(&self) -> Option<&Token<'a>> {
        match self {
            SyntaxTree::Field { children } => children.iter().find_map(|child| match child {
                SyntaxTree::FieldName(token) => Some(token),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Value node of a field.
    pub fn field_value(&self) -> Option<&SyntaxTree<'a>> {
        match self {
            SyntaxTree::Field { children } => children.last().filter(|child| child.is_value()),
            _ => None,
        }
    }

    /// Every syntax error node under this node, depth-first, outer errors first.
    pub fn syntax_errors(&self) -> Vec<&SyntaxTree<'a>> {
        let mut errors = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let SyntaxTree::SyntaxError { .. } = node {
                errors.push(node);
            }
            stack.extend(node.children().iter().rev());
        }
        errors
    }

    /// Renders the tree as an indented s-expression for debugging.
    pub fn to_sexp_string(&self) -> String {
        let mut buf = String::new();
        self.write_sexp(&mut buf, 0);
        buf
    }

    fn write_sexp(&self, buf: &mut String, depth: usize) {
        if depth > 0 {
            buf.push('\n');
            for _ in 0..depth {
                buf.push_str("  ");
            }
        }

        let (head, children) = match self {
            SyntaxTree::Value { ion_type, children } => (ion_type.name().to_string(), children),
            SyntaxTree::Field { children } => ("struct_field".to_string(), children),
            SyntaxTree::SyntaxError { message, children } => (format!("syntax_error {:?}", message), children),
            SyntaxTree::FieldName(token) => {
                let _ = write!(buf, "(field_name {:?})", token.content);
                return;
            }
            SyntaxTree::Annotation(token) => {
                let _ = write!(buf, "(annotation {:?})", token.content);
                return;
            }
            SyntaxTree::Token(token) => {
                let _ = write!(buf, "{:?}", token.content);
                return;
            }
        };

        buf.push('(');
        buf.push_str(&head);
        for child in children {
            child.write_sexp(buf, depth + 1);
        }
        buf.push(')');
    }
}

/// Depth-first iterator over the tokens of a syntax tree.
pub struct Tokens<'t, 'a> {
    stack: Vec<std::slice::Iter<'t, SyntaxTree<'a>>>,
}

impl<'t, 'a> Iterator for Tokens<'t, 'a> {
    type Item = &'t Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some(SyntaxTree::FieldName(token) | SyntaxTree::Annotation(token) | SyntaxTree::Token(token)) => {
                    return Some(token)
                }
                Some(node) => self.stack.push(node.children().iter()),
            }
        }
    }
}

/// Tokens of a whole forest, in order.
pub fn forest_tokens<'t, 'a>(forest: &'t [SyntaxTree<'a>]) -> impl Iterator<Item = &'t Token<'a>> {
    forest.iter().flat_map(SyntaxTree::tokens)
}
