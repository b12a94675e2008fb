//! Ion value tree.
//!
//! [`TaggedValue`] is the capability the encoder consumes: a type tag, annotations and a
//! borrowed view of the payload. [`Element`] is the crate's own immutable implementation of it.

use crate::int::Int;
use crate::ion_type::IonType;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use decimal_rs::Decimal;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::mem;

/// A borrowed view of a value's payload.
#[derive(Debug, PartialEq)]
pub enum ValueRef<'a, V> {
    /// A null of the type reported by [`TaggedValue::ion_type`].
    Null,
    Bool(bool),
    Int(&'a Int),
    Float(f64),
    Decimal(&'a Decimal),
    Timestamp(&'a str),
    String(&'a str),
    Symbol(&'a str),
    Clob(&'a [u8]),
    Blob(&'a [u8]),
    List(&'a [V]),
    Sexp(&'a [V]),
    Struct(&'a [(String, V)]),
}

/// A value that carries its Ion type, its annotations and its payload.
pub trait TaggedValue: Sized {
    fn ion_type(&self) -> IonType;

    fn annotations(&self) -> &[String];

    fn value_ref(&self) -> ValueRef<'_, Self>;

    #[inline]
    fn is_null(&self) -> bool {
        matches!(self.value_ref(), ValueRef::Null)
    }
}

/// Payload of an [`Element`].
///
/// Equality is structural: struct fields compare as an unordered multiset and floats compare
/// by bit pattern, so `0e0 != -0e0` and `nan == nan`.
#[derive(Clone, Debug)]
pub enum Value {
    Null(IonType),
    Bool(bool),
    Int(Int),
    Float(f64),
    Decimal(Decimal),
    Timestamp(String),
    String(String),
    Symbol(String),
    Clob(Vec<u8>),
    Blob(Vec<u8>),
    List(Vec<Element>),
    Sexp(Vec<Element>),
    Struct(Vec<(String, Element)>),
}

impl Value {
    pub fn ion_type(&self) -> IonType {
        match self {
            Value::Null(t) => *t,
            Value::Bool(_) => IonType::Bool,
            Value::Int(_) => IonType::Int,
            Value::Float(_) => IonType::Float,
            Value::Decimal(_) => IonType::Decimal,
            Value::Timestamp(_) => IonType::Timestamp,
            Value::String(_) => IonType::String,
            Value::Symbol(_) => IonType::Symbol,
            Value::Clob(_) => IonType::Clob,
            Value::Blob(_) => IonType::Blob,
            Value::List(_) => IonType::List,
            Value::Sexp(_) => IonType::Sexp,
            Value::Struct(_) => IonType::Struct,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null(a), Value::Null(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b))
            | (Value::String(a), Value::String(b))
            | (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Clob(a), Value::Clob(b)) | (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Sexp(a), Value::Sexp(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => fields_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Null(t) => t.hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(v) => float_bits(*v).hash(state),
            Value::Decimal(d) => d.hash(state),
            Value::Timestamp(s) | Value::String(s) | Value::Symbol(s) => s.hash(state),
            Value::Clob(b) | Value::Blob(b) => b.hash(state),
            Value::List(values) | Value::Sexp(values) => values.hash(state),
            Value::Struct(fields) => {
                // field order must not change the hash
                let sum = fields.iter().fold(0u64, |sum, field| {
                    let mut hasher = DefaultHasher::new();
                    field.hash(&mut hasher);
                    sum.wrapping_add(hasher.finish())
                });
                fields.len().hash(state);
                sum.hash(state);
            }
        }
    }
}

/// Bit pattern of a float with every nan folded into one.
#[inline]
fn float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Compares struct fields as multisets of name/value pairs.
fn fields_eq(a: &[(String, Element)], b: &[(String, Element)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    for field in a {
        let found = b
            .iter()
            .enumerate()
            .position(|(i, other)| !matched[i] && other == field);
        match found {
            Some(i) => matched[i] = true,
            None => return false,
        }
    }
    true
}

/// An immutable Ion value together with its annotations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    annotations: Vec<String>,
    value: Value,
}

impl Element {
    #[inline]
    pub fn new(value: Value) -> Self {
        Self {
            annotations: Vec::new(),
            value,
        }
    }

    /// Replaces the annotations of this element.
    #[inline]
    pub fn with_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn null() -> Self {
        Self::new(Value::Null(IonType::Null))
    }

    #[inline]
    pub fn null_of(ion_type: IonType) -> Self {
        Self::new(Value::Null(ion_type))
    }

    #[inline]
    pub fn bool(value: bool) -> Self {
        Self::new(Value::Bool(value))
    }

    #[inline]
    pub fn int<T: Into<Int>>(value: T) -> Self {
        Self::new(Value::Int(value.into()))
    }

    #[inline]
    pub fn float(value: f64) -> Self {
        Self::new(Value::Float(value))
    }

    #[inline]
    pub fn decimal(value: Decimal) -> Self {
        Self::new(Value::Decimal(value))
    }

    #[inline]
    pub fn timestamp<S: Into<String>>(value: S) -> Self {
        Self::new(Value::Timestamp(value.into()))
    }

    #[inline]
    pub fn string<S: Into<String>>(value: S) -> Self {
        Self::new(Value::String(value.into()))
    }

    #[inline]
    pub fn symbol<S: Into<String>>(value: S) -> Self {
        Self::new(Value::Symbol(value.into()))
    }

    #[inline]
    pub fn clob<B: Into<Vec<u8>>>(value: B) -> Self {
        Self::new(Value::Clob(value.into()))
    }

    #[inline]
    pub fn blob<B: Into<Vec<u8>>>(value: B) -> Self {
        Self::new(Value::Blob(value.into()))
    }

    #[inline]
    pub fn list<I: IntoIterator<Item = Element>>(values: I) -> Self {
        Self::new(Value::List(values.into_iter().collect()))
    }

    #[inline]
    pub fn sexp<I: IntoIterator<Item = Element>>(values: I) -> Self {
        Self::new(Value::Sexp(values.into_iter().collect()))
    }

    #[inline]
    pub fn structure<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Element)>,
        K: Into<String>,
    {
        Self::new(Value::Struct(
            fields.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        ))
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<&Int> {
        match &self.value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the children of a list or sexp.
    #[inline]
    pub fn as_sequence(&self) -> Option<&[Element]> {
        match &self.value {
            Value::List(values) | Value::Sexp(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the value of the first field named `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Element> {
        match &self.value {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<Value> for Element {
    #[inline]
    fn from(value: Value) -> Self {
        Element::new(value)
    }
}

impl TaggedValue for Element {
    #[inline]
    fn ion_type(&self) -> IonType {
        self.value.ion_type()
    }

    #[inline]
    fn annotations(&self) -> &[String] {
        &self.annotations
    }

    fn value_ref(&self) -> ValueRef<'_, Self> {
        match &self.value {
            Value::Null(_) => ValueRef::Null,
            Value::Bool(b) => ValueRef::Bool(*b),
            Value::Int(i) => ValueRef::Int(i),
            Value::Float(f) => ValueRef::Float(*f),
            Value::Decimal(d) => ValueRef::Decimal(d),
            Value::Timestamp(t) => ValueRef::Timestamp(t),
            Value::String(s) => ValueRef::String(s),
            Value::Symbol(s) => ValueRef::Symbol(s),
            Value::Clob(b) => ValueRef::Clob(b),
            Value::Blob(b) => ValueRef::Blob(b),
            Value::List(values) => ValueRef::List(values),
            Value::Sexp(values) => ValueRef::Sexp(values),
            Value::Struct(fields) => ValueRef::Struct(fields),
        }
    }
}

const KEYWORDS: [&str; 4] = ["null", "true", "false", "nan"];

#[inline]
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') && !KEYWORDS.contains(&s)
}

fn write_escaped(f: &mut Formatter, s: &str, quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c if c.is_control() && (c as u32) < 0x100 => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn write_symbol(f: &mut Formatter, s: &str) -> fmt::Result {
    if is_identifier(s) {
        f.write_str(s)
    } else {
        write_escaped(f, s, '\'')
    }
}

fn write_float(f: &mut Formatter, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("nan")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "+inf" } else { "-inf" })
    } else {
        write!(f, "{:e}", value)
    }
}

fn write_decimal(f: &mut Formatter, value: &Decimal) -> fmt::Result {
    let text = value.to_string();
    if text.contains(['e', 'E']) {
        f.write_str(&text.replace(['e', 'E'], "d"))
    } else if text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{}d0", text)
    }
}

fn write_clob(f: &mut Formatter, bytes: &[u8]) -> fmt::Result {
    f.write_str("{{\"")?;
    for &b in bytes {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            0x20..=0x7E => f.write_char(b as char)?,
            _ => write!(f, "\\x{:02x}", b)?,
        }
    }
    f.write_str("\"}}")
}

fn write_sequence(f: &mut Formatter, values: &[Element], open: &str, separator: &str, close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str(close)
}

impl Display for Element {
    /// Writes the element as compact Ion text.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write_symbol(f, annotation)?;
            f.write_str("::")?;
        }

        match &self.value {
            Value::Null(IonType::Null) => f.write_str("null"),
            Value::Null(t) => write!(f, "null.{}", t),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write_float(f, *v),
            Value::Decimal(d) => write_decimal(f, d),
            Value::Timestamp(t) => f.write_str(t),
            Value::String(s) => write_escaped(f, s, '"'),
            Value::Symbol(s) => write_symbol(f, s),
            Value::Clob(bytes) => write_clob(f, bytes),
            Value::Blob(bytes) => write!(f, "{{{{{}}}}}", STANDARD.encode(bytes)),
            Value::List(values) => write_sequence(f, values, "[", ", ", "]"),
            Value::Sexp(values) => write_sequence(f, values, "(", " ", ")"),
            Value::Struct(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_symbol(f, name)?;
                    write!(f, ": {}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_builders() {
        let element = Element::structure([
            ("name", Element::string("ion")),
            ("tags", Element::list([Element::symbol("a"), Element::symbol("b")])),
        ]);
        assert_eq!(element.ion_type(), IonType::Struct);
        assert_eq!(element.get("name").and_then(Element::as_str), Some("ion"));
        assert_eq!(element.get("tags").and_then(Element::as_sequence).map(<[_]>::len), Some(2));
        assert!(element.get("missing").is_none());

        let null = Element::null_of(IonType::Int);
        assert!(null.is_null());
        assert_eq!(null.ion_type(), IonType::Int);
        assert!(!Element::bool(false).is_null());
    }

    #[test]
    fn test_display() {
        fn assert_display(element: Element, expected: &str) {
            assert_eq!(element.to_string(), expected);
        }

        assert_display(Element::null(), "null");
        assert_display(Element::null_of(IonType::Struct), "null.struct");
        assert_display(Element::bool(true), "true");
        assert_display(Element::int(-12), "-12");
        assert_display(Element::float(1.5), "1.5e0");
        assert_display(Element::float(f64::NEG_INFINITY), "-inf");
        assert_display(Element::decimal(Decimal::from_str("1.25").unwrap()), "1.25");
        assert_display(Element::decimal(Decimal::from_str("7").unwrap()), "7d0");
        assert_display(Element::timestamp("2007-02-23T12:14Z"), "2007-02-23T12:14Z");
        assert_display(Element::string("a\"b\n"), r#""a\"b\n""#);
        assert_display(Element::symbol("abc"), "abc");
        assert_display(Element::symbol("null"), "'null'");
        assert_display(Element::symbol("a b"), "'a b'");
        assert_display(Element::clob(b"hi\x00".to_vec()), r#"{{"hi\x00"}}"#);
        assert_display(Element::blob(b"hello".to_vec()), "{{aGVsbG8=}}");
        assert_display(
            Element::list([Element::int(1), Element::sexp([Element::symbol("+"), Element::int(2)])]),
            "[1, ('+' 2)]",
        );
        assert_display(
            Element::structure([("a", Element::int(1)), ("b c", Element::null())]).with_annotations(["x", "y"]),
            "x::y::{a: 1, 'b c': null}",
        );
    }

    fn hash_of(element: &Element) -> u64 {
        let mut hasher = DefaultHasher::new();
        element.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_struct_eq() {
        let a = Element::structure([("a", Element::int(1)), ("b", Element::int(2)), ("a", Element::int(3))]);
        let b = Element::structure([("a", Element::int(3)), ("b", Element::int(2)), ("a", Element::int(1))]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // duplicates count
        let c = Element::structure([("a", Element::int(1)), ("a", Element::int(1)), ("b", Element::int(2))]);
        assert_ne!(a, c);
        assert_ne!(
            Element::structure([("a", Element::int(1)), ("a", Element::int(1))]),
            Element::structure([("a", Element::int(1)), ("a", Element::int(2))])
        );

        // sequences keep their order
        assert_ne!(
            Element::list([Element::int(1), Element::int(2)]),
            Element::list([Element::int(2), Element::int(1)])
        );
        assert_ne!(Element::list([]), Element::sexp([]));

        // annotations keep their order
        assert_ne!(
            Element::bool(true).with_annotations(["x", "y"]),
            Element::bool(true).with_annotations(["y", "x"])
        );
    }

    #[test]
    fn test_float_eq() {
        assert_eq!(Element::float(f64::NAN), Element::float(f64::NAN));
        assert_eq!(hash_of(&Element::float(f64::NAN)), hash_of(&Element::float(-f64::NAN)));
        assert_ne!(Element::float(0.0), Element::float(-0.0));
        assert_eq!(Element::float(1.5), Element::float(1.5));
        assert_ne!(Element::float(1.0), Element::int(1));
    }

    #[test]
    fn test_hash_set() {
        let mut set = std::collections::HashSet::new();
        set.insert(Element::structure([("x", Element::string("1")), ("y", Element::null())]));
        assert!(set.contains(&Element::structure([("y", Element::null()), ("x", Element::string("1"))])));
        assert!(!set.contains(&Element::structure([("x", Element::string("1"))])));
        assert!(!set.contains(&Element::null_of(IonType::Struct)));
    }
}
