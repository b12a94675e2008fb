//! Value to binary encoder.

mod container;
mod datagram;
mod scalar;

pub use datagram::{encode_datagram, DatagramBuilder};

use crate::element::{TaggedValue, ValueRef};
use crate::ion_type::IonType;
use crate::node::{AnnotatedValue, Node};
use crate::symbol::SymbolTable;
use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Possible errors that can arise during encoding.
#[derive(Debug)]
pub enum EncodeError {
    UnsupportedType(IonType),
    TryReserveError(TryReserveError),
}

impl Display for EncodeError {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EncodeError::UnsupportedType(t) => write!(f, "encoding {} values is not supported", t),
            EncodeError::TryReserveError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for EncodeError {}

impl From<TryReserveError> for EncodeError {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        EncodeError::TryReserveError(e)
    }
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Encodes one value into a binary node, interning every symbol it meets into `symbols`.
///
/// Symbols inside the value are interned before the value's own annotations.
pub fn encode_value<V: TaggedValue>(value: &V, symbols: &mut SymbolTable) -> EncodeResult<Node> {
    let ion_type = value.ion_type();
    let node = match value.value_ref() {
        ValueRef::Null => scalar::null(ion_type),
        ValueRef::Bool(b) => scalar::bool(b),
        ValueRef::Int(i) => scalar::int(i),
        ValueRef::String(s) => scalar::string(s),
        ValueRef::Symbol(s) => scalar::symbol(s, symbols),
        ValueRef::Clob(bytes) => scalar::lob(IonType::Clob, bytes),
        ValueRef::Blob(bytes) => scalar::lob(IonType::Blob, bytes),
        ValueRef::List(values) => container::sequence(IonType::List, values, symbols)?,
        ValueRef::Sexp(values) => container::sequence(IonType::Sexp, values, symbols)?,
        ValueRef::Struct(fields) => container::structure(fields, symbols)?,
        ValueRef::Float(_) | ValueRef::Decimal(_) | ValueRef::Timestamp(_) => {
            return Err(EncodeError::UnsupportedType(ion_type))
        }
    };

    let annotations = value.annotations();
    if annotations.is_empty() {
        return Ok(node);
    }

    let mut sids = Vec::new();
    sids.try_reserve(annotations.len())?;
    sids.extend(annotations.iter().map(|annotation| symbols.intern(annotation)));
    Ok(AnnotatedValue::new(sids, node).into())
}
