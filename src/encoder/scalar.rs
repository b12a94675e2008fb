//! Scalar encoding.

use crate::binary::NEG_INT_CODE;
use crate::int::Int;
use crate::ion_type::IonType;
use crate::node::{Container, Node, Scalar};
use crate::symbol::SymbolTable;

/// Encodes a null of the given type, `0xNF`.
#[inline]
pub fn null(ion_type: IonType) -> Node {
    if ion_type.is_container() {
        Container::null(ion_type).into()
    } else {
        Scalar::null(ion_type.type_code()).into()
    }
}

/// Encodes a bool, `0x11` or `0x10`.
#[inline]
pub fn bool(value: bool) -> Node {
    Scalar::with_nibble(IonType::Bool.type_code(), value as u8).into()
}

/// Encodes an int as its magnitude, the sign selecting type code 2 or 3.
#[inline]
pub fn int(value: &Int) -> Node {
    let type_code = if value.is_negative() {
        NEG_INT_CODE
    } else {
        IonType::Int.type_code()
    };
    Scalar::new(type_code, value.magnitude().to_vec()).into()
}

/// Encodes the UTF-8 bytes of a string.
#[inline]
pub fn string(value: &str) -> Node {
    Scalar::new(IonType::String.type_code(), value.as_bytes().to_vec()).into()
}

/// Interns `text` and encodes the minimal big-endian bytes of its symbol id.
#[inline]
pub fn symbol(text: &str, symbols: &mut SymbolTable) -> Node {
    let sid = symbols.intern(text).value();
    let bytes = sid.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    Scalar::new(IonType::Symbol.type_code(), bytes[start..].to_vec()).into()
}

/// Encodes the raw bytes of a clob or blob.
#[inline]
pub fn lob(ion_type: IonType, value: &[u8]) -> Node {
    debug_assert!(matches!(ion_type, IonType::Clob | IonType::Blob));
    Scalar::new(ion_type.type_code(), value.to_vec()).into()
}
