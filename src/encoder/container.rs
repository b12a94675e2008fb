//! Container encoding.

use crate::element::TaggedValue;
use crate::encoder::{encode_value, EncodeResult};
use crate::ion_type::IonType;
use crate::node::{Container, Node, StructField};
use crate::symbol::SymbolTable;

/// Encodes the children of a list or sexp in order.
#[inline]
pub fn sequence<V: TaggedValue>(ion_type: IonType, values: &[V], symbols: &mut SymbolTable) -> EncodeResult<Node> {
    debug_assert!(matches!(ion_type, IonType::List | IonType::Sexp));
    let mut children = Vec::new();
    children.try_reserve(values.len())?;
    for value in values {
        children.push(encode_value(value, symbols)?);
    }
    Ok(Container::new(ion_type, children).into())
}

/// Encodes struct fields in order, interning each field name before its value.
#[inline]
pub fn structure<V: TaggedValue>(fields: &[(String, V)], symbols: &mut SymbolTable) -> EncodeResult<Node> {
    let mut children = Vec::new();
    children.try_reserve(fields.len())?;
    for (name, value) in fields {
        let sid = symbols.intern(name);
        let value = encode_value(value, symbols)?;
        children.push(StructField::new(sid, value).into());
    }
    Ok(Container::new(IonType::Struct, children).into())
}
