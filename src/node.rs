//! Binary node model.
//!
//! Every node knows its exact encoded size up front and appends exactly that many bytes
//! when serialized. Nodes are built bottom-up and never mutated afterwards, so container
//! and annotation wrapper sizes are computed once, at construction.

use crate::binary::{type_descriptor, ANNOTATION_CODE, IVM, IVM_SIZE, NULL_LENGTH, TYPE_DESCRIPTOR_SIZE};
use crate::ion_type::IonType;
use crate::varint::VarUInt;
use crate::vec::{length_header, VecExt};
use std::collections::TryReserveError;

#[inline]
fn length_size(length: Option<VarUInt>) -> usize {
    length.map_or(0, VarUInt::size)
}

/// A binary-serializable node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Container(Container),
    Field(StructField),
    Annotated(AnnotatedValue),
}

impl Node {
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Node::Scalar(scalar) => scalar.size(),
            Node::Container(container) => container.size(),
            Node::Field(field) => field.size(),
            Node::Annotated(annotated) => annotated.size(),
        }
    }

    /// Appends exactly `self.size()` bytes to `bytes`.
    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        match self {
            Node::Scalar(scalar) => scalar.serialize(bytes),
            Node::Container(container) => container.serialize(bytes),
            Node::Field(field) => field.serialize(bytes),
            Node::Annotated(annotated) => annotated.serialize(bytes),
        }
    }

    /// Serializes the node into a freshly allocated buffer of exactly `self.size()` bytes.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>, TryReserveError> {
        let size = self.size();
        let mut bytes = Vec::try_with_capacity(size)?;
        self.serialize(&mut bytes);
        debug_assert_eq!(bytes.len(), size);
        Ok(bytes)
    }
}

impl From<Scalar> for Node {
    #[inline]
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Container> for Node {
    #[inline]
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

impl From<StructField> for Node {
    #[inline]
    fn from(field: StructField) -> Self {
        Node::Field(field)
    }
}

impl From<AnnotatedValue> for Node {
    #[inline]
    fn from(annotated: AnnotatedValue) -> Self {
        Node::Annotated(annotated)
    }
}

/// Type descriptor, optional explicit length and raw payload bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar {
    descriptor: u8,
    length: Option<VarUInt>,
    payload: Vec<u8>,
}

impl Scalar {
    /// Creates a scalar of the given type code, applying the length threshold rule to `payload`.
    #[inline]
    pub fn new(type_code: u8, payload: Vec<u8>) -> Self {
        let (descriptor, length) = length_header(type_code, payload.len());
        Self {
            descriptor,
            length,
            payload,
        }
    }

    /// Creates a payload-less scalar whose low nibble is `nibble`, like `0x11` for `true`.
    #[inline]
    pub fn with_nibble(type_code: u8, nibble: u8) -> Self {
        Self {
            descriptor: type_descriptor(type_code, nibble),
            length: None,
            payload: Vec::new(),
        }
    }

    #[inline]
    pub fn null(type_code: u8) -> Self {
        Self::with_nibble(type_code, NULL_LENGTH)
    }

    #[inline]
    pub const fn descriptor(&self) -> u8 {
        self.descriptor
    }

    #[inline]
    pub const fn length(&self) -> Option<VarUInt> {
        self.length
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn size(&self) -> usize {
        TYPE_DESCRIPTOR_SIZE + length_size(self.length) + self.payload.len()
    }

    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        bytes.push_u8(self.descriptor);
        bytes.push_optional_length(self.length);
        bytes.push_bytes(&self.payload);
    }
}

/// A list, sexp or struct: type descriptor, optional explicit length and child nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    ion_type: IonType,
    descriptor: u8,
    length: Option<VarUInt>,
    children: Vec<Node>,
    size: usize,
}

impl Container {
    /// Creates a container of a list, sexp or struct type; struct children are expected to be
    /// [`Node::Field`]s.
    #[inline]
    pub fn new(ion_type: IonType, children: Vec<Node>) -> Self {
        debug_assert!(ion_type.is_container());
        let content_size: usize = children.iter().map(Node::size).sum();
        let (descriptor, length) = length_header(ion_type.type_code(), content_size);
        Self {
            ion_type,
            descriptor,
            length,
            children,
            size: TYPE_DESCRIPTOR_SIZE + length_size(length) + content_size,
        }
    }

    #[inline]
    pub fn null(ion_type: IonType) -> Self {
        debug_assert!(ion_type.is_container());
        Self {
            ion_type,
            descriptor: type_descriptor(ion_type.type_code(), NULL_LENGTH),
            length: None,
            children: Vec::new(),
            size: TYPE_DESCRIPTOR_SIZE,
        }
    }

    #[inline]
    pub const fn ion_type(&self) -> IonType {
        self.ion_type
    }

    #[inline]
    pub const fn descriptor(&self) -> u8 {
        self.descriptor
    }

    #[inline]
    pub const fn length(&self) -> Option<VarUInt> {
        self.length
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.descriptor & 0x0F == NULL_LENGTH
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        bytes.push_u8(self.descriptor);
        bytes.push_optional_length(self.length);
        for child in &self.children {
            child.serialize(bytes);
        }
    }
}

/// Field name symbol id followed by the field's value.
#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    field_name: VarUInt,
    value: Box<Node>,
}

impl StructField {
    #[inline]
    pub fn new(field_name: VarUInt, value: Node) -> Self {
        Self {
            field_name,
            value: Box::new(value),
        }
    }

    #[inline]
    pub const fn field_name(&self) -> VarUInt {
        self.field_name
    }

    #[inline]
    pub fn value(&self) -> &Node {
        &self.value
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.field_name.size() + self.value.size()
    }

    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        bytes.push_var_uint(self.field_name);
        self.value.serialize(bytes);
    }
}

/// Annotation wrapper around exactly one value.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedValue {
    descriptor: u8,
    length: Option<VarUInt>,
    annotations_length: VarUInt,
    annotations: Vec<VarUInt>,
    value: Box<Node>,
    size: usize,
}

impl AnnotatedValue {
    /// Wraps `value` with the annotation symbol ids, in order.
    #[inline]
    pub fn new(annotations: Vec<VarUInt>, value: Node) -> Self {
        let annotations_size: usize = annotations.iter().map(|sid| sid.size()).sum();
        let annotations_length = VarUInt::from(annotations_size);
        let wrapped_size = annotations_length.size() + annotations_size + value.size();
        let (descriptor, length) = length_header(ANNOTATION_CODE, wrapped_size);
        Self {
            descriptor,
            length,
            annotations_length,
            annotations,
            value: Box::new(value),
            size: TYPE_DESCRIPTOR_SIZE + length_size(length) + wrapped_size,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> u8 {
        self.descriptor
    }

    #[inline]
    pub const fn length(&self) -> Option<VarUInt> {
        self.length
    }

    #[inline]
    pub const fn annotations_length(&self) -> VarUInt {
        self.annotations_length
    }

    #[inline]
    pub fn annotations(&self) -> &[VarUInt] {
        &self.annotations
    }

    #[inline]
    pub fn value(&self) -> &Node {
        &self.value
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        bytes.push_u8(self.descriptor);
        bytes.push_optional_length(self.length);
        bytes.push_var_uint(self.annotations_length);
        for sid in &self.annotations {
            bytes.push_var_uint(*sid);
        }
        self.value.serialize(bytes);
    }
}

/// Local symbols of a datagram together with their binary `$ion_symbol_table` form.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalSymbolTable {
    symbols: Vec<String>,
    binary: AnnotatedValue,
}

impl LocalSymbolTable {
    #[inline]
    pub(crate) fn from_parts(symbols: Vec<String>, binary: AnnotatedValue) -> Self {
        Self { symbols, binary }
    }

    /// Local symbols in id order, the first one having id 10.
    #[inline]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[inline]
    pub fn binary(&self) -> &AnnotatedValue {
        &self.binary
    }
}

/// The top-level binary unit: version marker, optional local symbol table, values.
#[derive(Clone, Debug, PartialEq)]
pub struct Datagram {
    symbol_table: Option<LocalSymbolTable>,
    values: Vec<Node>,
}

impl Datagram {
    #[inline]
    pub fn new(symbol_table: Option<LocalSymbolTable>, values: Vec<Node>) -> Self {
        Self { symbol_table, values }
    }

    #[inline]
    pub fn symbol_table(&self) -> Option<&LocalSymbolTable> {
        self.symbol_table.as_ref()
    }

    #[inline]
    pub fn values(&self) -> &[Node] {
        &self.values
    }

    #[inline]
    pub fn size(&self) -> usize {
        IVM_SIZE
            + self.symbol_table.as_ref().map_or(0, |lst| lst.binary().size())
            + self.values.iter().map(Node::size).sum::<usize>()
    }

    #[inline]
    pub fn serialize(&self, bytes: &mut Vec<u8>) {
        bytes.push_bytes(&IVM);
        if let Some(lst) = &self.symbol_table {
            lst.binary().serialize(bytes);
        }
        for value in &self.values {
            value.serialize(bytes);
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>, TryReserveError> {
        let size = self.size();
        let mut bytes = Vec::try_with_capacity(size)?;
        self.serialize(&mut bytes);
        debug_assert_eq!(bytes.len(), size);
        Ok(bytes)
    }
}
