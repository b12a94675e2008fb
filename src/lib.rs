//! Ion binary encoding and lossless Ion text syntax trees in Rust.
//!
//! ## Optional features
//!
//! ### `serde`
//!
//! When this optional dependency is enabled, `Element` implements the `serde::Serialize` and
//! `serde::Deserialize` traits.
//!
//! ## Ion binary format
//!
//! ```BNF
//! datagram ::= ivm local-symbol-table? value*
//!
//! ivm ::= 0xE0 0x01 0x00 0xEA
//!
//! value ::= annotated-value | plain-value
//!
//! plain-value ::= type-descriptor length? payload
//!
//! type-descriptor ::= uint8   // high nibble is the type code, low nibble is L
//!
//! type-code ::=
//!     0 |     // null
//!     1 |     // bool, L is 1 for true and 0 for false
//!     2 |     // positive int
//!     3 |     // negative int
//!     4 |     // float
//!     5 |     // decimal
//!     6 |     // timestamp
//!     7 |     // symbol
//!     8 |     // string
//!     9 |     // clob
//!     10 |    // blob
//!     11 |    // list
//!     12 |    // sexp
//!     13 |    // struct
//!     14      // annotation wrapper
//!
//! // L is the payload length when it is at most 13 and there is no length field.
//! // L is 14 when the payload is longer and its length follows as a var-uint.
//! // L is 15 for a null of the type.
//! length ::= var-uint
//!
//! payload ::=
//!     uint8* |            // utf-8 text, lob bytes
//!     magnitude |         // int: big-endian magnitude without leading zeros
//!     symbol-id |         // symbol: big-endian id without leading zeros
//!     value* |            // list, sexp
//!     field*              // struct
//!
//! field ::= symbol-id-var value    // field name is a var-uint symbol id
//!
//! annotated-value ::= type-descriptor length? annotations-length annotation+ plain-value
//! annotations-length ::= var-uint   // total byte size of the annotation ids
//! annotation ::= var-uint           // symbol id
//!
//! // $ion_symbol_table::{symbols: ["...", ...]}, present when any local symbol is used.
//! // Local symbols get ids 10, 11, ... in first-use order.
//! local-symbol-table ::= annotated-value
//!
//! var-uint ::= uint8*   // 7 bits per byte, big-endian, high bit set on the last byte only
//! ```
//!
//! ## Usage
//!
//! ### Encoding
//!
//! To encode values into a datagram, use [`encode_datagram`] or [`DatagramBuilder`]:
//!
//! ```rust
//! use ion_element::{encode_datagram, DatagramBuilder, Element};
//!
//! let bytes = encode_datagram(&[Element::string(""), Element::bool(true)]).unwrap();
//! assert_eq!(bytes, [0xE0, 0x01, 0x00, 0xEA, 0x80, 0x11]);
//!
//! let mut builder = DatagramBuilder::new();
//! builder.push(&Element::list([Element::int(1)])).unwrap();
//! let datagram = builder.finish();
//! assert_eq!(datagram.format(false).to_string(), "E0 01 00 EA B2 21 01");
//! assert_eq!(datagram.format(true).to_string(), "E0 01 00 EA\nB2 [\n  21 01\n]");
//! ```
//!
//! ### Text
//!
//! To build the lossless syntax tree of Ion text, use [`text::parse`]:
//!
//! ```rust
//! use ion_element::text::{parse, SyntaxTree};
//! use ion_element::IonType;
//!
//! let forest = parse("[1, 2, 3] // numbers").unwrap();
//! assert_eq!(forest[0].ion_type(), Some(IonType::List));
//!
//! let text: String = forest.iter().map(SyntaxTree::text).collect();
//! assert_eq!(text, "[1, 2, 3] // numbers");
//! ```
//!
//! To load Ion text straight into values, use [`text::load`]:
//!
//! ```rust
//! use ion_element::Element;
//!
//! let elements = ion_element::text::load("a::{b: 'c'}").unwrap();
//! assert_eq!(elements, [Element::structure([("b", Element::symbol("c"))]).with_annotations(["a"])]);
//! ```
//!

#![cfg_attr(docsrs, feature(doc_cfg))]

mod binary;
mod element;
mod encoder;
mod format;
mod int;
mod ion_type;
mod json;
mod node;
mod symbol;
pub mod text;
mod varint;
mod vec;

#[cfg(feature = "serde")]
mod serde;

pub use self::{
    binary::IVM,
    element::{Element, TaggedValue, Value, ValueRef},
    encoder::{encode_datagram, encode_value, DatagramBuilder, EncodeError, EncodeResult},
    format::{
        CompactFormatter, FormatError, FormatResult, Formatter, Highlight, LazyFormat, PrettyFormatter, PrettyOptions,
        Style,
    },
    int::{Int, IntParseError},
    ion_type::{InvalidIonType, IonType},
    json::{JsonError, JsonResult},
    node::{AnnotatedValue, Container, Datagram, LocalSymbolTable, Node, Scalar, StructField},
    symbol::{local_symbol_table, system_symbol_id, SymbolTable},
    varint::{DecodeError, DecodeResult, VarInt, VarUInt},
};
pub use decimal_rs::Decimal;
