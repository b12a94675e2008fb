//! Value to binary encoder tests

use ion_element::{
    encode_datagram, encode_value, DatagramBuilder, Decimal, Element, EncodeError, Int, IonType, Node, SymbolTable,
    TaggedValue, VarUInt, IVM,
};
use std::str::FromStr;

fn encode(element: &Element) -> Vec<u8> {
    let mut symbols = SymbolTable::new();
    let node = encode_value(element, &mut symbols).unwrap();
    let bytes = node.to_bytes().unwrap();
    assert_eq!(bytes.len(), node.size());
    bytes
}

/// Reads the descriptor and explicit length of a top-level encoding.
fn header(bytes: &[u8]) -> (u8, Option<u64>) {
    let descriptor = bytes[0];
    if descriptor & 0x0F == 14 {
        let (length, _) = VarUInt::decode(bytes, 1).unwrap();
        (descriptor, Some(length.value()))
    } else {
        (descriptor, None)
    }
}

#[test]
fn test_scalars() {
    assert_eq!(encode(&Element::string("")), [0x80]);
    assert_eq!(encode(&Element::null()), [0x0F]);
    assert_eq!(encode(&Element::bool(true)), [0x11]);
    assert_eq!(encode(&Element::bool(false)), [0x10]);
    assert_eq!(encode(&Element::null_of(IonType::Bool)), [0x1F]);
    assert_eq!(encode(&Element::null_of(IonType::String)), [0x8F]);
    assert_eq!(encode(&Element::null_of(IonType::Sexp)), [0xCF]);
    assert_eq!(encode(&Element::string("ion")), [0x83, b'i', b'o', b'n']);
    assert_eq!(encode(&Element::int(0)), [0x20]);
    assert_eq!(encode(&Element::int(-300)), [0x32, 0x01, 0x2C]);
    assert_eq!(encode(&Element::int(u64::MAX)), [0x28, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(encode(&Element::clob(b"x".to_vec())), [0x91, b'x']);
    assert_eq!(encode(&Element::blob(vec![0u8; 3])), [0xA3, 0, 0, 0]);
}

#[test]
fn test_length_threshold() {
    for len in 0..300 {
        let text = "a".repeat(len);
        let bytes = encode(&Element::string(text.as_str()));
        let (descriptor, length) = header(&bytes);
        assert_eq!(descriptor >> 4, 0x8);
        if len <= 13 {
            assert_eq!(descriptor & 0x0F, len as u8);
            assert_eq!(bytes.len(), 1 + len);
        } else {
            assert_eq!(descriptor & 0x0F, 14);
            assert_eq!(length, Some(len as u64));
            assert_eq!(bytes.len(), 1 + VarUInt::new(len as u64).size() + len);
        }
    }
}

#[test]
fn test_long_int() {
    let int = Int::from_str("0x0102030405060708090A0B0C0D0E").unwrap();
    let bytes = encode(&Element::int(int.clone()));
    assert_eq!(bytes[..2], [0x2E, 0x8E]);
    assert_eq!(&bytes[2..], int.magnitude());
}

#[test]
fn test_nested_containers() {
    let element = Element::structure([
        ("name", Element::string("x")),
        (
            "items",
            Element::list([Element::int(1), Element::sexp([Element::symbol("a"), Element::null()])]),
        ),
    ]);
    let mut symbols = SymbolTable::new();
    let node = encode_value(&element, &mut symbols).unwrap();
    assert_eq!(node.size(), node.to_bytes().unwrap().len());
    assert_eq!(
        node.to_bytes().unwrap(),
        [
            0xDB, // struct, 11 bytes
            0x84, 0x81, b'x', // name: "x"
            0x8A, 0xB6, // items: list, 6 bytes
            0x21, 0x01, // 1
            0xC3, 0x71, 0x0B, 0x0F, // (a null)
        ]
    );
    assert_eq!(symbols.local_symbols().collect::<Vec<_>>(), ["items", "a"]);
    match node {
        Node::Container(container) => assert_eq!(container.children().len(), 2),
        _ => panic!("expected a container"),
    }
}

#[test]
fn test_symbol_interning() {
    let mut symbols = SymbolTable::new();
    assert_eq!(symbols.intern("b"), VarUInt::new(10));
    assert_eq!(symbols.intern("a"), VarUInt::new(11));
    assert_eq!(symbols.intern("b"), VarUInt::new(10));
    assert_eq!(symbols.intern("symbols"), VarUInt::new(7));
    assert_eq!(symbols.intern("c"), VarUInt::new(12));
    assert_eq!(symbols.len(), 3);
    assert_eq!(symbols.get("a"), Some(VarUInt::new(11)));
    assert_eq!(symbols.get("d"), None);
    assert_eq!(symbols.text(VarUInt::new(12)), Some("c"));
    assert_eq!(symbols.text(VarUInt::new(3)), Some("$ion_symbol_table"));
}

#[test]
fn test_annotations() {
    // annotations are interned after the symbols of the value itself
    let element = Element::list([Element::symbol("v")]).with_annotations(["a"]);
    let mut symbols = SymbolTable::new();
    let bytes = encode_value(&element, &mut symbols).unwrap().to_bytes().unwrap();
    assert_eq!(bytes, [0xE5, 0x81, 0x8B, 0xB2, 0x71, 0x0A]);
    assert_eq!(symbols.local_symbols().collect::<Vec<_>>(), ["v", "a"]);

    // wrapper length covers the annotation length field, the ids and the value
    let element = Element::string("s").with_annotations(["name", "x", "y"]);
    let bytes = encode(&element);
    assert_eq!(bytes, [0xE6, 0x83, 0x84, 0x8A, 0x8B, 0x81, b's']);
}

#[test]
fn test_datagram() {
    let values = [
        Element::symbol("hello"),
        Element::structure([("hello", Element::bool(true))]),
    ];
    let bytes = encode_datagram(&values).unwrap();
    assert_eq!(&bytes[..4], IVM);
    assert_eq!(
        &bytes[4..],
        [
            0xEB, 0x81, 0x83, // $ion_symbol_table::
            0xD8, 0x87, 0xB6, 0x85, b'h', b'e', b'l', b'l', b'o', // {symbols: ["hello"]}
            0x71, 0x0A, // hello
            0xD2, 0x8A, 0x11, // {hello: true}
        ]
    );

    let mut builder = DatagramBuilder::new();
    for value in &values {
        builder.push(value).unwrap();
    }
    let datagram = builder.finish();
    assert_eq!(datagram.size(), bytes.len());
    assert_eq!(datagram.to_bytes().unwrap(), bytes);
    assert_eq!(datagram.symbol_table().unwrap().symbols(), ["hello"]);
}

#[test]
fn test_empty_datagram() {
    let values: [Element; 0] = [];
    assert_eq!(encode_datagram(&values).unwrap(), IVM);
}

#[test]
fn test_unsupported_types() {
    let decimal = Element::decimal(Decimal::from_str("1.5").unwrap());
    let err = encode_datagram(&[Element::int(1), decimal]).unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType(IonType::Decimal)));

    let mut symbols = SymbolTable::new();
    let nested = Element::list([Element::timestamp("2020-01-01T")]);
    let err = encode_value(&nested, &mut symbols).unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType(IonType::Timestamp)));
    assert_eq!(err.to_string(), "encoding timestamp values is not supported");

    let float = Element::float(2.0);
    assert_eq!(float.ion_type(), IonType::Float);
    assert!(encode_value(&float, &mut symbols).is_err());
}
