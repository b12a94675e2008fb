//! Json to element tests

use ion_element::{encode_datagram, Element, Int, IonType, JsonError, TaggedValue};
use std::str::FromStr;

#[test]
fn test_scalars() {
    assert_eq!(Element::parse_json("null").unwrap(), Element::null());
    assert_eq!(Element::parse_json("true").unwrap(), Element::bool(true));
    assert_eq!(Element::parse_json("\"str\"").unwrap(), Element::string("str"));
    assert_eq!(Element::parse_json("-42").unwrap(), Element::int(-42));

    let big = Element::parse_json("340282366920938463463374607431768211456").unwrap();
    assert_eq!(big, Element::int(Int::from_str("340282366920938463463374607431768211456").unwrap()));
    assert_eq!(Element::parse_json("0.25").unwrap().ion_type(), IonType::Decimal);
}

#[test]
fn test_containers() {
    let element = Element::parse_json(r#"{"list": [1, "two", [false]], "empty": {}}"#).unwrap();
    assert_eq!(element.ion_type(), IonType::Struct);
    assert_eq!(
        element.get("list"),
        Some(&Element::list([
            Element::int(1),
            Element::string("two"),
            Element::list([Element::bool(false)]),
        ]))
    );
    assert_eq!(element.get("empty"), Some(&Element::structure::<_, &str>([])));
}

#[test]
fn test_from_value() {
    let value = serde_json::json!({"k": [null, 7]});
    let element = Element::try_from(&value).unwrap();
    assert_eq!(
        element,
        Element::structure([("k", Element::list([Element::null(), Element::int(7)]))])
    );
}

#[test]
fn test_errors() {
    assert!(matches!(Element::parse_json("{\"a\": }"), Err(JsonError::JsonError(_))));
    assert!(matches!(Element::parse_json("1e200"), Err(JsonError::NumberOverflow)));
}

#[test]
fn test_json_to_binary() {
    let element = Element::parse_json(r#"{"a": [true, "x"]}"#).unwrap();
    let bytes = encode_datagram([&element]).unwrap();
    assert_eq!(
        bytes,
        [
            0xE0, 0x01, 0x00, 0xEA, // ivm
            0xE7, 0x81, 0x83, 0xD4, 0x87, 0xB2, 0x81, b'a', // $ion_symbol_table::{symbols: ["a"]}
            0xD5, 0x8A, 0xB3, 0x11, 0x81, b'x', // {a: [true, "x"]}
        ]
    );
}
