//! Impl the `serde::Serialize` and `serde::Deserialize` traits.
//!
//! Elements map onto the serde data model: nulls are units, lists and sexps are sequences,
//! structs are maps and lobs are byte arrays. Annotations are not serialized.

use crate::element::{Element, Value};
use crate::int::Int;
use crate::json::parse_number;
use serde::ser::{SerializeMap, SerializeSeq};
use std::fmt::Formatter;

/// Map key under which `serde_json` hands out numbers when `arbitrary_precision` is enabled.
const SERDE_JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.value() {
            Value::Null(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => match i.to_i64() {
                Some(v) => serializer.serialize_i64(v),
                None => serializer.collect_str(i),
            },
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.collect_str(d),
            Value::Timestamp(s) | Value::String(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Clob(bytes) | Value::Blob(bytes) => serializer.serialize_bytes(bytes),
            Value::List(values) | Value::Sexp(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> serde::Deserialize<'de> for Element {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        struct ElementVisitor;

        impl<'de> serde::de::Visitor<'de> for ElementVisitor {
            type Value = Element;

            #[inline]
            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "an ion value")
            }

            #[inline]
            fn visit_unit<E>(self) -> Result<Element, E> {
                Ok(Element::null())
            }

            #[inline]
            fn visit_none<E>(self) -> Result<Element, E> {
                Ok(Element::null())
            }

            #[inline]
            fn visit_some<D>(self, deserializer: D) -> Result<Element, D::Error>
            where
                D: serde::de::Deserializer<'de>,
            {
                serde::Deserialize::deserialize(deserializer)
            }

            #[inline]
            fn visit_bool<E>(self, v: bool) -> Result<Element, E> {
                Ok(Element::bool(v))
            }

            #[inline]
            fn visit_i64<E>(self, v: i64) -> Result<Element, E> {
                Ok(Element::int(v))
            }

            #[inline]
            fn visit_u64<E>(self, v: u64) -> Result<Element, E> {
                Ok(Element::int(v))
            }

            #[inline]
            fn visit_i128<E>(self, v: i128) -> Result<Element, E> {
                Ok(Element::int(Int::from(v)))
            }

            #[inline]
            fn visit_u128<E>(self, v: u128) -> Result<Element, E> {
                Ok(Element::int(Int::from(v)))
            }

            #[inline]
            fn visit_f64<E>(self, v: f64) -> Result<Element, E> {
                Ok(Element::float(v))
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Element, E> {
                Ok(Element::string(v))
            }

            #[inline]
            fn visit_string<E>(self, v: String) -> Result<Element, E> {
                Ok(Element::string(v))
            }

            #[inline]
            fn visit_bytes<E>(self, v: &[u8]) -> Result<Element, E>
            where
                E: serde::de::Error,
            {
                let mut buf = Vec::new();
                buf.try_reserve(v.len()).map_err(serde::de::Error::custom)?;
                buf.extend_from_slice(v);
                Ok(Element::blob(buf))
            }

            #[inline]
            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Element, E> {
                Ok(Element::blob(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Element, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<Element>()? {
                    values.push(value);
                }
                Ok(Element::list(values))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Element, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut fields = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    if fields.is_empty() && name == SERDE_JSON_NUMBER_TOKEN {
                        let text: String = map.next_value()?;
                        return parse_number(&text).map_err(serde::de::Error::custom);
                    }
                    let value: Element = map.next_value()?;
                    fields.push((name, value));
                }
                Ok(Element::structure(fields))
            }
        }

        deserializer.deserialize_any(ElementVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ion_type::IonType;
    use decimal_rs::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_serialize() {
        let element = Element::structure([
            ("a", Element::int(1)),
            ("b", Element::list([Element::bool(true), Element::null_of(IonType::Int)])),
            ("c", Element::symbol("x").with_annotations(["dropped"])),
            ("d", Element::sexp([Element::string("y")])),
        ]);
        assert_eq!(
            serde_json::to_string(&element).unwrap(),
            r#"{"a":1,"b":[true,null],"c":"x","d":["y"]}"#
        );
    }

    #[test]
    fn test_deserialize() {
        let element: Element = serde_json::from_str(r#"{"z": [1, -2, null], "a": 2.5, "s": "t"}"#).unwrap();
        assert_eq!(
            element,
            Element::structure([
                ("z", Element::list([Element::int(1), Element::int(-2), Element::null()])),
                ("a", Element::decimal(Decimal::from_str("2.5").unwrap())),
                ("s", Element::string("t")),
            ])
        );

        let element: Element = serde_json::from_str("340282366920938463463374607431768211456").unwrap();
        assert_eq!(
            element,
            Element::int(Int::from_str("340282366920938463463374607431768211456").unwrap())
        );
    }
}
