//! Json to Element

use crate::element::Element;
use crate::int::{Int, IntParseError};
use decimal_rs::{Decimal, DecimalParseError};
use serde_json::Value;
use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::{Display, Formatter, Write};
use std::str::FromStr;

/// Possible errors that can arise during converting json into elements.
#[derive(Debug)]
pub enum JsonError {
    JsonError(serde_json::Error),
    NumberFormatError,
    NumberOverflow,
    IntParseError(IntParseError),
    TryReserveError(TryReserveError),
}

impl Display for JsonError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonError::JsonError(e) => write!(f, "{}", e),
            JsonError::NumberFormatError => write!(f, "failed to format json number"),
            JsonError::NumberOverflow => write!(f, "json number overflows decimal range"),
            JsonError::IntParseError(e) => write!(f, "{}", e),
            JsonError::TryReserveError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for JsonError {}

impl From<TryReserveError> for JsonError {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        JsonError::TryReserveError(e)
    }
}

pub type JsonResult<T> = std::result::Result<T, JsonError>;

impl TryFrom<&serde_json::Value> for Element {
    type Error = JsonError;

    #[inline]
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let mut buf = String::new();
        json2element(value, &mut buf)
    }
}

impl Element {
    /// Parses a json string to `Element`.
    #[inline]
    pub fn parse_json<T: AsRef<str>>(str: T) -> JsonResult<Self> {
        let json: Value = serde_json::from_str(str.as_ref()).map_err(JsonError::JsonError)?;
        Element::try_from(&json)
    }
}

fn json2element(value: &serde_json::Value, buf: &mut String) -> JsonResult<Element> {
    let element = match value {
        Value::Null => Element::null(),
        Value::Bool(val) => Element::bool(*val),
        Value::Number(val) => number2element(val, buf)?,
        Value::String(val) => Element::string(val.as_str()),
        Value::Array(array) => {
            let mut values = Vec::new();
            values.try_reserve(array.len())?;
            for val in array {
                values.push(json2element(val, buf)?);
            }
            Element::list(values)
        }
        Value::Object(object) => {
            let mut fields = Vec::new();
            fields.try_reserve(object.len())?;
            for (key, val) in object {
                fields.push((key.as_str(), json2element(val, buf)?));
            }
            Element::structure(fields)
        }
    };
    Ok(element)
}

#[inline]
fn number2element(val: &serde_json::Number, buf: &mut String) -> JsonResult<Element> {
    write_number(val, buf)?;
    parse_number(buf)
}

/// Integral numbers become ints of any size, all others decimals.
#[inline]
pub(crate) fn parse_number(s: &str) -> JsonResult<Element> {
    if s.contains(['.', 'e', 'E']) {
        return Ok(Element::decimal(parse_decimal(s)?));
    }
    let int = Int::from_str(s).map_err(JsonError::IntParseError)?;
    Ok(Element::int(int))
}

#[inline]
fn write_number(val: &serde_json::Number, buf: &mut String) -> JsonResult<()> {
    buf.clear();
    buf.try_reserve(256)?;
    write!(buf, "{}", val).map_err(|_| JsonError::NumberFormatError)
}

#[inline]
fn parse_decimal(s: &str) -> JsonResult<Decimal> {
    Decimal::from_str(s).or_else(|e| match e {
        DecimalParseError::Underflow => Ok(Decimal::ZERO),
        DecimalParseError::Overflow => Err(JsonError::NumberOverflow),
        _ => Err(JsonError::NumberFormatError),
    })
}
