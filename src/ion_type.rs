//! Ion type.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// The thirteen Ion value types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum IonType {
    Null = 0x0,
    Bool = 0x1,
    Int = 0x2,
    Float = 0x4,
    Decimal = 0x5,
    Timestamp = 0x6,
    Symbol = 0x7,
    String = 0x8,
    Clob = 0x9,
    Blob = 0xA,
    List = 0xB,
    Sexp = 0xC,
    Struct = 0xD,
}

impl IonType {
    /// Returns the type name as it is spelled in Ion text, e.g. after `null.`.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            IonType::Null => "null",
            IonType::Bool => "bool",
            IonType::Int => "int",
            IonType::Float => "float",
            IonType::Decimal => "decimal",
            IonType::Timestamp => "timestamp",
            IonType::Symbol => "symbol",
            IonType::String => "string",
            IonType::Clob => "clob",
            IonType::Blob => "blob",
            IonType::List => "list",
            IonType::Sexp => "sexp",
            IonType::Struct => "struct",
        }
    }

    /// Looks up a type by its text name.
    #[inline]
    pub fn from_name(name: &str) -> Result<Self, InvalidIonType> {
        match name {
            "null" => Ok(IonType::Null),
            "bool" => Ok(IonType::Bool),
            "int" => Ok(IonType::Int),
            "float" => Ok(IonType::Float),
            "decimal" => Ok(IonType::Decimal),
            "timestamp" => Ok(IonType::Timestamp),
            "symbol" => Ok(IonType::Symbol),
            "string" => Ok(IonType::String),
            "clob" => Ok(IonType::Clob),
            "blob" => Ok(IonType::Blob),
            "list" => Ok(IonType::List),
            "sexp" => Ok(IonType::Sexp),
            "struct" => Ok(IonType::Struct),
            _ => Err(InvalidIonType::Name(name.to_string())),
        }
    }

    /// The high nibble of the type descriptor byte for a non-negative value of this type.
    #[inline]
    pub const fn type_code(self) -> u8 {
        (self as u8) << 4
    }

    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, IonType::List | IonType::Sexp | IonType::Struct)
    }
}

impl Display for IonType {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<IonType> for u8 {
    #[inline]
    fn from(t: IonType) -> Self {
        t as u8
    }
}

/// Error for a type descriptor nibble or a type name that names no Ion type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InvalidIonType {
    Code(u8),
    Name(String),
}

impl TryFrom<u8> for IonType {
    type Error = InvalidIonType;

    /// Reads the Ion type out of a type descriptor byte. Both int nibbles map to `Int`.
    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value >> 4 {
            0x0 => Ok(IonType::Null),
            0x1 => Ok(IonType::Bool),
            0x2 | 0x3 => Ok(IonType::Int),
            0x4 => Ok(IonType::Float),
            0x5 => Ok(IonType::Decimal),
            0x6 => Ok(IonType::Timestamp),
            0x7 => Ok(IonType::Symbol),
            0x8 => Ok(IonType::String),
            0x9 => Ok(IonType::Clob),
            0xA => Ok(IonType::Blob),
            0xB => Ok(IonType::List),
            0xC => Ok(IonType::Sexp),
            0xD => Ok(IonType::Struct),
            _ => Err(InvalidIonType::Code(value)),
        }
    }
}

impl Display for InvalidIonType {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            InvalidIonType::Code(v) => write!(f, "invalid type descriptor '{:#04x}'", v),
            InvalidIonType::Name(name) => write!(f, "invalid type name '{}'", name),
        }
    }
}

impl Error for InvalidIonType {}
