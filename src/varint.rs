//! Variable width integers.
//!
//! Both encodings are big-endian base-128: seven value bits per byte, most significant group
//! first, and the high bit set only on the last byte. `VarInt` additionally spends the bit
//! below the end flag of its first byte on the sign.

use crate::vec::VecExt;
use std::error::Error;
use std::fmt::{Display, Formatter};

const END_FLAG: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;
const SIGN_FLAG: u8 = 0x40;
const FIRST_GROUP_MASK: u8 = 0x3F;

/// Possible errors that can arise during decoding a variable width integer.
#[derive(Debug, Eq, PartialEq)]
pub enum DecodeError {
    IndexOutOfBounds { len: usize, index: usize },
    Overflow,
}

impl Display for DecodeError {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            DecodeError::IndexOutOfBounds { len, index } => {
                write!(f, "index out of bounds: the len is {} but the index is {}", len, index)
            }
            DecodeError::Overflow => write!(f, "variable width integer does not fit in 64 bits"),
        }
    }
}

impl Error for DecodeError {}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[inline]
const fn significant_bits(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// An unsigned variable width integer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct VarUInt(u64);

impl VarUInt {
    #[inline]
    pub const fn new(value: u64) -> Self {
        VarUInt(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Number of bytes the encoding takes, at least 1.
    #[inline]
    pub const fn size(self) -> usize {
        let bits = significant_bits(self.0);
        if bits == 0 {
            1
        } else {
            ((bits + 6) / 7) as usize
        }
    }

    /// Appends exactly `self.size()` bytes to `bytes`.
    #[inline]
    pub fn serialize(self, bytes: &mut Vec<u8>) {
        let size = self.size();
        for i in (0..size).rev() {
            let mut group = (self.0 >> (7 * i)) as u8 & GROUP_MASK;
            if i == 0 {
                group |= END_FLAG;
            }
            bytes.push_u8(group);
        }
    }

    #[inline]
    pub fn to_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());
        self.serialize(&mut bytes);
        bytes
    }

    /// Decodes a `VarUInt` starting at `index`, returning it with the number of bytes read.
    #[inline]
    pub fn decode(buf: &[u8], index: usize) -> DecodeResult<(VarUInt, usize)> {
        let mut value: u64 = 0;
        let mut pos = index;
        loop {
            let byte = read_byte(buf, pos)?;
            if value > (u64::MAX >> 7) {
                return Err(DecodeError::Overflow);
            }
            value = (value << 7) | (byte & GROUP_MASK) as u64;
            pos += 1;
            if byte & END_FLAG != 0 {
                return Ok((VarUInt(value), pos - index));
            }
        }
    }
}

impl From<u32> for VarUInt {
    #[inline]
    fn from(value: u32) -> Self {
        VarUInt(value as u64)
    }
}

impl From<usize> for VarUInt {
    #[inline]
    fn from(value: usize) -> Self {
        VarUInt(value as u64)
    }
}

/// A signed variable width integer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct VarInt(i64);

impl VarInt {
    #[inline]
    pub const fn new(value: i64) -> Self {
        VarInt(value)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn size(self) -> usize {
        let bits = significant_bits(self.0.unsigned_abs());
        if bits <= 6 {
            1
        } else {
            1 + ((bits - 6) as usize + 6) / 7
        }
    }

    #[inline]
    pub fn serialize(self, bytes: &mut Vec<u8>) {
        let magnitude = self.0.unsigned_abs();
        let size = self.size();
        for i in (0..size).rev() {
            let shifted = magnitude >> (7 * i);
            let mut group = if i == size - 1 {
                let mut first = shifted as u8 & FIRST_GROUP_MASK;
                if self.0 < 0 {
                    first |= SIGN_FLAG;
                }
                first
            } else {
                shifted as u8 & GROUP_MASK
            };
            if i == 0 {
                group |= END_FLAG;
            }
            bytes.push_u8(group);
        }
    }

    #[inline]
    pub fn decode(buf: &[u8], index: usize) -> DecodeResult<(VarInt, usize)> {
        let first = read_byte(buf, index)?;
        let negative = first & SIGN_FLAG != 0;
        let mut magnitude = (first & FIRST_GROUP_MASK) as u64;
        let mut pos = index + 1;
        let mut byte = first;
        while byte & END_FLAG == 0 {
            byte = read_byte(buf, pos)?;
            if magnitude > (u64::MAX >> 7) {
                return Err(DecodeError::Overflow);
            }
            magnitude = (magnitude << 7) | (byte & GROUP_MASK) as u64;
            pos += 1;
        }

        let value = if negative {
            0i64.checked_sub_unsigned(magnitude).ok_or(DecodeError::Overflow)?
        } else {
            i64::try_from(magnitude).map_err(|_| DecodeError::Overflow)?
        };
        Ok((VarInt(value), pos - index))
    }
}

#[inline]
fn read_byte(buf: &[u8], index: usize) -> DecodeResult<u8> {
    buf.get(index).copied().ok_or(DecodeError::IndexOutOfBounds { len: buf.len(), index })
}
