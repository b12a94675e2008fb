//! Vec extension.

use crate::binary::{type_descriptor, MAX_INLINE_LENGTH, VAR_LENGTH};
use crate::varint::VarUInt;
use std::collections::TryReserveError;

pub trait VecExt: Sized {
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError>;
    fn push_u8(&mut self, val: u8);
    fn push_bytes(&mut self, bytes: &[u8]);
    fn push_var_uint(&mut self, val: VarUInt);
    fn push_optional_length(&mut self, length: Option<VarUInt>);
}

impl VecExt for Vec<u8> {
    #[inline]
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut vec = Vec::new();
        vec.try_reserve(capacity)?;
        Ok(vec)
    }

    #[inline]
    fn push_u8(&mut self, val: u8) {
        self.push(val);
    }

    #[inline]
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes)
    }

    #[inline]
    fn push_var_uint(&mut self, val: VarUInt) {
        val.serialize(self);
    }

    #[inline]
    fn push_optional_length(&mut self, length: Option<VarUInt>) {
        if let Some(length) = length {
            self.push_var_uint(length);
        }
    }
}

/// Applies the length threshold rule: lengths up to 13 live in the low nibble of the
/// type descriptor, anything longer gets the `14` sentinel and an explicit `VarUInt` length.
#[inline]
pub fn length_header(type_code: u8, length: usize) -> (u8, Option<VarUInt>) {
    if length <= MAX_INLINE_LENGTH {
        (type_descriptor(type_code, length as u8), None)
    } else {
        (type_descriptor(type_code, VAR_LENGTH), Some(VarUInt::from(length)))
    }
}
