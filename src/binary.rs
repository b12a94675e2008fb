//! Ion binary format.

/// Ion 1.0 binary version marker, the first four bytes of every datagram.
pub const IVM: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];
pub const IVM_SIZE: usize = IVM.len();

pub const TYPE_DESCRIPTOR_SIZE: usize = 1;

/// Largest payload length that fits in the low nibble of a type descriptor.
pub const MAX_INLINE_LENGTH: usize = 13;
/// Low nibble sentinel: an explicit VarUInt length follows the type descriptor.
pub const VAR_LENGTH: u8 = 14;
/// Low nibble sentinel: the value is a typed null.
pub const NULL_LENGTH: u8 = 15;

pub const NEG_INT_CODE: u8 = 0x30;
pub const ANNOTATION_CODE: u8 = 0xE0;

/// Symbol id of the first local symbol.
pub const LOCAL_SID_START: u32 = 10;
pub const SID_ION_SYMBOL_TABLE: u32 = 3;
pub const SID_SYMBOLS: u32 = 7;

/// Ion 1.0 system symbol table; the symbol at index `i` has id `i + 1`.
pub const SYSTEM_SYMBOLS: [&str; 9] = [
    "$ion",
    "$ion_1_0",
    "$ion_symbol_table",
    "name",
    "version",
    "imports",
    "symbols",
    "max_id",
    "$ion_shared_symbol_table",
];

/// Builds a type descriptor byte from a type code and a length nibble.
#[inline]
pub const fn type_descriptor(type_code: u8, length_nibble: u8) -> u8 {
    debug_assert!(length_nibble <= NULL_LENGTH);
    (type_code & 0xF0) | length_nibble
}
