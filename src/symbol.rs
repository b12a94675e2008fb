//! Symbol interning and local symbol tables.

use crate::binary::{LOCAL_SID_START, SID_ION_SYMBOL_TABLE, SID_SYMBOLS, SYSTEM_SYMBOLS};
use crate::ion_type::IonType;
use crate::node::{AnnotatedValue, Container, LocalSymbolTable, Node, Scalar, StructField};
use crate::varint::VarUInt;
use indexmap::IndexSet;

/// Returns the id of `text` in the system symbol table, if it is a system symbol.
#[inline]
pub fn system_symbol_id(text: &str) -> Option<u32> {
    SYSTEM_SYMBOLS
        .iter()
        .position(|symbol| *symbol == text)
        .map(|index| index as u32 + 1)
}

/// Maps symbol text to symbol ids for one datagram under construction.
///
/// System symbols always resolve to their fixed ids 1 to 9. Every other text is appended to
/// the local table on first sight and gets id `10 + index`.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    local: IndexSet<String>,
}

impl SymbolTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `text`, appending it to the local table if needed.
    pub fn intern(&mut self, text: &str) -> VarUInt {
        if let Some(sid) = system_symbol_id(text) {
            return VarUInt::from(sid);
        }
        let index = match self.local.get_index_of(text) {
            Some(index) => index,
            None => self.local.insert_full(text.to_string()).0,
        };
        VarUInt::from(LOCAL_SID_START as usize + index)
    }

    /// Looks up `text` without interning it.
    pub fn get(&self, text: &str) -> Option<VarUInt> {
        system_symbol_id(text)
            .map(VarUInt::from)
            .or_else(|| {
                self.local
                    .get_index_of(text)
                    .map(|index| VarUInt::from(LOCAL_SID_START as usize + index))
            })
    }

    /// Resolves a symbol id back to its text.
    pub fn text(&self, sid: VarUInt) -> Option<&str> {
        let sid = usize::try_from(sid.value()).ok()?;
        match sid {
            0 => None,
            sid if sid < LOCAL_SID_START as usize => Some(SYSTEM_SYMBOLS[sid - 1]),
            sid => self.local.get_index(sid - LOCAL_SID_START as usize).map(String::as_str),
        }
    }

    /// Number of local symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.local.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    #[inline]
    pub fn local_symbols(&self) -> impl Iterator<Item = &str> {
        self.local.iter().map(String::as_str)
    }

    /// Freezes the table, returning `None` when no local symbol was interned.
    #[inline]
    pub fn into_local_symbol_table(self) -> Option<LocalSymbolTable> {
        local_symbol_table(self.local.into_iter().collect())
    }
}

/// Builds `$ion_symbol_table::{symbols: [...]}` for the given local symbols.
pub fn local_symbol_table(symbols: Vec<String>) -> Option<LocalSymbolTable> {
    if symbols.is_empty() {
        return None;
    }

    let strings = symbols
        .iter()
        .map(|symbol| Scalar::new(IonType::String.type_code(), symbol.as_bytes().to_vec()).into())
        .collect();
    let list = Container::new(IonType::List, strings);
    let field = StructField::new(VarUInt::from(SID_SYMBOLS), list.into());
    let table = Container::new(IonType::Struct, vec![Node::Field(field)]);
    let binary = AnnotatedValue::new(vec![VarUInt::from(SID_ION_SYMBOL_TABLE)], table.into());

    Some(LocalSymbolTable::from_parts(symbols, binary))
}
