//! Datagram builder.

use crate::element::TaggedValue;
use crate::encoder::{encode_value, EncodeResult};
use crate::node::{Datagram, Node};
use crate::symbol::SymbolTable;
use tracing::debug;

/// Builder for encoding a sequence of top-level values into one [`Datagram`].
///
/// All values share one symbol table, which is frozen and prepended on [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct DatagramBuilder {
    symbols: SymbolTable,
    values: Vec<Node>,
}

impl DatagramBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `value` and appends it to the datagram.
    #[inline]
    pub fn push<V: TaggedValue>(&mut self, value: &V) -> EncodeResult<&mut Self> {
        let node = encode_value(value, &mut self.symbols)?;
        self.values.try_reserve(1)?;
        self.values.push(node);
        Ok(self)
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Finishes the datagram.
    pub fn finish(self) -> Datagram {
        let value_count = self.values.len();
        let symbol_count = self.symbols.len();
        let datagram = Datagram::new(self.symbols.into_local_symbol_table(), self.values);
        debug!(value_count, symbol_count, size = datagram.size(), "finished datagram");
        datagram
    }
}

/// Encodes `values` into a datagram and flattens it to bytes.
pub fn encode_datagram<'a, V, I>(values: I) -> EncodeResult<Vec<u8>>
where
    V: TaggedValue + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut builder = DatagramBuilder::new();
    for value in values {
        builder.push(value)?;
    }
    Ok(builder.finish().to_bytes()?)
}
