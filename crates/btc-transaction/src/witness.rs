//! Per-input witness stack for segwit spends.

use btc_primitives::util::{TxReader, TxWriter, VarInt};

use crate::error::read_err;
use crate::TransactionError;

/// The witness stack attached to one input.
///
/// A witness is a list of byte-string stack items. On the wire it is
/// encoded as a VarInt item count followed by each item with its own
/// VarInt length prefix. An empty stack encodes as a single `0x00` byte.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TxWitness {
    /// The stack items, bottom to top.
    pub items: Vec<Vec<u8>>,
}

impl TxWitness {
    /// Create an empty witness stack.
    ///
    /// # Returns
    /// A `TxWitness` with no items.
    pub fn new() -> Self {
        TxWitness { items: Vec::new() }
    }

    /// Create a witness stack from a list of items.
    ///
    /// # Arguments
    /// * `items` - The stack items, bottom to top.
    ///
    /// # Returns
    /// A `TxWitness` owning the items.
    pub fn from_items(items: Vec<Vec<u8>>) -> Self {
        TxWitness { items }
    }

    /// Append an item to the top of the stack.
    ///
    /// # Arguments
    /// * `item` - The item bytes.
    pub fn push(&mut self, item: Vec<u8>) {
        self.items.push(item);
    }

    /// Return the number of stack items.
    ///
    /// # Returns
    /// The item count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the stack has no items.
    ///
    /// # Returns
    /// `true` if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Deserialize a witness stack from a `TxReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the VarInt item count.
    ///
    /// # Returns
    /// `Ok(TxWitness)` on success, or a `TransactionError` if the data is
    /// truncated or malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let count = reader.read_varint().map_err(read_err("witness item count"))?;

        let mut items = Vec::with_capacity(count.value() as usize);
        for _ in 0..count.value() {
            let item_len = reader.read_varint().map_err(read_err("witness item length"))?;
            let item = reader
                .read_bytes(item_len.value() as usize)
                .map_err(read_err("witness item"))?;
            items.push(item.to_vec());
        }

        Ok(TxWitness { items })
    }

    /// Deserialize a witness stack from a standalone byte buffer.
    ///
    /// The buffer must contain exactly one encoded stack; trailing bytes
    /// are rejected. Used when extracting a finalized PSBT, where each
    /// input's witness arrives as an independent blob.
    ///
    /// # Arguments
    /// * `bytes` - A complete encoded witness stack.
    ///
    /// # Returns
    /// `Ok(TxWitness)` on success, or a `TransactionError` for truncated,
    /// malformed, or over-long data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = TxReader::new(bytes);
        let witness = Self::read_from(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(TransactionError::SerializationError(format!(
                "{} trailing bytes after witness stack",
                reader.remaining()
            )));
        }
        Ok(witness)
    }

    /// Serialize this witness stack into a `TxWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append the encoded stack to.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_varint(VarInt::from(self.items.len()));
        for item in &self.items {
            writer.write_varint(VarInt::from(item.len()));
            writer.write_bytes(item);
        }
    }

    /// Serialize this witness stack into a new byte vector.
    ///
    /// # Returns
    /// The wire-format bytes of the stack.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = TxWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

impl From<Vec<Vec<u8>>> for TxWitness {
    fn from(items: Vec<Vec<u8>>) -> Self {
        TxWitness { items }
    }
}
