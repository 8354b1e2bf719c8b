//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, scriptSig, and
//! sequence number. Provides binary serialization/deserialization
//! following the Bitcoin wire format.

use btc_primitives::chainhash::Hash;
use btc_primitives::util::{TxReader, TxWriter, VarInt};

use crate::error::read_err;
use crate::script::Script;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction ID (`prev_txid`) and output index (`prev_index`). The
/// `script_sig` supplies the data required to satisfy the referenced
/// output's locking script; for segwit spends it stays empty and the
/// unlocking data lives in the transaction's witness section instead.
///
/// # Wire format
///
/// | Field        | Size          |
/// |--------------|---------------|
/// | prev_txid    | 32 bytes (LE) |
/// | prev_index   | 4 bytes (LE)  |
/// | script length| VarInt        |
/// | script_sig   | variable      |
/// | sequence     | 4 bytes (LE)  |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub prev_txid: [u8; 32],

    /// Index of the output within the previous transaction.
    pub prev_index: u32,

    /// The unlocking script (scriptSig). Empty when unsigned or when the
    /// input is spent via witness data.
    pub script_sig: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,
}

impl TxInput {
    /// Create a new input from a display-order txid hex string.
    ///
    /// The hex string is byte-reversed into internal order for storage.
    /// The scriptSig starts empty and the sequence is finalized.
    ///
    /// # Arguments
    /// * `prev_txid_hex` - Previous transaction ID in display (reversed) hex.
    /// * `prev_index` - Index of the output being spent.
    ///
    /// # Returns
    /// `Ok(TxInput)` on success, or an error for invalid hex.
    pub fn new(prev_txid_hex: &str, prev_index: u32) -> Result<Self, TransactionError> {
        let hash = Hash::from_hex(prev_txid_hex)?;
        Ok(TxInput {
            prev_txid: hash.to_array(),
            prev_index,
            script_sig: Script::new(),
            sequence: DEFAULT_SEQUENCE,
        })
    }

    /// Create a new input from a raw outpoint in internal byte order.
    ///
    /// # Arguments
    /// * `prev_txid` - Previous transaction ID, internal (wire) order.
    /// * `prev_index` - Index of the output being spent.
    ///
    /// # Returns
    /// A `TxInput` with an empty scriptSig and finalized sequence.
    pub fn from_outpoint(prev_txid: [u8; 32], prev_index: u32) -> Self {
        TxInput {
            prev_txid,
            prev_index,
            script_sig: Script::new(),
            sequence: DEFAULT_SEQUENCE,
        }
    }

    /// Return the previous txid as display-order hex.
    ///
    /// # Returns
    /// The byte-reversed hex string of `prev_txid`.
    pub fn prev_txid_hex(&self) -> String {
        Hash::new(self.prev_txid).to_string()
    }

    /// Deserialize a `TxInput` from a `TxReader`.
    ///
    /// Reads the standard wire format: 32-byte txid, 4-byte output index,
    /// varint-prefixed scriptSig, and 4-byte sequence number.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TxInput)` on success, or a `TransactionError` if the data is
    /// truncated or malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(read_err("prev txid"))?;
        let mut prev_txid = [0u8; 32];
        prev_txid.copy_from_slice(txid_bytes);

        let prev_index = reader.read_u32_le().map_err(read_err("prev index"))?;

        let script_len = reader.read_varint().map_err(read_err("scriptSig length"))?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(read_err("scriptSig"))?;

        let sequence = reader.read_u32_le().map_err(read_err("sequence"))?;

        Ok(TxInput {
            prev_txid,
            prev_index,
            script_sig: Script::from_bytes(script_bytes.to_vec()),
            sequence,
        })
    }

    /// Serialize this input into a `TxWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append the encoded input to.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_bytes(&self.prev_txid);
        writer.write_u32_le(self.prev_index);
        writer.write_varint(VarInt::from(self.script_sig.len()));
        writer.write_bytes(self.script_sig.as_bytes());
        writer.write_u32_le(self.sequence);
    }

    /// Serialize this input into a new byte vector.
    ///
    /// # Returns
    /// The wire-format bytes of the input.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = TxWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
