//! Transaction output carrying an amount and a locking script.

use btc_primitives::util::{TxReader, TxWriter, VarInt};

use crate::error::read_err;
use crate::script::Script;
use crate::TransactionError;

/// A single output in a transaction.
///
/// Holds the amount in satoshis and the locking script (scriptPubKey)
/// that must be satisfied to spend it. The amount is a signed 64-bit
/// integer on the wire; the legacy digest for SIGHASH_SINGLE uses the
/// sentinel value -1 for blanked outputs.
///
/// # Wire format
///
/// | Field          | Size         |
/// |----------------|--------------|
/// | value          | 8 bytes (LE) |
/// | script length  | VarInt       |
/// | script_pubkey  | variable     |
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TxOutput {
    /// Amount in satoshis.
    pub value: i64,

    /// The locking script (scriptPubKey).
    pub script_pubkey: Script,
}

impl TxOutput {
    /// Create a new output.
    ///
    /// # Arguments
    /// * `value` - Amount in satoshis.
    /// * `script_pubkey` - The locking script.
    ///
    /// # Returns
    /// A new `TxOutput`.
    pub fn new(value: i64, script_pubkey: Script) -> Self {
        TxOutput {
            value,
            script_pubkey,
        }
    }

    /// Deserialize a `TxOutput` from a `TxReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded output.
    ///
    /// # Returns
    /// `Ok(TxOutput)` on success, or a `TransactionError` if the data is
    /// truncated or malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let value = reader.read_i64_le().map_err(read_err("output value"))?;

        let script_len = reader.read_varint().map_err(read_err("scriptPubKey length"))?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(read_err("scriptPubKey"))?;

        Ok(TxOutput {
            value,
            script_pubkey: Script::from_bytes(script_bytes.to_vec()),
        })
    }

    /// Serialize this output into a `TxWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append the encoded output to.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_i64_le(self.value);
        writer.write_varint(VarInt::from(self.script_pubkey.len()));
        writer.write_bytes(self.script_pubkey.as_bytes());
    }

    /// Serialize this output into a new byte vector.
    ///
    /// # Returns
    /// The wire-format bytes of the output.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = TxWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
