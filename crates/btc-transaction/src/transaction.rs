//! The Transaction type: model, mutators, and wire serialization.
//!
//! A transaction holds a version, inputs, outputs, per-input witness
//! stacks, and a lock time. Serialization supports both the legacy
//! format and the extended segwit format with the `0x00 0x01`
//! marker+flag pair.

use std::fmt;

use btc_primitives::chainhash::Hash;
use btc_primitives::hash::sha256d;
use btc_primitives::util::{TxReader, TxWriter, VarInt};

use crate::error::read_err;
use crate::input::TxInput;
use crate::output::TxOutput;
use crate::witness::TxWitness;
use crate::TransactionError;

/// Default transaction version.
pub const DEFAULT_TX_VERSION: u32 = 2;

/// Default lock time (no time lock).
pub const DEFAULT_LOCKTIME: u32 = 0;

/// Segwit marker byte (zero input count in the legacy reading).
const SEGWIT_MARKER: u8 = 0x00;

/// Segwit flag byte.
const SEGWIT_FLAG: u8 = 0x01;

/// A transaction with optional segwit witness data.
///
/// The witness list is kept positionally aligned with the input list:
/// when `has_segwit` is set, `witnesses[i]` is the stack for `inputs[i]`,
/// with empty stacks standing in for inputs that have no witness data.
///
/// # Wire format (segwit)
///
/// | Field       | Size                        |
/// |-------------|-----------------------------|
/// | version     | 4 bytes (LE)                |
/// | marker+flag | 2 bytes (`0x00 0x01`)       |
/// | input count | VarInt                      |
/// | inputs      | variable                    |
/// | output count| VarInt                      |
/// | outputs     | variable                    |
/// | witnesses   | one stack per input         |
/// | lock_time   | 4 bytes (LE)                |
///
/// The legacy format omits marker+flag and the witness section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction version.
    pub version: u32,

    /// The transaction inputs.
    pub inputs: Vec<TxInput>,

    /// The transaction outputs.
    pub outputs: Vec<TxOutput>,

    /// Per-input witness stacks. Meaningful only when `has_segwit` is set;
    /// kept positionally aligned with `inputs`.
    pub witnesses: Vec<TxWitness>,

    /// Lock time: block height or timestamp before which the transaction
    /// is not final.
    pub lock_time: u32,

    /// Whether this transaction carries segwit witness data.
    pub has_segwit: bool,
}

impl Transaction {
    /// Create a new empty transaction with default version and lock time.
    ///
    /// # Returns
    /// A legacy (non-segwit) `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: DEFAULT_TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            witnesses: Vec::new(),
            lock_time: DEFAULT_LOCKTIME,
            has_segwit: false,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Deserialize a transaction from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex-encoded transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or an error for invalid hex or
    /// malformed transaction data.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid transaction hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserialize a transaction from bytes.
    ///
    /// The buffer must contain exactly one transaction; trailing bytes
    /// are rejected.
    ///
    /// # Arguments
    /// * `bytes` - The wire-format transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated, malformed, or over-long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = TxReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(TransactionError::SerializationError(format!(
                "{} trailing bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `TxReader`.
    ///
    /// Detects the segwit format by peeking for the `0x00 0x01` marker+flag
    /// pair after the version field. The pair is consumed only when both
    /// bytes match; a lone `0x00` is read as a zero input count.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated or malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(read_err("version"))?;

        // Probe for the segwit marker+flag without committing the cursor.
        let mut has_segwit = false;
        if let Some(pair) = reader.peek_bytes(2) {
            if pair[0] == SEGWIT_MARKER && pair[1] == SEGWIT_FLAG {
                reader.skip(2).map_err(read_err("segwit marker"))?;
                has_segwit = true;
            }
        }

        let input_count = reader.read_varint().map_err(read_err("input count"))?;
        let mut inputs = Vec::with_capacity(input_count.value() as usize);
        for _ in 0..input_count.value() {
            inputs.push(TxInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(read_err("output count"))?;
        let mut outputs = Vec::with_capacity(output_count.value() as usize);
        for _ in 0..output_count.value() {
            outputs.push(TxOutput::read_from(reader)?);
        }

        let mut witnesses = Vec::new();
        if has_segwit {
            witnesses.reserve(inputs.len());
            for _ in 0..inputs.len() {
                witnesses.push(TxWitness::read_from(reader)?);
            }
        }

        let lock_time = reader.read_u32_le().map_err(read_err("lock time"))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            witnesses,
            lock_time,
            has_segwit,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction into a new byte vector.
    ///
    /// When `include_witness` is false, or when the transaction has no
    /// non-empty witness stack, the legacy format is emitted. This is the
    /// form hashed for the txid and for legacy signature digests.
    ///
    /// A coinbase-shaped transaction (a single input spending the all-zero
    /// txid) always serializes with version 1, regardless of the version
    /// stored in the model.
    ///
    /// # Arguments
    /// * `include_witness` - Whether to emit the segwit extended format.
    ///
    /// # Returns
    /// The wire-format bytes of the transaction.
    pub fn to_bytes(&self, include_witness: bool) -> Vec<u8> {
        let mut writer = TxWriter::with_capacity(self.size_hint());

        let version = if self.is_coinbase_shaped() {
            1
        } else {
            self.version
        };
        writer.write_u32_le(version);

        let write_witness = include_witness
            && self.has_segwit
            && self.witnesses.iter().any(|w| !w.is_empty());
        if write_witness {
            writer.write_u8(SEGWIT_MARKER);
            writer.write_u8(SEGWIT_FLAG);
        }

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        if write_witness {
            // Exactly one stack per input; inputs without witness data get
            // an empty stack.
            for i in 0..self.inputs.len() {
                match self.witnesses.get(i) {
                    Some(w) => w.write_to(&mut writer),
                    None => TxWitness::new().write_to(&mut writer),
                }
            }
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize this transaction to a hex string.
    ///
    /// # Arguments
    /// * `include_witness` - Whether to emit the segwit extended format.
    ///
    /// # Returns
    /// Lowercase hex of the serialized transaction.
    pub fn to_hex(&self, include_witness: bool) -> String {
        hex::encode(self.to_bytes(include_witness))
    }

    // -----------------------------------------------------------------
    // Identification
    // -----------------------------------------------------------------

    /// Compute the transaction ID.
    ///
    /// The txid is the double SHA-256 of the legacy serialization,
    /// excluding all witness data. Returned in internal (little-endian)
    /// byte order.
    ///
    /// # Returns
    /// The 32-byte txid.
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&self.to_bytes(false))
    }

    /// Return the transaction ID as display-order hex.
    ///
    /// # Returns
    /// A 64-character hex string, byte-reversed from the internal order.
    pub fn txid_hex(&self) -> String {
        Hash::new(self.txid()).to_string()
    }

    /// Compute the witness transaction ID.
    ///
    /// The wtxid hashes the full segwit serialization. For a transaction
    /// without witness data it equals the txid.
    ///
    /// # Returns
    /// The 32-byte wtxid in internal byte order.
    pub fn wtxid(&self) -> [u8; 32] {
        sha256d(&self.to_bytes(true))
    }

    /// Return the witness transaction ID as display-order hex.
    ///
    /// # Returns
    /// A 64-character hex string, byte-reversed from the internal order.
    pub fn wtxid_hex(&self) -> String {
        Hash::new(self.wtxid()).to_string()
    }

    // -----------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------

    /// Append an input to this transaction.
    ///
    /// For a segwit transaction an empty witness stack is pushed alongside
    /// to keep the witness list aligned with the input list.
    ///
    /// # Arguments
    /// * `input` - The input to add.
    pub fn add_input(&mut self, input: TxInput) {
        self.inputs.push(input);
        if self.has_segwit {
            self.witnesses.push(TxWitness::new());
        }
    }

    /// Remove the input at `index`, along with its witness stack.
    ///
    /// # Arguments
    /// * `index` - Position of the input to remove.
    ///
    /// # Returns
    /// The removed input, or `IndexOutOfRange` if `index` is invalid.
    pub fn remove_input(&mut self, index: usize) -> Result<TxInput, TransactionError> {
        if index >= self.inputs.len() {
            return Err(TransactionError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            });
        }
        if index < self.witnesses.len() {
            self.witnesses.remove(index);
        }
        Ok(self.inputs.remove(index))
    }

    /// Replace the input at `index`.
    ///
    /// The input's existing witness stack is left untouched.
    ///
    /// # Arguments
    /// * `index` - Position of the input to replace.
    /// * `input` - The new input.
    ///
    /// # Returns
    /// `Ok(())`, or `IndexOutOfRange` if `index` is invalid.
    pub fn update_input(&mut self, index: usize, input: TxInput) -> Result<(), TransactionError> {
        match self.inputs.get_mut(index) {
            Some(slot) => {
                *slot = input;
                Ok(())
            }
            None => Err(TransactionError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            }),
        }
    }

    /// Return the number of inputs in the transaction.
    ///
    /// # Returns
    /// The input count.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    // -----------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------

    /// Append an output to this transaction.
    ///
    /// # Arguments
    /// * `output` - The output to add.
    pub fn add_output(&mut self, output: TxOutput) {
        self.outputs.push(output);
    }

    /// Remove the output at `index`.
    ///
    /// # Arguments
    /// * `index` - Position of the output to remove.
    ///
    /// # Returns
    /// The removed output, or `IndexOutOfRange` if `index` is invalid.
    pub fn remove_output(&mut self, index: usize) -> Result<TxOutput, TransactionError> {
        if index >= self.outputs.len() {
            return Err(TransactionError::IndexOutOfRange {
                index,
                len: self.outputs.len(),
            });
        }
        Ok(self.outputs.remove(index))
    }

    /// Replace the output at `index`.
    ///
    /// # Arguments
    /// * `index` - Position of the output to replace.
    /// * `output` - The new output.
    ///
    /// # Returns
    /// `Ok(())`, or `IndexOutOfRange` if `index` is invalid.
    pub fn update_output(&mut self, index: usize, output: TxOutput) -> Result<(), TransactionError> {
        match self.outputs.get_mut(index) {
            Some(slot) => {
                *slot = output;
                Ok(())
            }
            None => Err(TransactionError::IndexOutOfRange {
                index,
                len: self.outputs.len(),
            }),
        }
    }

    /// Return the number of outputs in the transaction.
    ///
    /// # Returns
    /// The output count.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Compute the sum of all output values in satoshis.
    ///
    /// # Returns
    /// The total satoshis across all outputs.
    pub fn total_output_value(&self) -> i64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    // -----------------------------------------------------------------
    // Witnesses
    // -----------------------------------------------------------------

    /// Switch the transaction between segwit and legacy form.
    ///
    /// Enabling segwit backfills empty witness stacks so every input has
    /// one; disabling segwit drops all witness data.
    ///
    /// # Arguments
    /// * `segwit` - Whether the transaction should carry witness data.
    pub fn set_segwit(&mut self, segwit: bool) {
        self.has_segwit = segwit;
        if segwit {
            while self.witnesses.len() < self.inputs.len() {
                self.witnesses.push(TxWitness::new());
            }
        } else {
            self.witnesses.clear();
        }
    }

    /// Set the witness stack for the input at `index`.
    ///
    /// Marks the transaction as segwit and backfills empty stacks for any
    /// preceding inputs that lack one.
    ///
    /// # Arguments
    /// * `index` - Position of the input the stack belongs to.
    /// * `witness` - The witness stack.
    ///
    /// # Returns
    /// `Ok(())`, or `IndexOutOfRange` if `index` is not a valid input index.
    pub fn set_witness(&mut self, index: usize, witness: TxWitness) -> Result<(), TransactionError> {
        if index >= self.inputs.len() {
            return Err(TransactionError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            });
        }
        self.has_segwit = true;
        while self.witnesses.len() < self.inputs.len() {
            self.witnesses.push(TxWitness::new());
        }
        self.witnesses[index] = witness;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Coinbase detection
    // -----------------------------------------------------------------

    /// Determine whether this transaction has the shape of a coinbase.
    ///
    /// A coinbase-shaped transaction has exactly one input whose previous
    /// txid is all zeros. Such transactions always serialize with
    /// version 1.
    ///
    /// # Returns
    /// `true` if this transaction is coinbase-shaped.
    pub fn is_coinbase_shaped(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prev_txid == [0u8; 32]
    }

    // -----------------------------------------------------------------
    // Size
    // -----------------------------------------------------------------

    /// Return the full serialized size of this transaction in bytes,
    /// including witness data.
    ///
    /// # Returns
    /// The byte length of the segwit serialization.
    pub fn size(&self) -> usize {
        self.to_bytes(true).len()
    }

    /// Rough pre-allocation estimate for the serialization buffer.
    fn size_hint(&self) -> usize {
        let inputs: usize = self.inputs.iter().map(|i| 41 + i.script_sig.len()).sum();
        let outputs: usize = self.outputs.iter().map(|o| 9 + o.script_pubkey.len()).sum();
        let witnesses: usize = self
            .witnesses
            .iter()
            .map(|w| 1 + w.items.iter().map(|it| 1 + it.len()).sum::<usize>())
            .sum();
        10 + inputs + outputs + witnesses
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Display the transaction as its full hex serialization.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex(true))
    }
}
