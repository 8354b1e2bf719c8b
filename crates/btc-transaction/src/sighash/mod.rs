//! Signature digest computation.
//!
//! Implements the legacy (pre-segwit) signature hash with its
//! truncation rules, and the BIP143 witness digest with cached
//! prevout/sequence/output sub-hashes. Both digests work on a cloned
//! working copy of the transaction; the caller's transaction is never
//! modified.

use btc_primitives::hash::sha256d;
use btc_primitives::util::{TxWriter, VarInt};

use crate::output::TxOutput;
use crate::script::Script;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign no outputs; anyone can change where the funds go.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign only the output at the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Modifier bit: commit only to the signed input, letting others be added.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask extracting the base sighash type from a flag.
pub const SIGHASH_MASK: u32 = 0x1f;

/// Digest returned for SIGHASH_SINGLE when no output matches the signed
/// input's index. A quirk of the original implementation that signers
/// must reproduce exactly.
const SINGLE_MISSING_OUTPUT_DIGEST: [u8; 32] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Value written for blanked outputs under SIGHASH_SINGLE.
const BLANKED_OUTPUT_VALUE: i64 = -1;

/// The base signature hash mode, with the ANYONECANPAY bit stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SighashBase {
    /// Commit to all outputs.
    All,
    /// Commit to no outputs.
    None,
    /// Commit to the output at the signed input's index.
    Single,
}

/// A decoded sighash flag: base mode plus the ANYONECANPAY modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SighashType {
    /// The base mode.
    pub base: SighashBase,
    /// Whether only the signed input is committed to.
    pub anyone_can_pay: bool,
}

impl SighashType {
    /// Decode a raw sighash flag.
    ///
    /// The base is taken from the low five bits; unrecognized base values
    /// fall back to `All`, matching consensus behavior.
    ///
    /// # Arguments
    /// * `flag` - The raw sighash flag byte as appended to signatures.
    ///
    /// # Returns
    /// The decoded `SighashType`.
    pub fn from_flag(flag: u32) -> Self {
        let base = match flag & SIGHASH_MASK {
            SIGHASH_NONE => SighashBase::None,
            SIGHASH_SINGLE => SighashBase::Single,
            _ => SighashBase::All,
        };
        SighashType {
            base,
            anyone_can_pay: flag & SIGHASH_ANYONECANPAY != 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Legacy digest
// ---------------------------------------------------------------------------

/// Compute the legacy (pre-segwit) signature digest for one input.
///
/// Builds a working copy of the transaction with the truncation rules for
/// the given sighash mode applied, serializes it without witness data,
/// appends the 4-byte flag, and double-SHA-256 hashes the result.
///
/// For SIGHASH_SINGLE with `input_index` beyond the last output, returns
/// the fixed `0x01` sentinel digest instead of hashing anything.
///
/// # Arguments
/// * `tx` - The transaction being signed. Not modified.
/// * `input_index` - Index of the input the signature is for.
/// * `script_code` - The script placed in the signed input's scriptSig
///   slot (normally the previous output's locking script).
/// * `sighash_flag` - The raw sighash flag.
///
/// # Returns
/// The 32-byte digest, or `IndexOutOfRange` if `input_index` does not
/// name an input.
pub fn legacy_digest(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_flag: u32,
) -> Result<[u8; 32], TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::IndexOutOfRange {
            index: input_index,
            len: tx.inputs.len(),
        });
    }

    let sighash = SighashType::from_flag(sighash_flag);

    // The sentinel predates any hashing.
    if sighash.base == SighashBase::Single && input_index >= tx.outputs.len() {
        return Ok(SINGLE_MISSING_OUTPUT_DIGEST);
    }

    let mut work = tx.clone();
    work.has_segwit = false;
    work.witnesses.clear();

    if sighash.anyone_can_pay {
        // Only the signed input survives, carrying the script code.
        let mut signed = work.inputs[input_index].clone();
        signed.script_sig = Script::from_bytes(script_code.to_vec());
        work.inputs = vec![signed];
    } else {
        for (i, input) in work.inputs.iter_mut().enumerate() {
            if i == input_index {
                input.script_sig = Script::from_bytes(script_code.to_vec());
            } else {
                match sighash.base {
                    SighashBase::All => input.script_sig = Script::new(),
                    SighashBase::None => input.sequence = 0,
                    SighashBase::Single => {}
                }
            }
        }
    }

    match sighash.base {
        SighashBase::All => {}
        SighashBase::None => work.outputs.clear(),
        SighashBase::Single => {
            // Outputs before the signed index are blanked; outputs after it
            // are dropped.
            let kept = work.outputs[input_index].clone();
            let mut outputs = Vec::with_capacity(input_index + 1);
            for _ in 0..input_index {
                outputs.push(TxOutput {
                    value: BLANKED_OUTPUT_VALUE,
                    script_pubkey: Script::new(),
                });
            }
            outputs.push(kept);
            work.outputs = outputs;
        }
    }

    let mut preimage = work.to_bytes(false);
    preimage.extend_from_slice(&sighash_flag.to_le_bytes());
    Ok(sha256d(&preimage))
}

// ---------------------------------------------------------------------------
// BIP143 witness digest
// ---------------------------------------------------------------------------

/// Cached sub-hashes for computing BIP143 digests over one transaction.
///
/// When signing several inputs of the same transaction, hashPrevouts,
/// hashSequence, and hashOutputs are each computed at most once and
/// reused for every input.
pub struct SegwitSighashCache<'a> {
    tx: &'a Transaction,
    hash_prevouts: Option<[u8; 32]>,
    hash_sequences: Option<[u8; 32]>,
    hash_outputs_all: Option<[u8; 32]>,
}

impl<'a> SegwitSighashCache<'a> {
    /// Create a cache over the given transaction.
    ///
    /// No hashing happens until a digest or preimage is requested.
    ///
    /// # Arguments
    /// * `tx` - The transaction to compute digests for.
    ///
    /// # Returns
    /// An empty cache borrowing the transaction.
    pub fn new(tx: &'a Transaction) -> Self {
        SegwitSighashCache {
            tx,
            hash_prevouts: None,
            hash_sequences: None,
            hash_outputs_all: None,
        }
    }

    /// Double SHA-256 of all input outpoints, concatenated.
    fn hash_prevouts(&mut self) -> [u8; 32] {
        if let Some(h) = self.hash_prevouts {
            return h;
        }
        let mut writer = TxWriter::with_capacity(self.tx.inputs.len() * 36);
        for input in &self.tx.inputs {
            writer.write_bytes(&input.prev_txid);
            writer.write_u32_le(input.prev_index);
        }
        let h = sha256d(writer.as_bytes());
        self.hash_prevouts = Some(h);
        h
    }

    /// Double SHA-256 of all input sequence numbers, concatenated.
    fn hash_sequences(&mut self) -> [u8; 32] {
        if let Some(h) = self.hash_sequences {
            return h;
        }
        let mut writer = TxWriter::with_capacity(self.tx.inputs.len() * 4);
        for input in &self.tx.inputs {
            writer.write_u32_le(input.sequence);
        }
        let h = sha256d(writer.as_bytes());
        self.hash_sequences = Some(h);
        h
    }

    /// Double SHA-256 of all serialized outputs, concatenated.
    fn hash_outputs_all(&mut self) -> [u8; 32] {
        if let Some(h) = self.hash_outputs_all {
            return h;
        }
        let mut writer = TxWriter::new();
        for output in &self.tx.outputs {
            output.write_to(&mut writer);
        }
        let h = sha256d(writer.as_bytes());
        self.hash_outputs_all = Some(h);
        h
    }

    /// Build the BIP143 preimage for one input.
    ///
    /// The preimage layout is fixed: version, hashPrevouts, hashSequence,
    /// the signed input's outpoint, the varint-prefixed script code, the
    /// spent amount, the input's sequence, hashOutputs, lock time, and
    /// the sighash flag. Sub-hashes are zeroed according to the mode:
    /// hashPrevouts under ANYONECANPAY, hashSequence under ANYONECANPAY,
    /// NONE, or SINGLE, and hashOutputs under NONE or under SINGLE with
    /// no matching output.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input the signature is for.
    /// * `script_code` - The script code of the output being spent.
    /// * `amount` - Value in satoshis of the output being spent.
    /// * `sighash_flag` - The raw sighash flag.
    ///
    /// # Returns
    /// The preimage bytes, or `IndexOutOfRange` if `input_index` does not
    /// name an input.
    pub fn preimage(
        &mut self,
        input_index: usize,
        script_code: &[u8],
        amount: i64,
        sighash_flag: u32,
    ) -> Result<Vec<u8>, TransactionError> {
        if input_index >= self.tx.inputs.len() {
            return Err(TransactionError::IndexOutOfRange {
                index: input_index,
                len: self.tx.inputs.len(),
            });
        }

        let sighash = SighashType::from_flag(sighash_flag);
        let zero = [0u8; 32];

        let hash_prevouts = if sighash.anyone_can_pay {
            zero
        } else {
            self.hash_prevouts()
        };

        let commit_sequences = !sighash.anyone_can_pay
            && sighash.base != SighashBase::Single
            && sighash.base != SighashBase::None;
        let hash_sequences = if commit_sequences {
            self.hash_sequences()
        } else {
            zero
        };

        let hash_outputs = match sighash.base {
            SighashBase::All => self.hash_outputs_all(),
            SighashBase::None => zero,
            SighashBase::Single => match self.tx.outputs.get(input_index) {
                Some(output) => sha256d(&output.to_bytes()),
                None => zero,
            },
        };

        let input = &self.tx.inputs[input_index];
        let mut writer = TxWriter::with_capacity(156 + script_code.len());
        writer.write_u32_le(self.tx.version);
        writer.write_bytes(&hash_prevouts);
        writer.write_bytes(&hash_sequences);
        writer.write_bytes(&input.prev_txid);
        writer.write_u32_le(input.prev_index);
        writer.write_varint(VarInt::from(script_code.len()));
        writer.write_bytes(script_code);
        writer.write_i64_le(amount);
        writer.write_u32_le(input.sequence);
        writer.write_bytes(&hash_outputs);
        writer.write_u32_le(self.tx.lock_time);
        writer.write_u32_le(sighash_flag);
        Ok(writer.into_bytes())
    }

    /// Compute the BIP143 digest for one input.
    ///
    /// Double SHA-256 of the preimage built by [`Self::preimage`].
    ///
    /// # Arguments
    /// * `input_index` - Index of the input the signature is for.
    /// * `script_code` - The script code of the output being spent.
    /// * `amount` - Value in satoshis of the output being spent.
    /// * `sighash_flag` - The raw sighash flag.
    ///
    /// # Returns
    /// The 32-byte digest, or `IndexOutOfRange` if `input_index` does not
    /// name an input.
    pub fn digest(
        &mut self,
        input_index: usize,
        script_code: &[u8],
        amount: i64,
        sighash_flag: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let preimage = self.preimage(input_index, script_code, amount, sighash_flag)?;
        Ok(sha256d(&preimage))
    }
}

/// Build the BIP143 preimage for one input without an explicit cache.
///
/// Convenience wrapper over [`SegwitSighashCache`] for single-input use;
/// when signing multiple inputs, construct the cache once instead.
///
/// # Arguments
/// * `tx` - The transaction being signed. Not modified.
/// * `input_index` - Index of the input the signature is for.
/// * `script_code` - The script code of the output being spent.
/// * `amount` - Value in satoshis of the output being spent.
/// * `sighash_flag` - The raw sighash flag.
///
/// # Returns
/// The preimage bytes, or `IndexOutOfRange` for a bad input index.
pub fn segwit_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    amount: i64,
    sighash_flag: u32,
) -> Result<Vec<u8>, TransactionError> {
    SegwitSighashCache::new(tx).preimage(input_index, script_code, amount, sighash_flag)
}

/// Compute the BIP143 digest for one input without an explicit cache.
///
/// # Arguments
/// * `tx` - The transaction being signed. Not modified.
/// * `input_index` - Index of the input the signature is for.
/// * `script_code` - The script code of the output being spent.
/// * `amount` - Value in satoshis of the output being spent.
/// * `sighash_flag` - The raw sighash flag.
///
/// # Returns
/// The 32-byte digest, or `IndexOutOfRange` for a bad input index.
pub fn segwit_digest(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    amount: i64,
    sighash_flag: u32,
) -> Result<[u8; 32], TransactionError> {
    SegwitSighashCache::new(tx).digest(input_index, script_code, amount, sighash_flag)
}
