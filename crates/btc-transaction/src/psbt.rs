//! Minimal PSBT model: finalized-field storage and network transaction
//! extraction.
//!
//! Holds an unsigned skeleton transaction plus one record per input
//! carrying the finalized scriptSig and/or witness blob. Extraction
//! assembles the broadcast-ready transaction from those fields.

use crate::script::Script;
use crate::transaction::Transaction;
use crate::witness::TxWitness;
use crate::{TransactionError, TxInput};

/// Finalized signing data for one PSBT input.
///
/// An input is finalized once it carries a final scriptSig, a final
/// witness, or both (nested segwit spends use both).
#[derive(Clone, Debug, Default)]
pub struct PsbtInput {
    /// The finalized scriptSig, if any.
    pub final_script_sig: Option<Script>,

    /// The finalized witness as a raw encoded stack, if any.
    pub final_script_witness: Option<Vec<u8>>,
}

impl PsbtInput {
    /// Create an empty (unfinalized) input record.
    ///
    /// # Returns
    /// A `PsbtInput` with neither field set.
    pub fn new() -> Self {
        PsbtInput::default()
    }

    /// Check whether this input carries any finalized data.
    ///
    /// # Returns
    /// `true` if a final scriptSig or final witness is present.
    pub fn is_finalized(&self) -> bool {
        self.final_script_sig.is_some() || self.final_script_witness.is_some()
    }
}

/// A partially signed transaction.
///
/// Pairs the unsigned skeleton with per-input finalization records. The
/// record list always has exactly one entry per skeleton input.
#[derive(Clone, Debug)]
pub struct Psbt {
    /// The unsigned transaction. Its inputs carry empty scriptSigs.
    pub unsigned_tx: Transaction,

    /// One finalization record per input.
    pub inputs: Vec<PsbtInput>,
}

impl Psbt {
    /// Create a PSBT from an unsigned transaction.
    ///
    /// One empty input record is created per transaction input.
    ///
    /// # Arguments
    /// * `unsigned_tx` - The skeleton transaction.
    ///
    /// # Returns
    /// A `Psbt` with all inputs unfinalized.
    pub fn from_unsigned_tx(unsigned_tx: Transaction) -> Self {
        let inputs = unsigned_tx.inputs.iter().map(|_| PsbtInput::new()).collect();
        Psbt {
            unsigned_tx,
            inputs,
        }
    }

    /// Set the finalized scriptSig for the input at `index`.
    ///
    /// # Arguments
    /// * `index` - The input position.
    /// * `script_sig` - The finalized unlocking script.
    ///
    /// # Returns
    /// `Ok(())`, or `IndexOutOfRange` if `index` is invalid.
    pub fn set_final_script_sig(
        &mut self,
        index: usize,
        script_sig: Script,
    ) -> Result<(), TransactionError> {
        match self.inputs.get_mut(index) {
            Some(record) => {
                record.final_script_sig = Some(script_sig);
                Ok(())
            }
            None => Err(TransactionError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            }),
        }
    }

    /// Set the finalized witness blob for the input at `index`.
    ///
    /// # Arguments
    /// * `index` - The input position.
    /// * `witness` - The encoded witness stack (item count plus items).
    ///
    /// # Returns
    /// `Ok(())`, or `IndexOutOfRange` if `index` is invalid.
    pub fn set_final_script_witness(
        &mut self,
        index: usize,
        witness: Vec<u8>,
    ) -> Result<(), TransactionError> {
        match self.inputs.get_mut(index) {
            Some(record) => {
                record.final_script_witness = Some(witness);
                Ok(())
            }
            None => Err(TransactionError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            }),
        }
    }

    /// Assemble the broadcast-ready transaction from the finalized fields.
    ///
    /// Every input record must be finalized. The extracted transaction
    /// copies the skeleton's version, lock time, and outputs; each input
    /// is rebuilt from the skeleton's outpoint and sequence with the final
    /// scriptSig (or an empty script) installed. If any input carries a
    /// non-empty witness blob the result is segwit, with empty stacks for
    /// inputs that have none.
    ///
    /// # Returns
    /// The extracted `Transaction`, or `NotFinalized` naming the first
    /// input with no finalized data.
    pub fn extract_transaction(&self) -> Result<Transaction, TransactionError> {
        for (i, record) in self.inputs.iter().enumerate() {
            if !record.is_finalized() {
                return Err(TransactionError::NotFinalized(i));
            }
        }

        let has_segwit = self
            .inputs
            .iter()
            .any(|r| matches!(&r.final_script_witness, Some(w) if !w.is_empty()));

        let mut tx = Transaction {
            version: self.unsigned_tx.version,
            inputs: Vec::with_capacity(self.unsigned_tx.inputs.len()),
            outputs: self.unsigned_tx.outputs.clone(),
            witnesses: Vec::new(),
            lock_time: self.unsigned_tx.lock_time,
            has_segwit,
        };

        for (skeleton, record) in self.unsigned_tx.inputs.iter().zip(&self.inputs) {
            let script_sig = record.final_script_sig.clone().unwrap_or_default();
            tx.inputs.push(TxInput {
                prev_txid: skeleton.prev_txid,
                prev_index: skeleton.prev_index,
                script_sig,
                sequence: skeleton.sequence,
            });

            if has_segwit {
                let witness = match &record.final_script_witness {
                    Some(blob) if !blob.is_empty() => TxWitness::from_bytes(blob)?,
                    _ => TxWitness::new(),
                };
                tx.witnesses.push(witness);
            }
        }

        Ok(tx)
    }
}
