/// BTC transaction SDK - Transaction model, serialization, and signature digests.
///
/// Provides the Transaction type with inputs, outputs, and witnesses,
/// binary/hex serialization with segwit support, legacy and BIP143
/// signature-hash computation, and PSBT finalization.

pub mod transaction;
pub mod input;
pub mod output;
pub mod witness;
pub mod script;
pub mod sighash;
pub mod sequence;
pub mod psbt;

mod error;
pub use error::TransactionError;
pub use input::TxInput;
pub use output::TxOutput;
pub use psbt::{Psbt, PsbtInput};
pub use script::Script;
pub use sequence::Sequence;
pub use transaction::Transaction;
pub use witness::TxWitness;
