use btc_primitives::PrimitivesError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// An input or output index is out of range for the transaction.
    #[error("index {index} out of range: transaction has {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    /// The byte stream ended before a complete structure was read.
    #[error("truncated input: {0}")]
    TruncatedInput(String),
    /// A VarInt length prefix promised more bytes than the buffer holds.
    #[error("malformed varint: {0}")]
    MalformedVarInt(String),
    /// A PSBT input carries neither a final scriptSig nor a final witness.
    #[error("input {0} is not finalized")]
    NotFinalized(usize),
    /// A relative lock time value is outside the encodable range.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// An underlying primitives error (forwarded from `btc-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

/// Map a primitives read failure into a transaction error with field context.
///
/// EOF becomes `TruncatedInput` and short varints become `MalformedVarInt`
/// so callers can tell a cut-off buffer from a lying length prefix.
pub(crate) fn read_err(field: &'static str) -> impl FnOnce(PrimitivesError) -> TransactionError {
    move |e| match e {
        PrimitivesError::UnexpectedEof => {
            TransactionError::TruncatedInput(format!("reading {}: {}", field, e))
        }
        PrimitivesError::MalformedVarInt { .. } => {
            TransactionError::MalformedVarInt(format!("reading {}: {}", field, e))
        }
        other => TransactionError::SerializationError(format!("reading {}: {}", field, other)),
    }
}
