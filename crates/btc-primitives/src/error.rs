/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, hex decoding, and wire-format reads.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("malformed varint: buffer holds {got} bytes, prefix requires {need}")]
    MalformedVarInt { need: usize, got: usize },

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("{0}")]
    Other(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
