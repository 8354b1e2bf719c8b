//! Opaque script byte container.
//!
//! Scripts are carried through serialization and digest computation as raw
//! bytes. No opcode-level parsing or execution happens here.

use std::fmt;

use crate::TransactionError;

/// A script as an opaque byte sequence.
///
/// Used for both scriptSig (unlocking) and scriptPubKey (locking) fields.
/// On the wire a script is always preceded by a VarInt length prefix, which
/// callers write separately.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create an empty script.
    ///
    /// # Returns
    /// A `Script` with no bytes.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - The script bytes, taken as-is.
    ///
    /// # Returns
    /// A `Script` owning the bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    /// Create a script from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex-encoded script bytes.
    ///
    /// # Returns
    /// `Ok(Script)` on success, or an error for invalid hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid script hex: {}", e)))?;
        Ok(Script(bytes))
    }

    /// Access the script bytes.
    ///
    /// # Returns
    /// A byte slice of the script contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return the underlying bytes.
    ///
    /// # Returns
    /// The script bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Encode the script bytes as a hex string.
    ///
    /// # Returns
    /// Lowercase hex of the script contents.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return the script length in bytes.
    ///
    /// # Returns
    /// The byte count.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the script is empty.
    ///
    /// # Returns
    /// `true` if the script holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }
}
