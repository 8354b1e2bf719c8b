//! Chain hash type for transaction identification.
//!
//! Provides a `Hash` type — a 32-byte array displayed as byte-reversed hex,
//! matching the convention for transaction IDs: little-endian internal
//! (wire) order, big-endian display order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length for a Hash (64 hex characters).
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction IDs.
///
/// When displayed as a string, the bytes are reversed relative to the wire
/// order used in serialization and digest computation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Create a Hash from a raw 32-byte array.
    ///
    /// The bytes are stored as-is (internal/wire byte order).
    ///
    /// # Arguments
    /// * `bytes` - The 32 bytes in internal (little-endian) order.
    ///
    /// # Returns
    /// A new `Hash`.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Create a Hash from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != HASH_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                bytes.len(),
                HASH_SIZE
            )));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Hash(arr))
    }

    /// Create a Hash from a byte-reversed hex string.
    ///
    /// The hex string represents bytes in display order (reversed from
    /// internal storage). Short strings are zero-padded on the high end.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of up to 64 characters.
    ///
    /// # Returns
    /// `Ok(Hash)` on success, or an error for invalid input.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Ok(Hash::default());
        }
        if hex_str.len() > MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "max hash string length is {} bytes",
                MAX_HASH_STRING_SIZE
            )));
        }

        // Pad to even length if needed.
        let padded = if hex_str.len() % 2 != 0 {
            format!("0{}", hex_str)
        } else {
            hex_str.to_string()
        };

        // Decode hex into a temporary buffer, right-aligned in a 32-byte array.
        let decoded = hex::decode(&padded)?;
        let mut display_order = [0u8; HASH_SIZE];
        let offset = HASH_SIZE - decoded.len();
        display_order[offset..].copy_from_slice(&decoded);

        // Reverse to get internal byte order.
        let mut dst = [0u8; HASH_SIZE];
        for i in 0..HASH_SIZE {
            dst[i] = display_order[HASH_SIZE - 1 - i];
        }

        Ok(Hash(dst))
    }

    /// Access the internal byte array as a reference.
    ///
    /// # Returns
    /// A reference to the 32-byte internal array.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Consume the Hash and return the internal byte array.
    ///
    /// # Returns
    /// The 32 bytes in internal (wire) order.
    pub fn to_array(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Check whether every byte is zero.
    ///
    /// The all-zero hash marks the coinbase prevout.
    ///
    /// # Returns
    /// `true` if all 32 bytes are zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_SIZE]
    }
}

/// Display the hash as byte-reversed hex.
///
/// Internal bytes `[0x06, 0xe5, ...]` display as `"...e506"`.
impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

/// Parse a byte-reversed hex string into a Hash.
///
/// Equivalent to `Hash::from_hex`.
impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

/// Serialize as a hex string in JSON.
impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Deserialize from a hex string in JSON.
impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute double SHA-256 of the input and return the result as a Hash.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A `Hash` containing the double SHA-256 digest in internal order.
pub fn double_hash_h(data: &[u8]) -> Hash {
    Hash(sha256d(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_display_is_reversed() {
        // Block 100000 hash in internal byte order.
        let hash = Hash::new([
            0x06, 0xe5, 0x33, 0xfd, 0x1a, 0xda, 0x86, 0x39,
            0x1f, 0x3f, 0x6c, 0x34, 0x32, 0x04, 0xb0, 0xd2,
            0x78, 0xd4, 0xaa, 0xec, 0x1c, 0x0b, 0x20, 0xaa,
            0x27, 0xba, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
        assert_eq!(
            hash.to_string(),
            "000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506"
        );
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let display = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
        let hash = Hash::from_hex(display).unwrap();
        assert_eq!(hash.to_string(), display);
        // First internal byte is the last display byte pair.
        assert_eq!(hash.as_bytes()[0], 0x6f);
    }

    #[test]
    fn test_from_hex_short_strings() {
        // Empty string -> zero hash.
        assert_eq!(Hash::from_hex("").unwrap(), Hash::default());
        assert!(Hash::from_hex("").unwrap().is_zero());

        // Single digit is zero-padded on the high end.
        let result = Hash::from_hex("1").unwrap();
        let mut expected = [0u8; HASH_SIZE];
        expected[0] = 0x01;
        assert_eq!(result, Hash::new(expected));
    }

    #[test]
    fn test_from_hex_invalid() {
        // String too long.
        assert!(Hash::from_hex(
            "01234567890123456789012345678901234567890123456789012345678912345"
        )
        .is_err());

        // Invalid hex character.
        assert!(Hash::from_hex("abcdefg").is_err());

        // from_bytes with wrong length.
        assert!(Hash::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        #[derive(Serialize, Deserialize)]
        struct TestData {
            hash: Hash,
        }

        let data = TestData {
            hash: double_hash_h(b"hello"),
        };
        let json = serde_json::to_string(&data).unwrap();
        let data2: TestData = serde_json::from_str(&json).unwrap();
        assert_eq!(data.hash, data2.hash);
    }
}
