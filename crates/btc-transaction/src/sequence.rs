//! Sequence number helpers for relative lock times (BIP68) and RBF.

use std::fmt;

use crate::TransactionError;

/// Sequence value marking an input as final.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Bit disabling relative lock-time interpretation of the sequence.
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: u32 = 0x8000_0000;

/// Bit selecting time-based (512-second units) relative lock time.
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: u32 = 0x0040_0000;

/// Mask extracting the 16-bit lock-time value from a sequence.
pub const SEQUENCE_LOCKTIME_MASK: u32 = 0x0000_ffff;

/// A decoded relative lock time carried in a sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeLockTime {
    /// Lock for the given number of blocks.
    Blocks(u16),
    /// Lock for the given number of 512-second intervals.
    Time(u16),
}

/// A transaction input sequence number.
///
/// Wraps the raw u32 with constructors for the BIP68 relative lock-time
/// encodings and the replace-by-fee convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence(pub u32);

impl Sequence {
    /// The final sequence, carrying no relative lock time.
    pub const FINAL: Sequence = Sequence(SEQUENCE_FINAL);

    /// Encode a relative lock time in blocks.
    ///
    /// # Arguments
    /// * `blocks` - Number of blocks, at most 65535.
    ///
    /// # Returns
    /// `Ok(Sequence)`, or `InvalidSequence` if the count does not fit in
    /// 16 bits.
    pub fn for_blocks(blocks: u32) -> Result<Self, TransactionError> {
        if blocks > SEQUENCE_LOCKTIME_MASK {
            return Err(TransactionError::InvalidSequence(format!(
                "block count {} exceeds maximum of {}",
                blocks, SEQUENCE_LOCKTIME_MASK
            )));
        }
        Ok(Sequence(blocks))
    }

    /// Encode a relative lock time in seconds.
    ///
    /// The value is rounded down to a multiple of 512 seconds.
    ///
    /// # Arguments
    /// * `seconds` - Duration in seconds, at most 65535 * 512.
    ///
    /// # Returns
    /// `Ok(Sequence)`, or `InvalidSequence` if the duration is out of range.
    pub fn for_seconds(seconds: u32) -> Result<Self, TransactionError> {
        const MAX_SECONDS: u32 = SEQUENCE_LOCKTIME_MASK * 512;
        if seconds > MAX_SECONDS {
            return Err(TransactionError::InvalidSequence(format!(
                "duration {} exceeds maximum of {} seconds",
                seconds, MAX_SECONDS
            )));
        }
        Ok(Sequence((seconds / 512) | SEQUENCE_LOCKTIME_TYPE_FLAG))
    }

    /// Sequence signaling replace-by-fee without a relative lock time.
    ///
    /// # Returns
    /// A `Sequence` of `0xFFFFFFFD`, the highest value that still signals
    /// BIP125 replaceability.
    pub fn for_replace_by_fee() -> Self {
        Sequence(SEQUENCE_FINAL - 2)
    }

    /// Check whether this sequence marks the input final.
    ///
    /// # Returns
    /// `true` for `0xFFFFFFFF`.
    pub fn is_final(&self) -> bool {
        self.0 == SEQUENCE_FINAL
    }

    /// Check whether this sequence opts the transaction into BIP125
    /// replace-by-fee.
    ///
    /// # Returns
    /// `true` if the sequence is below `0xFFFFFFFE`.
    pub fn signals_rbf(&self) -> bool {
        self.0 < SEQUENCE_FINAL - 1
    }

    /// Decode the relative lock time carried by this sequence, if any.
    ///
    /// # Returns
    /// `None` when the disable flag is set, otherwise the block- or
    /// time-based lock value.
    pub fn relative_lock_time(&self) -> Option<RelativeLockTime> {
        if self.0 & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return None;
        }
        let value = (self.0 & SEQUENCE_LOCKTIME_MASK) as u16;
        if self.0 & SEQUENCE_LOCKTIME_TYPE_FLAG != 0 {
            Some(RelativeLockTime::Time(value))
        } else {
            Some(RelativeLockTime::Blocks(value))
        }
    }

    /// Return the raw u32 value.
    ///
    /// # Returns
    /// The sequence number as stored on the wire.
    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Sequence {
    fn from(v: u32) -> Self {
        Sequence(v)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
