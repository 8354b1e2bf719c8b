//! Utility types for binary serialization.
//!
//! Provides VarInt encoding/decoding and the `TxReader`/`TxWriter` cursor
//! types for reading and writing wire-format binary data used throughout
//! transaction serialization.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A protocol variable-length integer (compact size).
///
/// VarInt is used in transaction data to indicate the number of upcoming
/// fields or the length of an upcoming field. The encoding uses 1, 3, 5, or
/// 9 bytes depending on the magnitude of the value, selected by a prefix
/// byte: values below 253 are a single byte, 0xFD prefixes a 2-byte LE
/// value, 0xFE a 4-byte LE value, and 0xFF an 8-byte LE value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from a byte slice.
    ///
    /// Returns the decoded value and the number of bytes consumed. The
    /// encoding is canonical for a given prefix byte: exactly the width the
    /// prefix implies is read, no more and no less.
    ///
    /// # Arguments
    /// * `data` - Byte slice starting with a VarInt encoding.
    ///
    /// # Returns
    /// `Ok((VarInt, bytes_consumed))`, or `MalformedVarInt` if the buffer is
    /// shorter than the width implied by the prefix byte.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let prefix = *data.first().ok_or(PrimitivesError::MalformedVarInt {
            need: 1,
            got: 0,
        })?;

        let width = match prefix {
            0xff => 9,
            0xfe => 5,
            0xfd => 3,
            b => return Ok((VarInt(b as u64), 1)),
        };
        if data.len() < width {
            return Err(PrimitivesError::MalformedVarInt {
                need: width,
                got: data.len(),
            });
        }

        let val = match prefix {
            0xff => u64::from_le_bytes([
                data[1], data[2], data[3], data[4], data[5], data[6], data[7], data[8],
            ]),
            0xfe => u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as u64,
            _ => u16::from_le_bytes([data[1], data[2]]) as u64,
        };
        Ok((VarInt(val), width))
    }

    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 253 {
            1
        } else if self.0 < 65536 {
            3
        } else if self.0 < 4294967296 {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.length()];
        self.put_bytes(&mut buf);
        buf
    }

    /// Write the VarInt into a destination buffer.
    ///
    /// The buffer must be at least `self.length()` bytes long.
    ///
    /// # Arguments
    /// * `dst` - Destination buffer to write into.
    ///
    /// # Returns
    /// The number of bytes written.
    pub fn put_bytes(&self, dst: &mut [u8]) -> usize {
        let v = self.0;
        if v < 0xfd {
            dst[0] = v as u8;
            1
        } else if v < 0x10000 {
            dst[0] = 0xfd;
            dst[1..3].copy_from_slice(&(v as u16).to_le_bytes());
            3
        } else if v < 0x100000000 {
            dst[0] = 0xfe;
            dst[1..5].copy_from_slice(&(v as u32).to_le_bytes());
            5
        } else {
            dst[0] = 0xff;
            dst[1..9].copy_from_slice(&v.to_le_bytes());
            9
        }
    }

    /// Return the underlying u64 value.
    ///
    /// # Returns
    /// The integer value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// TxReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for wire-format binary data.
///
/// Wraps a byte slice and maintains a read position, providing methods
/// to read fixed-size integers and VarInt values in little-endian order.
/// Every read is bounds-checked; running past the end of the buffer
/// produces `UnexpectedEof` rather than a panic.
pub struct TxReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TxReader<'a> {
    /// Create a new reader over the given byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from.
    ///
    /// # Returns
    /// A `TxReader` positioned at the start of the data.
    pub fn new(data: &'a [u8]) -> Self {
        TxReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        // Compare against the remainder; `pos + n` could overflow when a
        // hostile length prefix decodes to a value near usize::MAX.
        if n > self.data.len() - self.pos {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Look at the next `n` bytes without advancing the position.
    ///
    /// Used to probe for the segwit marker+flag sequence before committing
    /// to consuming it.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to peek at.
    ///
    /// # Returns
    /// `Some(slice)` if `n` bytes remain, otherwise `None`.
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        if n > self.data.len() - self.pos {
            return None;
        }
        Some(&self.data[self.pos..self.pos + n])
    }

    /// Advance the position by `n` bytes without returning data.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to skip.
    ///
    /// # Returns
    /// `Ok(())`, or an error if insufficient data remains.
    pub fn skip(&mut self, n: usize) -> Result<(), PrimitivesError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a single byte and advance the position.
    ///
    /// # Returns
    /// The byte value, or an error if no data remains.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a little-endian u16 and advance the position by 2 bytes.
    ///
    /// # Returns
    /// The decoded u16, or an error if insufficient data.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32 and advance the position by 4 bytes.
    ///
    /// # Returns
    /// The decoded u32, or an error if insufficient data.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian u64 and advance the position by 8 bytes.
    ///
    /// # Returns
    /// The decoded u64, or an error if insufficient data.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a little-endian i64 and advance the position by 8 bytes.
    ///
    /// Output amounts are signed 64-bit on the wire.
    ///
    /// # Returns
    /// The decoded i64, or an error if insufficient data.
    pub fn read_i64_le(&mut self) -> Result<i64, PrimitivesError> {
        Ok(self.read_u64_le()? as i64)
    }

    /// Read a VarInt and advance the position accordingly.
    ///
    /// # Returns
    /// The decoded `VarInt`, or an error if insufficient data.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let (vi, consumed) = VarInt::from_bytes(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(vi)
    }

    /// Return the number of bytes remaining.
    ///
    /// # Returns
    /// The count of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// TxWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for wire-format binary data.
///
/// Wraps a `Vec<u8>` and provides methods to append fixed-size integers
/// and VarInt values in little-endian order.
pub struct TxWriter {
    buf: Vec<u8>,
}

impl TxWriter {
    /// Create a new empty writer.
    ///
    /// # Returns
    /// A `TxWriter` with an empty internal buffer.
    pub fn new() -> Self {
        TxWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity of the internal buffer.
    ///
    /// # Returns
    /// A `TxWriter` with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        TxWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes to the buffer.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    ///
    /// # Arguments
    /// * `val` - The byte value.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u16 (2 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u16 value.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u32 (4 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u32 value.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64 (8 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u64 value.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian i64 (8 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The i64 value.
    pub fn write_i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt to the buffer.
    ///
    /// # Arguments
    /// * `varint` - The VarInt value to encode and append.
    pub fn write_varint(&mut self, varint: VarInt) {
        let bytes = varint.to_bytes();
        self.buf.extend_from_slice(&bytes);
    }

    /// Consume the writer and return the accumulated bytes.
    ///
    /// # Returns
    /// The internal byte buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    ///
    /// # Returns
    /// A byte slice of the written data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    ///
    /// # Returns
    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    ///
    /// # Returns
    /// `true` if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for TxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt encode tests --

    #[test]
    fn test_varint_put_bytes() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (252, vec![0xfc]),
            (253, vec![0xfd, 0xfd, 0x00]),
            (254, vec![0xfd, 0xfe, 0x00]),
            (65535, vec![0xfd, 0xff, 0xff]),
            (65536, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (4294967295, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (4294967296, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
            (u64::MAX, vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ];

        for (value, expected) in cases {
            let vi = VarInt(value);
            let mut buf = vec![0u8; vi.length()];
            let n = vi.put_bytes(&mut buf);
            assert_eq!(n, expected.len(), "put_bytes length mismatch for {}", value);
            assert_eq!(buf, expected, "put_bytes content mismatch for {}", value);
            assert_eq!(vi.to_bytes(), buf, "to_bytes != put_bytes for {}", value);
        }
    }

    // -- VarInt round-trip at every size-class boundary --

    #[test]
    fn test_varint_roundtrip_boundaries() {
        for value in [0u64, 1, 252, 253, 254, 65535, 65536, 4294967295, 4294967296] {
            let encoded = VarInt(value).to_bytes();
            let (decoded, consumed) = VarInt::from_bytes(&encoded).unwrap();
            assert_eq!(decoded.value(), value, "roundtrip value for {}", value);
            assert_eq!(consumed, encoded.len(), "roundtrip width for {}", value);
            assert_eq!(consumed, VarInt(value).length(), "length() width for {}", value);
        }
    }

    // -- VarInt byte-length tests --

    #[test]
    fn test_varint_byte_length() {
        assert_eq!(VarInt(0).to_bytes().len(), 1); // 1 byte lower
        assert_eq!(VarInt(252).to_bytes().len(), 1); // 1 byte upper
        assert_eq!(VarInt(253).to_bytes().len(), 3); // 3 byte lower
        assert_eq!(VarInt(65535).to_bytes().len(), 3); // 3 byte upper
        assert_eq!(VarInt(65536).to_bytes().len(), 5); // 5 byte lower
        assert_eq!(VarInt(4294967295).to_bytes().len(), 5); // 5 byte upper
        assert_eq!(VarInt(4294967296).to_bytes().len(), 9); // 9 byte lower
        assert_eq!(VarInt(u64::MAX).to_bytes().len(), 9); // 9 byte upper
    }

    // -- VarInt truncated-buffer rejection --

    #[test]
    fn test_varint_malformed_short_buffer() {
        // Empty buffer.
        assert!(VarInt::from_bytes(&[]).is_err());
        // 0xfd prefix promises 2 more bytes; only 1 present.
        assert!(VarInt::from_bytes(&[0xfd, 0x00]).is_err());
        // 0xfe prefix promises 4 more bytes.
        assert!(VarInt::from_bytes(&[0xfe, 0x00, 0x00]).is_err());
        // 0xff prefix promises 8 more bytes.
        assert!(VarInt::from_bytes(&[0xff, 0, 0, 0, 0, 0, 0, 0]).is_err());
        // Exactly the promised width succeeds.
        let (vi, sz) = VarInt::from_bytes(&[0xfd, 0x00, 0x01]).unwrap();
        assert_eq!(vi.value(), 256);
        assert_eq!(sz, 3);
    }

    // -- TxReader / TxWriter round-trip tests --

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = TxWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_i64_le(-1);
        writer.write_varint(VarInt(300));
        writer.write_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = TxReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_i64_le().unwrap(), -1);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_bytes(5).unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_eof() {
        let data: &[u8] = &[0x01];
        let mut reader = TxReader::new(data);
        assert!(reader.read_u8().is_ok());
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_reader_oversized_request_no_overflow() {
        // Lengths near usize::MAX must fail cleanly, not wrap around the
        // position arithmetic.
        let data: &[u8] = &[0x01, 0x02];
        let mut reader = TxReader::new(data);
        reader.skip(1).unwrap();
        assert!(reader.read_bytes(usize::MAX).is_err());
        assert_eq!(reader.peek_bytes(usize::MAX), None);

        // A 0xff-prefixed varint carrying u64::MAX drives the same path.
        let mut encoded = vec![0xff];
        encoded.extend_from_slice(&u64::MAX.to_le_bytes());
        let mut reader = TxReader::new(&encoded);
        let len = reader.read_varint().unwrap();
        assert_eq!(len.value(), u64::MAX);
        assert!(reader.read_bytes(len.value() as usize).is_err());
    }

    #[test]
    fn test_reader_peek_does_not_advance() {
        let data: &[u8] = &[0x00, 0x01, 0x02];
        let mut reader = TxReader::new(data);
        assert_eq!(reader.peek_bytes(2), Some(&[0x00, 0x01][..]));
        assert_eq!(reader.remaining(), 3);
        reader.skip(2).unwrap();
        assert_eq!(reader.peek_bytes(2), None);
        assert_eq!(reader.read_u8().unwrap(), 0x02);
    }

    #[test]
    fn test_reader_varint_sizes() {
        let mut reader = TxReader::new(&[0x05]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(5));

        let mut reader = TxReader::new(&[0xfd, 0x00, 0x01]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(256));

        let mut reader = TxReader::new(&[0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(65536));

        let mut reader = TxReader::new(&[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(4294967296));
    }
}
