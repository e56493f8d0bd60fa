//! Wire serialization primitives
//!
//! Everything on the wire is built from three shapes: fixed-width
//! little-endian integers, compact-size varints, and varint-length-prefixed
//! byte strings. [`Reader`] walks a byte buffer tracking its own position;
//! writers append to a `Vec<u8>`.

pub mod transaction;
pub mod varint;

pub use transaction::{decode_transaction, encode_transaction};
pub use varint::{decode_varint, encode_varint, write_varint};

use crate::error::SerializeError;

/// Ceiling on any decoded length prefix. Nothing this layer carries is
/// larger than a block, so anything bigger is a corrupt or hostile length.
pub const MAX_DECODED_LENGTH: u64 = 32 * 1024 * 1024;

/// Positioned reader over a byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless the whole buffer has been consumed.
    pub fn expect_end(&self) -> Result<(), SerializeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(SerializeError::TrailingBytes)
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], SerializeError> {
        if self.remaining() < len {
            return Err(SerializeError::UnexpectedEnd {
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, SerializeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, SerializeError> {
        let raw = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([raw[0], raw[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, SerializeError> {
        let raw = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, SerializeError> {
        let raw = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_i64(&mut self) -> Result<i64, SerializeError> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_hash(&mut self) -> Result<[u8; 32], SerializeError> {
        let raw = self.read_bytes(32)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(raw);
        Ok(hash)
    }

    /// Read a canonical varint.
    pub fn read_varint(&mut self) -> Result<u64, SerializeError> {
        let (value, consumed) = varint::decode_varint(&self.bytes[self.position..])?;
        self.position += consumed;
        Ok(value)
    }

    /// Read a varint length prefix, bounded by [`MAX_DECODED_LENGTH`].
    pub fn read_length(&mut self) -> Result<usize, SerializeError> {
        let len = self.read_varint()?;
        if len > MAX_DECODED_LENGTH {
            return Err(SerializeError::OversizedLength(len));
        }
        Ok(len as usize)
    }

    /// Read a varint-length-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, SerializeError> {
        let len = self.read_length()?;
        Ok(self.read_bytes(len)?.to_vec())
    }
}

/// Append a varint-length-prefixed byte string.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_width_integers() {
        let bytes = [0x01, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 2);
        assert_eq!(reader.read_u32().unwrap(), 3);
        assert!(reader.is_empty());
        assert_eq!(
            reader.read_u8(),
            Err(SerializeError::UnexpectedEnd { needed: 1 })
        );
    }

    #[test]
    fn var_bytes_round_trip() {
        let mut out = Vec::new();
        write_var_bytes(&mut out, b"hello");
        assert_eq!(out[0], 5);
        let mut reader = Reader::new(&out);
        assert_eq!(reader.read_var_bytes().unwrap(), b"hello");
        reader.expect_end().unwrap();
    }

    #[test]
    fn rejects_hostile_length() {
        let mut out = Vec::new();
        write_varint(&mut out, u64::MAX);
        let mut reader = Reader::new(&out);
        assert_eq!(
            reader.read_length(),
            Err(SerializeError::OversizedLength(u64::MAX))
        );
    }

    #[test]
    fn trailing_bytes_detected() {
        let bytes = [0x00, 0x01];
        let mut reader = Reader::new(&bytes);
        reader.read_u8().unwrap();
        assert_eq!(reader.expect_end(), Err(SerializeError::TrailingBytes));
    }
}
