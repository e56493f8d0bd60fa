//! Variable-length integer (compact size) encoding
//!
//! Values below 0xfd are a single byte; larger values use a one-byte
//! prefix followed by a 2, 4 or 8 byte little-endian integer. Decoding
//! rejects non-canonical forms where a value is written wider than
//! necessary.

use crate::error::SerializeError;

/// Prefix for a 16-bit payload.
pub const VARINT_U16: u8 = 0xfd;
/// Prefix for a 32-bit payload.
pub const VARINT_U32: u8 = 0xfe;
/// Prefix for a 64-bit payload.
pub const VARINT_U64: u8 = 0xff;

/// Append the canonical encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    if value < VARINT_U16 as u64 {
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(VARINT_U16);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(VARINT_U32);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(VARINT_U64);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    write_varint(&mut out, value);
    out
}

/// Decode a varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), SerializeError> {
    let first = *bytes.first().ok_or(SerializeError::UnexpectedEnd { needed: 1 })?;
    match first {
        VARINT_U16 => {
            let raw = take(bytes, 1, 2)?;
            let value = u64::from(u16::from_le_bytes([raw[0], raw[1]]));
            if value < VARINT_U16 as u64 {
                return Err(SerializeError::NonCanonicalVarInt);
            }
            Ok((value, 3))
        }
        VARINT_U32 => {
            let raw = take(bytes, 1, 4)?;
            let value = u64::from(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]));
            if value <= u16::MAX as u64 {
                return Err(SerializeError::NonCanonicalVarInt);
            }
            Ok((value, 5))
        }
        VARINT_U64 => {
            let raw = take(bytes, 1, 8)?;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(raw);
            let value = u64::from_le_bytes(buf);
            if value <= u32::MAX as u64 {
                return Err(SerializeError::NonCanonicalVarInt);
            }
            Ok((value, 9))
        }
        _ => Ok((u64::from(first), 1)),
    }
}

fn take(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], SerializeError> {
    if bytes.len() < start + len {
        return Err(SerializeError::UnexpectedEnd {
            needed: start + len - bytes.len(),
        });
    }
    Ok(&bytes[start..start + len])
}
