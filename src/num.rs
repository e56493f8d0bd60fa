//! Numeric operand encoding for script arithmetic
//!
//! Operands are sign-magnitude little-endian byte strings: the most
//! significant bit of the last byte is the sign. Encoding always produces
//! the shortest form; decoding enforces an input size ceiling and can
//! optionally reject non-minimal encodings.

use crate::constants::MAX_SCRIPTNUM_SIZE;
use crate::error::{Result, ScriptError};

/// A script numeric value.
///
/// Operands are limited to [`MAX_SCRIPTNUM_SIZE`] bytes on input, so every
/// operand fits in an `i64` with room to spare; arithmetic results may
/// exceed the input ceiling and re-enter the stack at their natural width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNum(pub i64);

impl ScriptNum {
    /// Serialize to the shortest sign-magnitude little-endian form.
    ///
    /// Zero encodes as the empty byte string. A final padding byte
    /// (0x00 or 0x80) is appended only when the magnitude's own high
    /// bit would otherwise be read as the sign.
    pub fn encode(self) -> Vec<u8> {
        let value = self.0;
        if value == 0 {
            return Vec::new();
        }
        let negative = value < 0;
        let mut magnitude = value.unsigned_abs();
        let mut bytes = Vec::with_capacity(9);
        while magnitude > 0 {
            bytes.push((magnitude & 0xff) as u8);
            magnitude >>= 8;
        }
        let last = *bytes.last().unwrap_or(&0);
        if last & 0x80 != 0 {
            bytes.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            let idx = bytes.len() - 1;
            bytes[idx] |= 0x80;
        }
        bytes
    }

    /// Deserialize a numeric operand of at most `max_size` bytes.
    ///
    /// With `require_minimal`, any encoding longer than [`Self::encode`]
    /// would produce is rejected: a trailing byte whose low seven bits are
    /// all zero is only allowed when the preceding byte has its high bit
    /// set.
    pub fn decode(bytes: &[u8], require_minimal: bool, max_size: usize) -> Result<Self> {
        if bytes.len() > max_size {
            return Err(ScriptError::NumericOverflow);
        }
        if bytes.is_empty() {
            return Ok(ScriptNum(0));
        }
        if require_minimal {
            let last = bytes[bytes.len() - 1];
            if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
                return Err(ScriptError::MinimalData);
            }
        }
        let negative = bytes[bytes.len() - 1] & 0x80 != 0;
        let mut magnitude: i128 = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let byte = if i == bytes.len() - 1 { byte & 0x7f } else { byte };
            if i >= 9 {
                if byte != 0 {
                    return Err(ScriptError::NumericOverflow);
                }
                continue;
            }
            magnitude |= i128::from(byte) << (8 * i);
        }
        let value = if negative { -magnitude } else { magnitude };
        i64::try_from(value)
            .map(ScriptNum)
            .map_err(|_| ScriptError::NumericOverflow)
    }

    /// Deserialize an arithmetic operand with the standard 4-byte ceiling.
    pub fn decode_operand(bytes: &[u8], require_minimal: bool) -> Result<Self> {
        Self::decode(bytes, require_minimal, MAX_SCRIPTNUM_SIZE)
    }

    /// Truthiness of the encoded form: zero (including negative zero) is
    /// false, everything else true.
    pub fn is_true(self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for ScriptNum {
    fn from(value: i64) -> Self {
        ScriptNum(value)
    }
}

impl From<bool> for ScriptNum {
    fn from(value: bool) -> Self {
        ScriptNum(i64::from(value))
    }
}
