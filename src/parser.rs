//! Lazy script instruction decoding
//!
//! Scripts are parsed one instruction at a time so malformed bytes after
//! an unexecuted branch are only rejected when execution reaches them.
//! Payloads borrow from the input script; nothing is copied until an
//! instruction actually pushes.

use crate::error::{Result, ScriptError};
use crate::opcodes::{OP_0, OP_1, OP_16, OP_1NEGATE, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

/// One decoded instruction.
///
/// `offset` is the byte position of the opcode within the script; push
/// instructions carry a borrowed payload slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub opcode: u8,
    pub data: Option<&'a [u8]>,
    pub offset: usize,
}

impl<'a> Instruction<'a> {
    /// Payload of a push instruction, or the empty slice.
    pub fn payload(&self) -> &'a [u8] {
        self.data.unwrap_or(&[])
    }

    /// True if this instruction only places data on the stack.
    pub fn is_push(&self) -> bool {
        self.opcode <= OP_16
    }

    /// True if the push uses the shortest possible encoding for its
    /// payload. Non-push instructions are trivially minimal.
    pub fn is_minimal_push(&self) -> bool {
        let data = match self.data {
            Some(data) => data,
            None => return true,
        };
        match data.len() {
            0 => self.opcode == OP_0,
            1 => {
                let byte = data[0];
                if (1..=16).contains(&byte) {
                    // OP_1 .. OP_16
                    false
                } else if byte == 0x81 {
                    // OP_1NEGATE
                    false
                } else {
                    self.opcode == 0x01
                }
            }
            len if len <= 75 => self.opcode as usize == len,
            len if len <= 255 => self.opcode == OP_PUSHDATA1,
            len if len <= 65535 => self.opcode == OP_PUSHDATA2,
            _ => self.opcode == OP_PUSHDATA4,
        }
    }
}

/// Iterator over a script's instructions.
///
/// Yields `Err` once at the offset of a truncated push, then `None`; the
/// cursor does not advance past a malformed instruction.
#[derive(Debug, Clone)]
pub struct InstructionIter<'a> {
    script: &'a [u8],
    cursor: usize,
    failed: bool,
}

impl<'a> InstructionIter<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        InstructionIter {
            script,
            cursor: 0,
            failed: false,
        }
    }

    /// Byte offset of the next instruction to be decoded.
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn take(&mut self, len: usize, at: usize) -> Result<&'a [u8]> {
        if self.script.len() - self.cursor < len {
            self.failed = true;
            return Err(ScriptError::TruncatedPush(at));
        }
        let slice = &self.script[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    fn decode_next(&mut self) -> Result<Instruction<'a>> {
        let offset = self.cursor;
        let opcode = self.script[self.cursor];
        self.cursor += 1;
        let data = match opcode {
            0x01..=0x4b => Some(self.take(opcode as usize, offset)?),
            OP_PUSHDATA1 => {
                let len = self.take(1, offset)?[0] as usize;
                Some(self.take(len, offset)?)
            }
            OP_PUSHDATA2 => {
                let raw = self.take(2, offset)?;
                let len = u16::from_le_bytes([raw[0], raw[1]]) as usize;
                Some(self.take(len, offset)?)
            }
            OP_PUSHDATA4 => {
                let raw = self.take(4, offset)?;
                let len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
                Some(self.take(len, offset)?)
            }
            OP_0 => Some(&self.script[offset..offset]),
            _ => None,
        };
        Ok(Instruction {
            opcode,
            data,
            offset,
        })
    }
}

impl<'a> Iterator for InstructionIter<'a> {
    type Item = Result<Instruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.script.len() {
            return None;
        }
        Some(self.decode_next())
    }
}

/// Decode an entire script eagerly.
pub fn parse(script: &[u8]) -> Result<Vec<Instruction<'_>>> {
    InstructionIter::new(script).collect()
}

/// True if the script consists solely of data pushes and decodes cleanly.
pub fn is_push_only(script: &[u8]) -> bool {
    for instruction in InstructionIter::new(script) {
        match instruction {
            Ok(ins) if ins.is_push() => {}
            _ => return false,
        }
    }
    true
}

/// Extract the data pushed by each instruction of a push-only script.
pub fn push_values(script: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut values = Vec::new();
    for instruction in InstructionIter::new(script) {
        let ins = instruction?;
        if !ins.is_push() {
            return Err(ScriptError::SigPushOnly);
        }
        values.push(constant_value(&ins));
    }
    Ok(values)
}

/// The stack element an instruction pushes, resolving OP_1NEGATE and
/// OP_1..OP_16 to their single-byte forms.
pub fn constant_value(ins: &Instruction<'_>) -> Vec<u8> {
    match ins.opcode {
        OP_1NEGATE => vec![0x81],
        op if (OP_1..=OP_16).contains(&op) => vec![op - OP_1 + 1],
        _ => ins.payload().to_vec(),
    }
}
