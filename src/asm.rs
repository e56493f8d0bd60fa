//! Script assembly text format
//!
//! [`assemble`] turns whitespace-separated tokens into script bytes and
//! [`disassemble`] renders script bytes back to text. Tokens are opcode
//! names (`OP_DUP`), decimal numbers (`-5`, `17`), hex data (`0xdeadbeef`)
//! and single-quoted ASCII strings (`'abc'`). Data always gets the
//! shortest push encoding, so assembled scripts satisfy the minimal-push
//! rule.

use crate::constants::MAX_SCRIPT_ELEMENT_SIZE;
use crate::error::AsmError;
use crate::num::ScriptNum;
use crate::opcodes::{
    self, OpcodeClass, OP_0, OP_1, OP_1NEGATE, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4,
};
use crate::parser::InstructionIter;

/// Append the shortest push encoding of `data`.
///
/// Single-byte values with dedicated opcodes (OP_1..OP_16, OP_1NEGATE)
/// use them; the empty string becomes OP_0.
pub fn push_data(out: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        0 => out.push(OP_0),
        1 if (1..=16).contains(&data[0]) => out.push(OP_1 + data[0] - 1),
        1 if data[0] == 0x81 => out.push(OP_1NEGATE),
        len if len <= 75 => {
            out.push(len as u8);
            out.extend_from_slice(data);
        }
        len if len <= 255 => {
            out.push(OP_PUSHDATA1);
            out.push(len as u8);
            out.extend_from_slice(data);
        }
        len if len <= 65535 => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(len as u16).to_le_bytes());
            out.extend_from_slice(data);
        }
        len => {
            out.push(OP_PUSHDATA4);
            out.extend_from_slice(&(len as u32).to_le_bytes());
            out.extend_from_slice(data);
        }
    }
}

/// Append the shortest push of a numeric value.
pub fn push_number(out: &mut Vec<u8>, value: i64) {
    push_data(out, &ScriptNum(value).encode());
}

fn assemble_token(out: &mut Vec<u8>, token: &str, pos: usize) -> Result<(), AsmError> {
    if let Some(hex_digits) = token.strip_prefix("0x") {
        let data = hex_decode(hex_digits).ok_or_else(|| AsmError::BadHex {
            literal: token.to_string(),
            pos,
        })?;
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(AsmError::PushTooLong {
                len: data.len(),
                pos,
            });
        }
        push_data(out, &data);
        return Ok(());
    }
    if let Some(rest) = token.strip_prefix('\'') {
        // closing quote may be missing entirely
        let body = rest.strip_suffix('\'').filter(|_| token.len() >= 2);
        let body = body.ok_or(AsmError::UnterminatedString { pos })?;
        if body.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(AsmError::PushTooLong {
                len: body.len(),
                pos,
            });
        }
        push_data(out, body.as_bytes());
        return Ok(());
    }
    if token.starts_with("OP_") {
        let opcode = opcodes::opcode_by_name(token)
            .filter(|&op| opcodes::info(op).class != OpcodeClass::PushBytes)
            .ok_or_else(|| AsmError::UnknownOpcode {
                name: token.to_string(),
                pos,
            })?;
        out.push(opcode);
        return Ok(());
    }
    let value: i64 = token.parse().map_err(|_| AsmError::BadNumber {
        literal: token.to_string(),
        pos,
    })?;
    push_number(out, value);
    Ok(())
}

/// Assemble script text into script bytes.
pub fn assemble(text: &str) -> Result<Vec<u8>, AsmError> {
    let mut out = Vec::new();
    let mut rest = text;
    let mut consumed = 0usize;
    while let Some(start) = rest.find(|c: char| !c.is_whitespace()) {
        let token_start = consumed + start;
        rest = &rest[start..];
        // a quoted token runs to its closing quote and may contain spaces
        let end = if rest.starts_with('\'') {
            match rest[1..].find('\'') {
                Some(close) => close + 2,
                None => rest.len(),
            }
        } else {
            rest.find(char::is_whitespace).unwrap_or(rest.len())
        };
        assemble_token(&mut out, &rest[..end], token_start)?;
        consumed = token_start + end;
        rest = &rest[end..];
    }
    Ok(out)
}

/// Render script bytes as assembly text.
///
/// Data pushes become `0x`-prefixed hex; a truncated push renders as
/// `<malformed>` and ends the output. Assembling the result reproduces
/// the script whenever the original used minimal pushes.
pub fn disassemble(script: &[u8]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for item in InstructionIter::new(script) {
        let ins = match item {
            Ok(ins) => ins,
            Err(_) => {
                parts.push("<malformed>".to_string());
                break;
            }
        };
        match ins.data {
            Some(data) if !data.is_empty() => {
                parts.push(format!("0x{}", hex_encode(data)));
            }
            Some(_) => parts.push("OP_0".to_string()),
            None => parts.push(opcodes::info(ins.opcode).name.to_string()),
        }
    }
    parts.join(" ")
}

fn hex_decode(digits: &str) -> Option<Vec<u8>> {
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    let bytes = digits.as_bytes();
    for pair in bytes.chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        out.push((hi * 16 + lo) as u8);
    }
    Some(out)
}

fn hex_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
