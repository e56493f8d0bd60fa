//! Execution stack for the script interpreter
//!
//! Elements are plain byte strings. The element size ceiling is enforced
//! at push time; the combined main/alt depth ceiling is enforced by the
//! interpreter after each operation since it spans both stacks.

use crate::constants::MAX_SCRIPT_ELEMENT_SIZE;
use crate::error::{Result, ScriptError};
use crate::types::ByteString;

/// Interpret a byte string as a boolean.
///
/// False iff every byte is zero, allowing the last byte to be 0x80
/// (negative zero). The empty string is false.
pub fn cast_to_bool(bytes: &[u8]) -> bool {
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != 0 {
            return !(i == bytes.len() - 1 && byte == 0x80);
        }
    }
    false
}

/// A bounded stack of byte strings.
///
/// Depth positions are addressed from the top: depth 0 is the top
/// element, depth 1 the one below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<ByteString>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push an element, rejecting anything over the element size ceiling.
    pub fn push(&mut self, item: ByteString) -> Result<()> {
        if item.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptError::PushSize);
        }
        self.items.push(item);
        Ok(())
    }

    /// Push without the size check. Only for values the interpreter
    /// produces itself (numeric results, booleans), which are always
    /// far below the ceiling.
    pub fn push_unchecked(&mut self, item: ByteString) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Result<ByteString> {
        self.items.pop().ok_or(ScriptError::InvalidStackOperation)
    }

    /// Borrow the element at `depth` below the top.
    pub fn peek(&self, depth: usize) -> Result<&ByteString> {
        let len = self.items.len();
        if depth >= len {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(&self.items[len - 1 - depth])
    }

    /// Remove and return the element at `depth` below the top.
    pub fn remove(&mut self, depth: usize) -> Result<ByteString> {
        let len = self.items.len();
        if depth >= len {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(self.items.remove(len - 1 - depth))
    }

    /// Insert an element so it ends up at `depth` below the top.
    pub fn insert(&mut self, depth: usize, item: ByteString) -> Result<()> {
        let len = self.items.len();
        if depth > len {
            return Err(ScriptError::InvalidStackOperation);
        }
        self.items.insert(len - depth, item);
        Ok(())
    }

    /// Swap the elements at two depths below the top.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.items.len();
        if a >= len || b >= len {
            return Err(ScriptError::InvalidStackOperation);
        }
        self.items.swap(len - 1 - a, len - 1 - b);
        Ok(())
    }

    /// Truthiness of the top element without popping it.
    pub fn peek_bool(&self) -> Result<bool> {
        Ok(cast_to_bool(self.peek(0)?))
    }

    /// Pop the top element and interpret it as a boolean.
    pub fn pop_bool(&mut self) -> Result<bool> {
        Ok(cast_to_bool(&self.pop()?))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ByteString> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<ByteString>> for Stack {
    fn from(items: Vec<ByteString>) -> Self {
        Stack { items }
    }
}
