//! Error types for script parsing, execution and serialization

use thiserror::Error;

/// Rejection reasons for script parsing and execution.
///
/// Every variant is terminal for the verification call that produced it;
/// there is no local recovery. A malformed encoding (bad push length, bad
/// DER) is always one of these hard errors, while a well-formed but
/// cryptographically invalid signature merely pushes false on the stack.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// Push opcode declares more data than the script contains,
    /// or a PUSHDATA length header is itself truncated
    #[error("truncated push at offset {0}")]
    TruncatedPush(usize),

    #[error("script exceeds maximum size")]
    ScriptSize,

    #[error("pushed element exceeds maximum element size")]
    PushSize,

    #[error("stack size limit exceeded")]
    StackSize,

    #[error("operation count limit exceeded")]
    OpCount,

    #[error("disabled opcode")]
    DisabledOpcode,

    #[error("invalid or reserved opcode")]
    BadOpcode,

    #[error("operation on missing stack operand")]
    InvalidStackOperation,

    #[error("operation on missing alt-stack operand")]
    InvalidAltstackOperation,

    #[error("OP_ELSE or OP_ENDIF without matching OP_IF, or unclosed OP_IF")]
    UnbalancedConditional,

    #[error("OP_RETURN encountered")]
    OpReturn,

    #[error("OP_VERIFY failed")]
    Verify,

    #[error("OP_EQUALVERIFY failed")]
    EqualVerify,

    #[error("OP_NUMEQUALVERIFY failed")]
    NumEqualVerify,

    #[error("OP_CHECKSIGVERIFY failed")]
    CheckSigVerify,

    #[error("OP_CHECKMULTISIGVERIFY failed")]
    CheckMultiSigVerify,

    #[error("numeric operand exceeds the 4-byte ceiling")]
    NumericOverflow,

    #[error("push is not minimally encoded")]
    MinimalData,

    #[error("signature is not strict DER")]
    SigDer,

    #[error("signature hash type is not defined")]
    SigHashType,

    #[error("signature S value is not in the low half of the curve order")]
    SigHighS,

    #[error("public key is neither compressed nor uncompressed")]
    PubkeyType,

    #[error("CHECKMULTISIG dummy element is not null")]
    SigNullDummy,

    #[error("signature count out of range for CHECKMULTISIG")]
    SigCount,

    #[error("public key count out of range for CHECKMULTISIG")]
    PubkeyCount,

    #[error("scriptSig is not push-only")]
    SigPushOnly,

    #[error("negative lock time")]
    NegativeLockTime,

    #[error("lock time requirement not satisfied")]
    UnsatisfiedLockTime,

    #[error("upgradable NOP used while discouraged")]
    DiscourageUpgradableNops,

    #[error("script evaluated without leaving a true value on the stack")]
    EvalFalse,

    #[error("stack contains extra elements after evaluation")]
    CleanStack,
}

/// Assembler errors. Tooling only, never part of a consensus decision;
/// they carry the source-text position of the offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("unknown opcode `{name}` at column {pos}")]
    UnknownOpcode { name: String, pos: usize },

    #[error("malformed numeric literal `{literal}` at column {pos}")]
    BadNumber { literal: String, pos: usize },

    #[error("malformed hex literal `{literal}` at column {pos}")]
    BadHex { literal: String, pos: usize },

    #[error("unterminated string literal starting at column {pos}")]
    UnterminatedString { pos: usize },

    #[error("push data too long ({len} bytes) at column {pos}")]
    PushTooLong { len: usize, pos: usize },
}

/// Wire (de)serialization errors for the shared Medium layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("unexpected end of input (needed {needed} more bytes)")]
    UnexpectedEnd { needed: usize },

    #[error("varint is not canonically encoded")]
    NonCanonicalVarInt,

    #[error("declared length {0} exceeds the decoding ceiling")]
    OversizedLength(u64),

    #[error("trailing bytes after decoded value")]
    TrailingBytes,
}

pub type Result<T> = std::result::Result<T, ScriptError>;
