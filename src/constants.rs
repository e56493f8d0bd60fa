//! Consensus constants for script verification

/// Maximum serialized script length in bytes
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum size of a single stack element in bytes
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum combined depth of the main and alt stacks during execution
pub const MAX_STACK_SIZE: usize = 1000;

/// Maximum number of executed non-push opcodes per script
pub const MAX_OPS_PER_SCRIPT: usize = 201;

/// Maximum number of public keys in an OP_CHECKMULTISIG
pub const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

/// Maximum byte length of a numeric operand (ScriptNum)
pub const MAX_SCRIPTNUM_SIZE: usize = 4;

/// Numeric operand length for CHECKLOCKTIMEVERIFY / CHECKSEQUENCEVERIFY,
/// which read values up to 2^39-1 and so need a fifth byte
pub const MAX_LOCKTIME_SCRIPTNUM_SIZE: usize = 5;

/// Lock times below this threshold are block heights, above are unix times
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Sequence number that disables lock-time semantics for an input
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// If set in an input's sequence, relative lock time is disabled (BIP68)
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: u32 = 1 << 31;

/// If set, the relative lock time is in 512-second units rather than blocks
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: u32 = 1 << 22;

/// Mask extracting the relative lock-time value from a sequence number
pub const SEQUENCE_LOCKTIME_MASK: u32 = 0x0000_ffff;
