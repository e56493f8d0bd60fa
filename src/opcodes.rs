//! Script opcode constants and the static opcode metadata table
//!
//! All 256 opcode values are classified once into a process-wide read-only
//! table; the interpreter consults the classification, the assembler and
//! error messages use the canonical names.

// ============================================================================
// PUSH DATA OPCODES (0x00 - 0x4e)
// ============================================================================

/// OP_0 / OP_FALSE - Push empty byte string
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;

/// OP_PUSHDATA1 - Next byte is the push length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// OP_PUSHDATA2 - Next 2 bytes (little-endian) are the push length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// OP_PUSHDATA4 - Next 4 bytes (little-endian) are the push length
pub const OP_PUSHDATA4: u8 = 0x4e;

// ============================================================================
// PUSH VALUE OPCODES (0x4f - 0x60)
// ============================================================================

/// OP_1NEGATE - Push -1
pub const OP_1NEGATE: u8 = 0x4f;

/// OP_RESERVED - Fails the script if executed
pub const OP_RESERVED: u8 = 0x50;

/// OP_1 / OP_TRUE - Push 1
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;

/// OP_2 through OP_16 - Push 2 through 16
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

// ============================================================================
// CONTROL FLOW OPCODES (0x61 - 0x6a)
// ============================================================================

/// OP_NOP - No operation
pub const OP_NOP: u8 = 0x61;

/// OP_VER - Fails the script if executed
pub const OP_VER: u8 = 0x62;

/// OP_IF - Execute the branch if the popped value is true
pub const OP_IF: u8 = 0x63;

/// OP_NOTIF - Execute the branch if the popped value is false
pub const OP_NOTIF: u8 = 0x64;

/// OP_VERIF / OP_VERNOTIF - Fail the script even in an unexecuted branch
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;

/// OP_ELSE - Toggle the innermost branch
pub const OP_ELSE: u8 = 0x67;

/// OP_ENDIF - Close the innermost OP_IF/OP_NOTIF
pub const OP_ENDIF: u8 = 0x68;

/// OP_VERIFY - Fail unless the popped value is true
pub const OP_VERIFY: u8 = 0x69;

/// OP_RETURN - Fail the script unconditionally
pub const OP_RETURN: u8 = 0x6a;

// ============================================================================
// STACK OPERATIONS (0x6b - 0x7d)
// ============================================================================

/// OP_TOALTSTACK - Move the top element to the alt stack
pub const OP_TOALTSTACK: u8 = 0x6b;

/// OP_FROMALTSTACK - Move the top alt-stack element back
pub const OP_FROMALTSTACK: u8 = 0x6c;

/// OP_2DROP - Drop the top two elements
pub const OP_2DROP: u8 = 0x6d;

/// OP_2DUP - Duplicate the top two elements
pub const OP_2DUP: u8 = 0x6e;

/// OP_3DUP - Duplicate the top three elements
pub const OP_3DUP: u8 = 0x6f;

/// OP_2OVER - Copy the pair two places back to the top
pub const OP_2OVER: u8 = 0x70;

/// OP_2ROT - Move the fifth and sixth elements to the top
pub const OP_2ROT: u8 = 0x71;

/// OP_2SWAP - Swap the top two pairs
pub const OP_2SWAP: u8 = 0x72;

/// OP_IFDUP - Duplicate the top element if it is true
pub const OP_IFDUP: u8 = 0x73;

/// OP_DEPTH - Push the stack depth
pub const OP_DEPTH: u8 = 0x74;

/// OP_DROP - Drop the top element
pub const OP_DROP: u8 = 0x75;

/// OP_DUP - Duplicate the top element
pub const OP_DUP: u8 = 0x76;

/// OP_NIP - Drop the second element
pub const OP_NIP: u8 = 0x77;

/// OP_OVER - Copy the second element to the top
pub const OP_OVER: u8 = 0x78;

/// OP_PICK - Copy the n-th element to the top (n popped)
pub const OP_PICK: u8 = 0x79;

/// OP_ROLL - Move the n-th element to the top (n popped)
pub const OP_ROLL: u8 = 0x7a;

/// OP_ROT - Rotate the top three elements left
pub const OP_ROT: u8 = 0x7b;

/// OP_SWAP - Swap the top two elements
pub const OP_SWAP: u8 = 0x7c;

/// OP_TUCK - Copy the top element below the second
pub const OP_TUCK: u8 = 0x7d;

// ============================================================================
// SPLICE OPERATIONS (0x7e - 0x82); all but OP_SIZE are disabled
// ============================================================================

pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;

/// OP_SIZE - Push the byte length of the top element (without popping)
pub const OP_SIZE: u8 = 0x82;

// ============================================================================
// BITWISE LOGIC (0x83 - 0x8a); INVERT/AND/OR/XOR are disabled
// ============================================================================

pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;

/// OP_EQUAL - Push 1 if the top two elements are byte-equal, else 0
pub const OP_EQUAL: u8 = 0x87;

/// OP_EQUALVERIFY - OP_EQUAL followed by OP_VERIFY
pub const OP_EQUALVERIFY: u8 = 0x88;

pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;

// ============================================================================
// NUMERIC OPERATIONS (0x8b - 0xa5)
// ============================================================================

pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d; // disabled
pub const OP_2DIV: u8 = 0x8e; // disabled
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95; // disabled
pub const OP_DIV: u8 = 0x96; // disabled
pub const OP_MOD: u8 = 0x97; // disabled
pub const OP_LSHIFT: u8 = 0x98; // disabled
pub const OP_RSHIFT: u8 = 0x99; // disabled
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

// ============================================================================
// CRYPTOGRAPHIC OPERATIONS (0xa6 - 0xaf)
// ============================================================================

/// OP_RIPEMD160 - Hash the top element with RIPEMD-160
pub const OP_RIPEMD160: u8 = 0xa6;

/// OP_SHA1 - Hash the top element with SHA-1
pub const OP_SHA1: u8 = 0xa7;

/// OP_SHA256 - Hash the top element with SHA-256
pub const OP_SHA256: u8 = 0xa8;

/// OP_HASH160 - RIPEMD-160 of SHA-256 of the top element
pub const OP_HASH160: u8 = 0xa9;

/// OP_HASH256 - Double SHA-256 of the top element
pub const OP_HASH256: u8 = 0xaa;

/// OP_CODESEPARATOR - Subsequent signature checks cover the script from here
pub const OP_CODESEPARATOR: u8 = 0xab;

/// OP_CHECKSIG - Verify a signature over the transaction digest
pub const OP_CHECKSIG: u8 = 0xac;

/// OP_CHECKSIGVERIFY - OP_CHECKSIG followed by OP_VERIFY
pub const OP_CHECKSIGVERIFY: u8 = 0xad;

/// OP_CHECKMULTISIG - Verify m of n signatures in order
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// OP_CHECKMULTISIGVERIFY - OP_CHECKMULTISIG followed by OP_VERIFY
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// ============================================================================
// EXPANSION OPCODES (0xb0 - 0xb9)
// ============================================================================

/// OP_NOP1 - Reserved for future soft forks
pub const OP_NOP1: u8 = 0xb0;

/// OP_CHECKLOCKTIMEVERIFY (BIP65) - Fail unless the transaction lock time
/// satisfies the popped value; behaves as OP_NOP2 without the flag
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = 0xb1;

/// OP_CHECKSEQUENCEVERIFY (BIP112) - Fail unless the input's relative lock
/// time satisfies the popped value; behaves as OP_NOP3 without the flag
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = 0xb2;

pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

/// Opcode classification used by the interpreter's dispatch and by the
/// assembler when deciding how a token may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeClass {
    /// Direct data push (0x01-0x4b) or OP_PUSHDATA1/2/4
    PushBytes,
    /// OP_0, OP_1NEGATE, OP_1..OP_16
    Constant,
    /// OP_NOP, OP_IF family, OP_VERIFY, OP_RETURN
    FlowControl,
    /// Stack and alt-stack shuffling
    Stack,
    /// OP_SIZE (the only enabled splice opcode)
    Splice,
    /// OP_EQUAL / OP_EQUALVERIFY
    Bitwise,
    /// Numeric opcodes operating on ScriptNum operands
    Arithmetic,
    /// Hashing and signature opcodes
    Crypto,
    /// OP_CHECKLOCKTIMEVERIFY / OP_CHECKSEQUENCEVERIFY
    Locktime,
    /// OP_NOP1, OP_NOP4..OP_NOP10 (upgradable no-ops)
    Nop,
    /// Fails if executed (OP_RESERVED, OP_VER, OP_RESERVED1/2)
    Reserved,
    /// Fails even in an unexecuted branch (OP_CAT.., OP_VERIF..)
    Disabled,
    /// Unassigned opcode value; fails if executed
    Invalid,
}

/// Static metadata for one opcode value.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub code: u8,
    pub name: &'static str,
    pub class: OpcodeClass,
}

/// Look up the metadata record for an opcode value.
#[inline]
pub fn info(opcode: u8) -> &'static OpcodeInfo {
    &OPCODE_TABLE[opcode as usize]
}

/// True for opcodes whose only effect is placing data on the stack.
/// These do not count toward the operation limit.
#[inline]
pub fn is_push(opcode: u8) -> bool {
    opcode <= OP_16
}

const fn classify(op: u8) -> OpcodeClass {
    use OpcodeClass::*;
    match op {
        0x01..=0x4e => PushBytes,
        OP_0 | OP_1NEGATE | OP_1..=OP_16 => Constant,
        OP_RESERVED | OP_VER | OP_RESERVED1 | OP_RESERVED2 => Reserved,
        OP_NOP | OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF | OP_VERIFY | OP_RETURN => FlowControl,
        OP_VERIF | OP_VERNOTIF => Disabled,
        OP_TOALTSTACK..=OP_TUCK => Stack,
        OP_CAT..=OP_RIGHT => Disabled,
        OP_SIZE => Splice,
        OP_INVERT..=OP_XOR => Disabled,
        OP_EQUAL | OP_EQUALVERIFY => Bitwise,
        OP_2MUL | OP_2DIV | OP_MUL | OP_DIV | OP_MOD | OP_LSHIFT | OP_RSHIFT => Disabled,
        OP_1ADD..=OP_WITHIN => Arithmetic,
        OP_RIPEMD160..=OP_CHECKMULTISIGVERIFY => Crypto,
        OP_CHECKLOCKTIMEVERIFY | OP_CHECKSEQUENCEVERIFY => Locktime,
        OP_NOP1 | OP_NOP4..=OP_NOP10 => Nop,
        _ => Invalid,
    }
}

const fn name_of(op: u8) -> &'static str {
    match op {
        OP_0 => "OP_0",
        0x01..=0x4b => PUSHBYTES_NAMES[(op - 1) as usize],
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SUBSTR => "OP_SUBSTR",
        OP_LEFT => "OP_LEFT",
        OP_RIGHT => "OP_RIGHT",
        OP_SIZE => "OP_SIZE",
        OP_INVERT => "OP_INVERT",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_RESERVED1 => "OP_RESERVED1",
        OP_RESERVED2 => "OP_RESERVED2",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_2MUL => "OP_2MUL",
        OP_2DIV => "OP_2DIV",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_LSHIFT => "OP_LSHIFT",
        OP_RSHIFT => "OP_RSHIFT",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_NOP1 => "OP_NOP1",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        OP_NOP4 => "OP_NOP4",
        OP_NOP5 => "OP_NOP5",
        OP_NOP6 => "OP_NOP6",
        OP_NOP7 => "OP_NOP7",
        OP_NOP8 => "OP_NOP8",
        OP_NOP9 => "OP_NOP9",
        OP_NOP10 => "OP_NOP10",
        _ => "OP_UNKNOWN",
    }
}

#[rustfmt::skip]
const PUSHBYTES_NAMES: [&str; 75] = [
    "OP_PUSHBYTES_1", "OP_PUSHBYTES_2", "OP_PUSHBYTES_3", "OP_PUSHBYTES_4",
    "OP_PUSHBYTES_5", "OP_PUSHBYTES_6", "OP_PUSHBYTES_7", "OP_PUSHBYTES_8",
    "OP_PUSHBYTES_9", "OP_PUSHBYTES_10", "OP_PUSHBYTES_11", "OP_PUSHBYTES_12",
    "OP_PUSHBYTES_13", "OP_PUSHBYTES_14", "OP_PUSHBYTES_15", "OP_PUSHBYTES_16",
    "OP_PUSHBYTES_17", "OP_PUSHBYTES_18", "OP_PUSHBYTES_19", "OP_PUSHBYTES_20",
    "OP_PUSHBYTES_21", "OP_PUSHBYTES_22", "OP_PUSHBYTES_23", "OP_PUSHBYTES_24",
    "OP_PUSHBYTES_25", "OP_PUSHBYTES_26", "OP_PUSHBYTES_27", "OP_PUSHBYTES_28",
    "OP_PUSHBYTES_29", "OP_PUSHBYTES_30", "OP_PUSHBYTES_31", "OP_PUSHBYTES_32",
    "OP_PUSHBYTES_33", "OP_PUSHBYTES_34", "OP_PUSHBYTES_35", "OP_PUSHBYTES_36",
    "OP_PUSHBYTES_37", "OP_PUSHBYTES_38", "OP_PUSHBYTES_39", "OP_PUSHBYTES_40",
    "OP_PUSHBYTES_41", "OP_PUSHBYTES_42", "OP_PUSHBYTES_43", "OP_PUSHBYTES_44",
    "OP_PUSHBYTES_45", "OP_PUSHBYTES_46", "OP_PUSHBYTES_47", "OP_PUSHBYTES_48",
    "OP_PUSHBYTES_49", "OP_PUSHBYTES_50", "OP_PUSHBYTES_51", "OP_PUSHBYTES_52",
    "OP_PUSHBYTES_53", "OP_PUSHBYTES_54", "OP_PUSHBYTES_55", "OP_PUSHBYTES_56",
    "OP_PUSHBYTES_57", "OP_PUSHBYTES_58", "OP_PUSHBYTES_59", "OP_PUSHBYTES_60",
    "OP_PUSHBYTES_61", "OP_PUSHBYTES_62", "OP_PUSHBYTES_63", "OP_PUSHBYTES_64",
    "OP_PUSHBYTES_65", "OP_PUSHBYTES_66", "OP_PUSHBYTES_67", "OP_PUSHBYTES_68",
    "OP_PUSHBYTES_69", "OP_PUSHBYTES_70", "OP_PUSHBYTES_71", "OP_PUSHBYTES_72",
    "OP_PUSHBYTES_73", "OP_PUSHBYTES_74", "OP_PUSHBYTES_75",
];

const fn build_table() -> [OpcodeInfo; 256] {
    let mut table = [OpcodeInfo {
        code: 0,
        name: "",
        class: OpcodeClass::Invalid,
    }; 256];
    let mut op = 0usize;
    while op < 256 {
        table[op] = OpcodeInfo {
            code: op as u8,
            name: name_of(op as u8),
            class: classify(op as u8),
        };
        op += 1;
    }
    table
}

/// Process-wide read-only opcode table, built at compile time.
pub static OPCODE_TABLE: [OpcodeInfo; 256] = build_table();

/// Resolve a canonical opcode name (case-sensitive) to its value.
///
/// Aliases `OP_FALSE`/`OP_TRUE`/`OP_NOP2`/`OP_NOP3` are accepted; unknown
/// or unassigned names yield `None`.
pub fn opcode_by_name(name: &str) -> Option<u8> {
    match name {
        "OP_FALSE" => return Some(OP_0),
        "OP_TRUE" => return Some(OP_1),
        "OP_NOP2" => return Some(OP_CHECKLOCKTIMEVERIFY),
        "OP_NOP3" => return Some(OP_CHECKSEQUENCEVERIFY),
        _ => {}
    }
    OPCODE_TABLE
        .iter()
        .find(|i| i.name == name && !matches!(i.class, OpcodeClass::Invalid))
        .map(|i| i.code)
}
