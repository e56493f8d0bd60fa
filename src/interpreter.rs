//! Script execution
//!
//! [`eval_script`] runs a single script against a stack; [`verify_script`]
//! runs an unlock/lock script pair the way transaction validation does,
//! including pay-to-script-hash composition. Execution is strict: any
//! rejection is a hard error carried out through `Result`, and the only
//! "soft" failure is a signature check pushing false.

use crate::checksig::{check_pubkey_encoding, check_signature_encoding, SignatureChecker};
use crate::constants::{
    MAX_LOCKTIME_SCRIPTNUM_SIZE, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG,
    MAX_SCRIPT_ELEMENT_SIZE, MAX_SCRIPT_SIZE, MAX_STACK_SIZE, SEQUENCE_LOCKTIME_DISABLE_FLAG,
};
use crate::error::{Result, ScriptError};
use crate::flags::{SigVersion, VerifyFlags};
use crate::hashes;
use crate::num::ScriptNum;
use crate::opcodes::{self, OpcodeClass};
use crate::parser::{constant_value, is_push_only, InstructionIter};
use crate::stack::{cast_to_bool, Stack};

/// Remove every OP_CODESEPARATOR instruction from a script, leaving all
/// other instruction bytes untouched. A malformed tail is preserved so
/// the digest covers exactly what would execute.
fn strip_code_separators(script: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(script.len());
    let mut iter = InstructionIter::new(script);
    let mut start = 0;
    while let Some(item) = iter.next() {
        let end = iter.position();
        match item {
            Ok(ins) if ins.opcode == opcodes::OP_CODESEPARATOR => {}
            Ok(_) => out.extend_from_slice(&script[start..end]),
            Err(_) => {
                out.extend_from_slice(&script[start..]);
                break;
            }
        }
        start = end;
    }
    out
}

/// True if the script is the pay-to-script-hash pattern:
/// `OP_HASH160 <20 bytes> OP_EQUAL`.
pub fn is_p2sh(script: &[u8]) -> bool {
    script.len() == 23
        && script[0] == opcodes::OP_HASH160
        && script[1] == 0x14
        && script[22] == opcodes::OP_EQUAL
}

struct Machine<'a> {
    stack: &'a mut Stack,
    alt: Stack,
    flags: VerifyFlags,
    checker: &'a dyn SignatureChecker,
    sig_version: SigVersion,
    /// Nesting of OP_IF frames; `true` means the branch executes.
    exec: Vec<bool>,
    op_count: usize,
}

impl<'a> Machine<'a> {
    fn executing(&self) -> bool {
        self.exec.iter().all(|&b| b)
    }

    fn require_minimal(&self) -> bool {
        self.flags.require_minimal()
    }

    fn count_op(&mut self, extra: usize) -> Result<()> {
        self.op_count += extra;
        if self.op_count > MAX_OPS_PER_SCRIPT {
            return Err(ScriptError::OpCount);
        }
        Ok(())
    }

    fn pop_num(&mut self) -> Result<ScriptNum> {
        let bytes = self.stack.pop()?;
        ScriptNum::decode_operand(&bytes, self.require_minimal())
    }

    fn push_num(&mut self, value: i64) {
        self.stack.push_unchecked(ScriptNum(value).encode());
    }

    fn push_bool(&mut self, value: bool) {
        self.stack
            .push_unchecked(if value { vec![1] } else { Vec::new() });
    }

    fn check_depth(&self) -> Result<()> {
        if self.stack.len() + self.alt.len() > MAX_STACK_SIZE {
            return Err(ScriptError::StackSize);
        }
        Ok(())
    }
}

/// Execute one script against `stack`.
///
/// The stack is left in whatever state execution reached; callers decide
/// what a successful final stack looks like. `Ok(())` means the script
/// ran to completion without a rejection.
pub fn eval_script(
    stack: &mut Stack,
    script: &[u8],
    flags: VerifyFlags,
    checker: &dyn SignatureChecker,
    sig_version: SigVersion,
) -> Result<()> {
    if script.len() > MAX_SCRIPT_SIZE {
        return Err(ScriptError::ScriptSize);
    }

    let mut machine = Machine {
        stack,
        alt: Stack::new(),
        flags,
        checker,
        sig_version,
        exec: Vec::new(),
        op_count: 0,
    };

    // offset of the byte after the most recent executed OP_CODESEPARATOR
    let mut begin_code = 0usize;
    let mut iter = InstructionIter::new(script);

    loop {
        let ins = match iter.next() {
            Some(ins) => ins?,
            None => break,
        };
        let op = ins.opcode;
        let class = opcodes::info(op).class;
        let executing = machine.executing();

        // rejected wherever they appear, executed or not
        if class == OpcodeClass::Disabled {
            return Err(ScriptError::DisabledOpcode);
        }
        if op == opcodes::OP_RETURN {
            return Err(ScriptError::OpReturn);
        }
        if ins.payload().len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptError::PushSize);
        }

        if !executing {
            // conditional opcodes are evaluated even in a not-taken branch
            // and count like any other executed opcode
            match op {
                opcodes::OP_IF | opcodes::OP_NOTIF => {
                    machine.count_op(1)?;
                    machine.exec.push(false);
                }
                opcodes::OP_ELSE => {
                    machine.count_op(1)?;
                    let top = machine
                        .exec
                        .last_mut()
                        .ok_or(ScriptError::UnbalancedConditional)?;
                    *top = !*top;
                }
                opcodes::OP_ENDIF => {
                    machine.count_op(1)?;
                    machine
                        .exec
                        .pop()
                        .ok_or(ScriptError::UnbalancedConditional)?;
                }
                _ => {}
            }
            continue;
        }

        if !opcodes::is_push(op) {
            machine.count_op(1)?;
        }

        if ins.data.is_some() {
            if machine.require_minimal() && !ins.is_minimal_push() {
                return Err(ScriptError::MinimalData);
            }
            machine.stack.push(ins.payload().to_vec())?;
            machine.check_depth()?;
            continue;
        }

        match op {
            // ---- constants ----
            opcodes::OP_1NEGATE | opcodes::OP_1..=opcodes::OP_16 => {
                machine.stack.push_unchecked(constant_value(&ins));
            }

            // ---- flow control ----
            opcodes::OP_NOP => {}
            opcodes::OP_IF | opcodes::OP_NOTIF => {
                if machine.stack.is_empty() {
                    return Err(ScriptError::UnbalancedConditional);
                }
                let mut value = machine.stack.pop_bool()?;
                if op == opcodes::OP_NOTIF {
                    value = !value;
                }
                machine.exec.push(value);
            }
            opcodes::OP_ELSE => {
                let top = machine
                    .exec
                    .last_mut()
                    .ok_or(ScriptError::UnbalancedConditional)?;
                *top = !*top;
            }
            opcodes::OP_ENDIF => {
                machine
                    .exec
                    .pop()
                    .ok_or(ScriptError::UnbalancedConditional)?;
            }
            opcodes::OP_VERIFY => {
                if !machine.stack.pop_bool()? {
                    return Err(ScriptError::Verify);
                }
            }

            // ---- stack ----
            opcodes::OP_TOALTSTACK => {
                let item = machine.stack.pop()?;
                machine.alt.push_unchecked(item);
            }
            opcodes::OP_FROMALTSTACK => {
                let item = machine
                    .alt
                    .pop()
                    .map_err(|_| ScriptError::InvalidAltstackOperation)?;
                machine.stack.push_unchecked(item);
            }
            opcodes::OP_2DROP => {
                machine.stack.pop()?;
                machine.stack.pop()?;
            }
            opcodes::OP_2DUP => {
                let a = machine.stack.peek(1)?.clone();
                let b = machine.stack.peek(0)?.clone();
                machine.stack.push_unchecked(a);
                machine.stack.push_unchecked(b);
            }
            opcodes::OP_3DUP => {
                let a = machine.stack.peek(2)?.clone();
                let b = machine.stack.peek(1)?.clone();
                let c = machine.stack.peek(0)?.clone();
                machine.stack.push_unchecked(a);
                machine.stack.push_unchecked(b);
                machine.stack.push_unchecked(c);
            }
            opcodes::OP_2OVER => {
                let a = machine.stack.peek(3)?.clone();
                let b = machine.stack.peek(2)?.clone();
                machine.stack.push_unchecked(a);
                machine.stack.push_unchecked(b);
            }
            opcodes::OP_2ROT => {
                let a = machine.stack.remove(5)?;
                let b = machine.stack.remove(4)?;
                machine.stack.push_unchecked(a);
                machine.stack.push_unchecked(b);
            }
            opcodes::OP_2SWAP => {
                machine.stack.swap(3, 1)?;
                machine.stack.swap(2, 0)?;
            }
            opcodes::OP_IFDUP => {
                if machine.stack.peek_bool()? {
                    let top = machine.stack.peek(0)?.clone();
                    machine.stack.push_unchecked(top);
                }
            }
            opcodes::OP_DEPTH => {
                let depth = machine.stack.len() as i64;
                machine.push_num(depth);
            }
            opcodes::OP_DROP => {
                machine.stack.pop()?;
            }
            opcodes::OP_DUP => {
                let top = machine.stack.peek(0)?.clone();
                machine.stack.push_unchecked(top);
            }
            opcodes::OP_NIP => {
                machine.stack.remove(1)?;
            }
            opcodes::OP_OVER => {
                let second = machine.stack.peek(1)?.clone();
                machine.stack.push_unchecked(second);
            }
            opcodes::OP_PICK | opcodes::OP_ROLL => {
                let depth = machine.pop_num()?.0;
                if depth < 0 || depth as usize >= machine.stack.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                let depth = depth as usize;
                if op == opcodes::OP_PICK {
                    let item = machine.stack.peek(depth)?.clone();
                    machine.stack.push_unchecked(item);
                } else {
                    let item = machine.stack.remove(depth)?;
                    machine.stack.push_unchecked(item);
                }
            }
            opcodes::OP_ROT => {
                let third = machine.stack.remove(2)?;
                machine.stack.push_unchecked(third);
            }
            opcodes::OP_SWAP => {
                machine.stack.swap(0, 1)?;
            }
            opcodes::OP_TUCK => {
                let top = machine.stack.peek(0)?.clone();
                machine.stack.insert(2, top)?;
            }
            opcodes::OP_SIZE => {
                let len = machine.stack.peek(0)?.len() as i64;
                machine.push_num(len);
            }

            // ---- comparison ----
            opcodes::OP_EQUAL | opcodes::OP_EQUALVERIFY => {
                let b = machine.stack.pop()?;
                let a = machine.stack.pop()?;
                let equal = a == b;
                if op == opcodes::OP_EQUALVERIFY {
                    if !equal {
                        return Err(ScriptError::EqualVerify);
                    }
                } else {
                    machine.push_bool(equal);
                }
            }

            // ---- arithmetic ----
            opcodes::OP_1ADD
            | opcodes::OP_1SUB
            | opcodes::OP_NEGATE
            | opcodes::OP_ABS
            | opcodes::OP_NOT
            | opcodes::OP_0NOTEQUAL => {
                let value = machine.pop_num()?.0;
                let result = match op {
                    opcodes::OP_1ADD => value + 1,
                    opcodes::OP_1SUB => value - 1,
                    opcodes::OP_NEGATE => -value,
                    opcodes::OP_ABS => value.abs(),
                    opcodes::OP_NOT => i64::from(value == 0),
                    _ => i64::from(value != 0),
                };
                machine.push_num(result);
            }
            opcodes::OP_ADD
            | opcodes::OP_SUB
            | opcodes::OP_BOOLAND
            | opcodes::OP_BOOLOR
            | opcodes::OP_NUMEQUAL
            | opcodes::OP_NUMEQUALVERIFY
            | opcodes::OP_NUMNOTEQUAL
            | opcodes::OP_LESSTHAN
            | opcodes::OP_GREATERTHAN
            | opcodes::OP_LESSTHANOREQUAL
            | opcodes::OP_GREATERTHANOREQUAL
            | opcodes::OP_MIN
            | opcodes::OP_MAX => {
                let b = machine.pop_num()?.0;
                let a = machine.pop_num()?.0;
                let result = match op {
                    opcodes::OP_ADD => a + b,
                    opcodes::OP_SUB => a - b,
                    opcodes::OP_BOOLAND => i64::from(a != 0 && b != 0),
                    opcodes::OP_BOOLOR => i64::from(a != 0 || b != 0),
                    opcodes::OP_NUMEQUAL | opcodes::OP_NUMEQUALVERIFY => i64::from(a == b),
                    opcodes::OP_NUMNOTEQUAL => i64::from(a != b),
                    opcodes::OP_LESSTHAN => i64::from(a < b),
                    opcodes::OP_GREATERTHAN => i64::from(a > b),
                    opcodes::OP_LESSTHANOREQUAL => i64::from(a <= b),
                    opcodes::OP_GREATERTHANOREQUAL => i64::from(a >= b),
                    opcodes::OP_MIN => a.min(b),
                    _ => a.max(b),
                };
                if op == opcodes::OP_NUMEQUALVERIFY {
                    if result == 0 {
                        return Err(ScriptError::NumEqualVerify);
                    }
                } else {
                    machine.push_num(result);
                }
            }
            opcodes::OP_WITHIN => {
                let max = machine.pop_num()?.0;
                let min = machine.pop_num()?.0;
                let value = machine.pop_num()?.0;
                machine.push_bool(min <= value && value < max);
            }

            // ---- crypto ----
            opcodes::OP_RIPEMD160 => {
                let data = machine.stack.pop()?;
                machine.stack.push_unchecked(hashes::ripemd160(&data).to_vec());
            }
            opcodes::OP_SHA1 => {
                let data = machine.stack.pop()?;
                machine.stack.push_unchecked(hashes::sha1(&data).to_vec());
            }
            opcodes::OP_SHA256 => {
                let data = machine.stack.pop()?;
                machine.stack.push_unchecked(hashes::sha256(&data).to_vec());
            }
            opcodes::OP_HASH160 => {
                let data = machine.stack.pop()?;
                machine.stack.push_unchecked(hashes::hash160(&data).to_vec());
            }
            opcodes::OP_HASH256 => {
                let data = machine.stack.pop()?;
                machine.stack.push_unchecked(hashes::hash256(&data).to_vec());
            }
            opcodes::OP_CODESEPARATOR => {
                begin_code = iter.position();
            }
            opcodes::OP_CHECKSIG | opcodes::OP_CHECKSIGVERIFY => {
                let pubkey = machine.stack.pop()?;
                let sig = machine.stack.pop()?;
                check_signature_encoding(&sig, machine.flags)?;
                check_pubkey_encoding(&pubkey, machine.flags)?;
                let script_code = strip_code_separators(&script[begin_code..]);
                let success =
                    machine
                        .checker
                        .check_sig(&sig, &pubkey, &script_code, machine.sig_version);
                if op == opcodes::OP_CHECKSIGVERIFY {
                    if !success {
                        return Err(ScriptError::CheckSigVerify);
                    }
                } else {
                    machine.push_bool(success);
                }
            }
            opcodes::OP_CHECKMULTISIG | opcodes::OP_CHECKMULTISIGVERIFY => {
                let key_count = machine.pop_num()?.0;
                if key_count < 0 || key_count > MAX_PUBKEYS_PER_MULTISIG {
                    return Err(ScriptError::PubkeyCount);
                }
                machine.count_op(key_count as usize)?;
                let mut keys = Vec::with_capacity(key_count as usize);
                for _ in 0..key_count {
                    keys.push(machine.stack.pop()?);
                }
                keys.reverse();

                let sig_count = machine.pop_num()?.0;
                if sig_count < 0 || sig_count > key_count {
                    return Err(ScriptError::SigCount);
                }
                let mut sigs = Vec::with_capacity(sig_count as usize);
                for _ in 0..sig_count {
                    sigs.push(machine.stack.pop()?);
                }
                sigs.reverse();

                // historical off-by-one consumes one extra element
                let dummy = machine.stack.pop()?;
                if machine.flags.contains(VerifyFlags::NULLDUMMY) && !dummy.is_empty() {
                    return Err(ScriptError::SigNullDummy);
                }

                let script_code = strip_code_separators(&script[begin_code..]);
                let mut key_idx = 0usize;
                let mut sig_idx = 0usize;
                let mut success = true;
                while success && sig_idx < sigs.len() {
                    let sig = &sigs[sig_idx];
                    let key = &keys[key_idx];
                    check_signature_encoding(sig, machine.flags)?;
                    check_pubkey_encoding(key, machine.flags)?;
                    if machine
                        .checker
                        .check_sig(sig, key, &script_code, machine.sig_version)
                    {
                        sig_idx += 1;
                    }
                    key_idx += 1;
                    // signatures must match keys in order, so once fewer
                    // keys remain than signatures the check cannot succeed
                    if sigs.len() - sig_idx > keys.len() - key_idx {
                        success = false;
                    }
                }

                if op == opcodes::OP_CHECKMULTISIGVERIFY {
                    if !success {
                        return Err(ScriptError::CheckMultiSigVerify);
                    }
                } else {
                    machine.push_bool(success);
                }
            }

            // ---- lock time ----
            opcodes::OP_CHECKLOCKTIMEVERIFY => {
                if !machine.flags.contains(VerifyFlags::CHECKLOCKTIMEVERIFY) {
                    if machine
                        .flags
                        .contains(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS)
                    {
                        return Err(ScriptError::DiscourageUpgradableNops);
                    }
                } else {
                    let operand = ScriptNum::decode(
                        machine.stack.peek(0)?,
                        machine.require_minimal(),
                        MAX_LOCKTIME_SCRIPTNUM_SIZE,
                    )?;
                    if operand.0 < 0 {
                        return Err(ScriptError::NegativeLockTime);
                    }
                    if !machine.checker.check_lock_time(operand.0) {
                        return Err(ScriptError::UnsatisfiedLockTime);
                    }
                }
            }
            opcodes::OP_CHECKSEQUENCEVERIFY => {
                if !machine.flags.contains(VerifyFlags::CHECKSEQUENCEVERIFY) {
                    if machine
                        .flags
                        .contains(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS)
                    {
                        return Err(ScriptError::DiscourageUpgradableNops);
                    }
                } else {
                    let operand = ScriptNum::decode(
                        machine.stack.peek(0)?,
                        machine.require_minimal(),
                        MAX_LOCKTIME_SCRIPTNUM_SIZE,
                    )?;
                    if operand.0 < 0 {
                        return Err(ScriptError::NegativeLockTime);
                    }
                    // the disable bit turns the opcode into a no-op
                    if operand.0 & i64::from(SEQUENCE_LOCKTIME_DISABLE_FLAG) == 0
                        && !machine.checker.check_sequence(operand.0)
                    {
                        return Err(ScriptError::UnsatisfiedLockTime);
                    }
                }
            }

            // ---- upgradable no-ops ----
            opcodes::OP_NOP1 | opcodes::OP_NOP4..=opcodes::OP_NOP10 => {
                if machine
                    .flags
                    .contains(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS)
                {
                    return Err(ScriptError::DiscourageUpgradableNops);
                }
            }

            _ => return Err(ScriptError::BadOpcode),
        }

        machine.check_depth()?;
    }

    if !machine.exec.is_empty() {
        return Err(ScriptError::UnbalancedConditional);
    }
    Ok(())
}

/// Run an unlock script followed by its lock script the way transaction
/// validation does.
///
/// Succeeds only when execution finishes with exactly one element on the
/// stack and that element is true. Pay-to-script-hash lock scripts are
/// composed when [`VerifyFlags::P2SH`] is set: the last unlock push is
/// deserialized and executed as the real lock script.
pub fn verify_script(
    script_sig: &[u8],
    script_pubkey: &[u8],
    flags: VerifyFlags,
    checker: &dyn SignatureChecker,
    sig_version: SigVersion,
) -> Result<()> {
    if flags.contains(VerifyFlags::SIGPUSHONLY) && !is_push_only(script_sig) {
        return Err(ScriptError::SigPushOnly);
    }

    let mut stack = Stack::new();
    eval_script(&mut stack, script_sig, flags, checker, sig_version)?;

    let run_p2sh = flags.contains(VerifyFlags::P2SH) && is_p2sh(script_pubkey);
    let saved = if run_p2sh { Some(stack.clone()) } else { None };

    eval_script(&mut stack, script_pubkey, flags, checker, sig_version)?;
    if stack.is_empty() || !cast_to_bool(stack.peek(0)?) {
        return Err(ScriptError::EvalFalse);
    }

    if let Some(saved) = saved {
        // the unlock script must be pure data or the redeem script bytes
        // would not round-trip through the stack
        if !is_push_only(script_sig) {
            return Err(ScriptError::SigPushOnly);
        }
        stack = saved;
        let redeem_script = stack.pop()?;
        eval_script(&mut stack, &redeem_script, flags, checker, sig_version)?;
        if stack.is_empty() || !cast_to_bool(stack.peek(0)?) {
            return Err(ScriptError::EvalFalse);
        }
    }

    if stack.len() != 1 {
        return Err(ScriptError::CleanStack);
    }
    Ok(())
}
