//! Transaction digests for signature checking
//!
//! The legacy digest serializes a modified copy of the spending
//! transaction; the BIP143 digest commits to the spent amount and hashes
//! shared preimage sections once. Which one applies is chosen by
//! [`SigVersion`](crate::flags::SigVersion).

use crate::hashes::hash256;
use crate::serialization::{write_var_bytes, write_varint};
use crate::types::{Hash, Transaction};

/// Sign all outputs.
pub const SIGHASH_ALL: u32 = 0x01;
/// Sign no outputs.
pub const SIGHASH_NONE: u32 = 0x02;
/// Sign only the output paired with the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;
/// Sign only the signed input, leaving others free to change.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// The digest returned when SIGHASH_SINGLE refers past the last output.
/// Historical quirk: the value 1 is signed instead of any transaction data.
pub const ONE_HASH: Hash = {
    let mut hash = [0u8; 32];
    hash[0] = 0x01;
    hash
};

/// True if the hash type byte names a defined mode.
pub fn is_defined_hash_type(hash_type: u32) -> bool {
    let base = hash_type & !SIGHASH_ANYONECANPAY;
    (SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base)
}

fn base_type(hash_type: u32) -> u32 {
    hash_type & 0x1f
}

fn anyone_can_pay(hash_type: u32) -> bool {
    hash_type & SIGHASH_ANYONECANPAY != 0
}

/// Legacy signature digest.
///
/// `script_code` is the executed script from the byte after the most
/// recent OP_CODESEPARATOR, with any remaining OP_CODESEPARATOR bytes
/// removed by the caller. When SIGHASH_SINGLE points past the last output
/// the digest is [`ONE_HASH`] without any hashing.
pub fn legacy_sighash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    hash_type: u32,
) -> Hash {
    // an index past the last input can never be signed; the value 1 is
    // hashed in its place, as with the SIGHASH_SINGLE quirk below
    if input_index >= tx.inputs.len() {
        return ONE_HASH;
    }
    let base = base_type(hash_type);
    if base == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return ONE_HASH;
    }

    let mut preimage = Vec::with_capacity(256);
    preimage.extend_from_slice(&tx.version.to_le_bytes());

    if anyone_can_pay(hash_type) {
        let input = &tx.inputs[input_index];
        write_varint(&mut preimage, 1);
        preimage.extend_from_slice(&input.prevout.hash);
        preimage.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_var_bytes(&mut preimage, script_code);
        preimage.extend_from_slice(&input.sequence.to_le_bytes());
    } else {
        write_varint(&mut preimage, tx.inputs.len() as u64);
        for (i, input) in tx.inputs.iter().enumerate() {
            preimage.extend_from_slice(&input.prevout.hash);
            preimage.extend_from_slice(&input.prevout.index.to_le_bytes());
            if i == input_index {
                write_var_bytes(&mut preimage, script_code);
            } else {
                write_varint(&mut preimage, 0);
            }
            // other inputs' sequences are blanked so they stay malleable
            let sequence = if i == input_index || base == SIGHASH_ALL {
                input.sequence
            } else {
                0
            };
            preimage.extend_from_slice(&sequence.to_le_bytes());
        }
    }

    match base {
        SIGHASH_NONE => write_varint(&mut preimage, 0),
        SIGHASH_SINGLE => {
            write_varint(&mut preimage, input_index as u64 + 1);
            for _ in 0..input_index {
                // null outputs before the paired one
                preimage.extend_from_slice(&(-1i64).to_le_bytes());
                write_varint(&mut preimage, 0);
            }
            let paired = &tx.outputs[input_index];
            preimage.extend_from_slice(&paired.value.to_le_bytes());
            write_var_bytes(&mut preimage, &paired.script_pubkey);
        }
        _ => {
            write_varint(&mut preimage, tx.outputs.len() as u64);
            for output in &tx.outputs {
                preimage.extend_from_slice(&output.value.to_le_bytes());
                write_var_bytes(&mut preimage, &output.script_pubkey);
            }
        }
    }

    preimage.extend_from_slice(&tx.lock_time.to_le_bytes());
    preimage.extend_from_slice(&hash_type.to_le_bytes());
    hash256(&preimage)
}

/// BIP143 signature digest, committing to the spent output's amount.
pub fn witness_v0_sighash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    amount: i64,
    hash_type: u32,
) -> Hash {
    if input_index >= tx.inputs.len() {
        return ONE_HASH;
    }
    let base = base_type(hash_type);
    let acp = anyone_can_pay(hash_type);

    let hash_prevouts = if acp {
        [0u8; 32]
    } else {
        let mut buf = Vec::with_capacity(36 * tx.inputs.len());
        for input in &tx.inputs {
            buf.extend_from_slice(&input.prevout.hash);
            buf.extend_from_slice(&input.prevout.index.to_le_bytes());
        }
        hash256(&buf)
    };

    let hash_sequence = if acp || base != SIGHASH_ALL {
        [0u8; 32]
    } else {
        let mut buf = Vec::with_capacity(4 * tx.inputs.len());
        for input in &tx.inputs {
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        hash256(&buf)
    };

    let hash_outputs = if base != SIGHASH_SINGLE && base != SIGHASH_NONE {
        let mut buf = Vec::new();
        for output in &tx.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            write_var_bytes(&mut buf, &output.script_pubkey);
        }
        hash256(&buf)
    } else if base == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        let output = &tx.outputs[input_index];
        let mut buf = Vec::new();
        buf.extend_from_slice(&output.value.to_le_bytes());
        write_var_bytes(&mut buf, &output.script_pubkey);
        hash256(&buf)
    } else {
        [0u8; 32]
    };

    let input = &tx.inputs[input_index];
    let mut preimage = Vec::with_capacity(156 + script_code.len());
    preimage.extend_from_slice(&tx.version.to_le_bytes());
    preimage.extend_from_slice(&hash_prevouts);
    preimage.extend_from_slice(&hash_sequence);
    preimage.extend_from_slice(&input.prevout.hash);
    preimage.extend_from_slice(&input.prevout.index.to_le_bytes());
    write_var_bytes(&mut preimage, script_code);
    preimage.extend_from_slice(&amount.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.to_le_bytes());
    preimage.extend_from_slice(&hash_outputs);
    preimage.extend_from_slice(&tx.lock_time.to_le_bytes());
    preimage.extend_from_slice(&hash_type.to_le_bytes());
    hash256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutPoint, TransactionInput, TransactionOutput};

    fn two_in_two_out() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![
                TransactionInput {
                    prevout: OutPoint {
                        hash: [0x11; 32],
                        index: 0,
                    },
                    script_sig: Vec::new(),
                    sequence: 0xffff_ffff,
                },
                TransactionInput {
                    prevout: OutPoint {
                        hash: [0x22; 32],
                        index: 1,
                    },
                    script_sig: Vec::new(),
                    sequence: 0xffff_fffe,
                },
            ],
            outputs: vec![
                TransactionOutput {
                    value: 40_000,
                    script_pubkey: vec![0x51],
                },
                TransactionOutput {
                    value: 9_000,
                    script_pubkey: vec![0x52],
                },
            ],
            lock_time: 0,
        }
    }

    #[test]
    fn defined_hash_types() {
        for ht in [0x01, 0x02, 0x03, 0x81, 0x82, 0x83] {
            assert!(is_defined_hash_type(ht), "{ht:#x}");
        }
        for ht in [0x00, 0x04, 0x20, 0x80, 0xff] {
            assert!(!is_defined_hash_type(ht), "{ht:#x}");
        }
    }

    #[test]
    fn single_past_last_output_is_one_hash() {
        let mut tx = two_in_two_out();
        tx.outputs.truncate(1);
        let digest = legacy_sighash(&tx, 1, &[0x51], SIGHASH_SINGLE);
        assert_eq!(digest, ONE_HASH);
        // in range, the quirk does not trigger
        let digest = legacy_sighash(&tx, 0, &[0x51], SIGHASH_SINGLE);
        assert_ne!(digest, ONE_HASH);
    }

    #[test]
    fn input_index_past_last_input_is_one_hash() {
        let tx = two_in_two_out();
        for ht in [SIGHASH_ALL, SIGHASH_ALL | SIGHASH_ANYONECANPAY] {
            assert_eq!(legacy_sighash(&tx, 5, &[0x51], ht), ONE_HASH);
            assert_eq!(witness_v0_sighash(&tx, 5, &[0x51], 40_000, ht), ONE_HASH);
        }
    }

    #[test]
    fn hash_type_modes_produce_distinct_digests() {
        let tx = two_in_two_out();
        let code = [0x76, 0xa9];
        let all = legacy_sighash(&tx, 0, &code, SIGHASH_ALL);
        let none = legacy_sighash(&tx, 0, &code, SIGHASH_NONE);
        let single = legacy_sighash(&tx, 0, &code, SIGHASH_SINGLE);
        let acp = legacy_sighash(&tx, 0, &code, SIGHASH_ALL | SIGHASH_ANYONECANPAY);
        assert_ne!(all, none);
        assert_ne!(all, single);
        assert_ne!(all, acp);
        assert_ne!(none, single);
    }

    #[test]
    fn none_blanks_other_sequences() {
        let mut tx = two_in_two_out();
        let code = [0x51];
        let before = legacy_sighash(&tx, 0, &code, SIGHASH_NONE);
        tx.inputs[1].sequence = 0;
        let after = legacy_sighash(&tx, 0, &code, SIGHASH_NONE);
        assert_eq!(before, after);
        // but with SIGHASH_ALL the sequence is committed
        tx.inputs[1].sequence = 7;
        let all_a = legacy_sighash(&tx, 0, &code, SIGHASH_ALL);
        tx.inputs[1].sequence = 8;
        let all_b = legacy_sighash(&tx, 0, &code, SIGHASH_ALL);
        assert_ne!(all_a, all_b);
    }

    #[test]
    fn anyone_can_pay_ignores_other_inputs() {
        let mut tx = two_in_two_out();
        let code = [0x51];
        let before = legacy_sighash(&tx, 0, &code, SIGHASH_ALL | SIGHASH_ANYONECANPAY);
        tx.inputs[1].prevout.index = 42;
        tx.inputs[1].sequence = 0;
        let after = legacy_sighash(&tx, 0, &code, SIGHASH_ALL | SIGHASH_ANYONECANPAY);
        assert_eq!(before, after);
    }

    #[test]
    fn witness_digest_commits_to_amount() {
        let tx = two_in_two_out();
        let code = [0x76, 0xa9];
        let a = witness_v0_sighash(&tx, 0, &code, 40_000, SIGHASH_ALL);
        let b = witness_v0_sighash(&tx, 0, &code, 40_001, SIGHASH_ALL);
        assert_ne!(a, b);
        // the legacy digest has no amount commitment
        assert_ne!(a, legacy_sighash(&tx, 0, &code, SIGHASH_ALL));
    }
}
