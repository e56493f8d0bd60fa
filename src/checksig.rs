//! Signature, public key and lock-time checking
//!
//! Encoding checks (strict DER, low-S, pubkey form, defined hash type)
//! are hard errors controlled by verification flags; an encoding that
//! passes them but fails cryptographic verification merely yields false.
//! The [`SignatureChecker`] trait is the seam between the interpreter and
//! the transaction context, so scripts without signature operations can
//! run with no transaction at all.

use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, VerifyOnly};

use crate::constants::{LOCKTIME_THRESHOLD, SEQUENCE_FINAL, SEQUENCE_LOCKTIME_DISABLE_FLAG,
    SEQUENCE_LOCKTIME_MASK, SEQUENCE_LOCKTIME_TYPE_FLAG};
use crate::error::{Result, ScriptError};
use crate::flags::{SigVersion, VerifyFlags};
use crate::sighash::{is_defined_hash_type, legacy_sighash, witness_v0_sighash};
use crate::types::Transaction;

/// Strict DER check over a signature with its trailing hash type byte
/// (BIP66). Accepts the empty signature, which is the canonical way to
/// make a signature check fail.
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    // layout: 0x30 [total] 0x02 [len R] [R] 0x02 [len S] [S] [hashtype]
    if sig.is_empty() {
        return true;
    }
    if sig.len() < 9 || sig.len() > 73 {
        return false;
    }
    if sig[0] != 0x30 || sig[1] as usize != sig.len() - 3 {
        return false;
    }
    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 7 != sig.len() {
        return false;
    }
    if sig[2] != 0x02 || len_r == 0 || sig[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }
    if sig[len_r + 4] != 0x02 || len_s == 0 || sig[len_r + 6] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return false;
    }
    true
}

/// True if the DER-encoded signature (hash type byte still attached) uses
/// the low-S form.
pub fn is_low_s_signature(sig: &[u8]) -> bool {
    if sig.is_empty() {
        return true;
    }
    let der = &sig[..sig.len() - 1];
    let parsed = match Signature::from_der_lax(der) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let mut normalized = parsed;
    normalized.normalize_s();
    normalized == parsed
}

/// True if the pubkey is a well-formed compressed or uncompressed SEC
/// encoding. Hybrid (0x06/0x07) keys are rejected.
pub fn is_compressed_or_uncompressed_pubkey(pubkey: &[u8]) -> bool {
    match pubkey.first() {
        Some(0x02) | Some(0x03) => pubkey.len() == 33,
        Some(0x04) => pubkey.len() == 65,
        _ => false,
    }
}

/// Apply the flag-controlled signature encoding checks.
pub fn check_signature_encoding(sig: &[u8], flags: VerifyFlags) -> Result<()> {
    if sig.is_empty() {
        return Ok(());
    }
    let strict = flags.contains(VerifyFlags::DERSIG)
        || flags.contains(VerifyFlags::LOW_S)
        || flags.contains(VerifyFlags::STRICTENC);
    if strict && !is_valid_signature_encoding(sig) {
        return Err(ScriptError::SigDer);
    }
    if flags.contains(VerifyFlags::LOW_S) && !is_low_s_signature(sig) {
        return Err(ScriptError::SigHighS);
    }
    if flags.contains(VerifyFlags::STRICTENC)
        && !is_defined_hash_type(u32::from(sig[sig.len() - 1]))
    {
        return Err(ScriptError::SigHashType);
    }
    Ok(())
}

/// Apply the flag-controlled pubkey encoding check.
pub fn check_pubkey_encoding(pubkey: &[u8], flags: VerifyFlags) -> Result<()> {
    if flags.contains(VerifyFlags::STRICTENC) && !is_compressed_or_uncompressed_pubkey(pubkey) {
        return Err(ScriptError::PubkeyType);
    }
    Ok(())
}

/// Context the interpreter consults for signature and lock-time opcodes.
pub trait SignatureChecker {
    /// Verify `sig` (hash type byte attached) by `pubkey` over the digest
    /// of the transaction for `script_code`.
    fn check_sig(
        &self,
        sig: &[u8],
        pubkey: &[u8],
        script_code: &[u8],
        sig_version: SigVersion,
    ) -> bool;

    /// OP_CHECKLOCKTIMEVERIFY predicate over the stack operand.
    fn check_lock_time(&self, lock_time: i64) -> bool;

    /// OP_CHECKSEQUENCEVERIFY predicate over the stack operand.
    fn check_sequence(&self, sequence: i64) -> bool;
}

/// Checker for scripts with no transaction context. Every signature and
/// lock-time check fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignatureCheck;

impl SignatureChecker for NoSignatureCheck {
    fn check_sig(&self, _: &[u8], _: &[u8], _: &[u8], _: SigVersion) -> bool {
        false
    }

    fn check_lock_time(&self, _: i64) -> bool {
        false
    }

    fn check_sequence(&self, _: i64) -> bool {
        false
    }
}

/// Checker bound to one input of a spending transaction.
pub struct TransactionSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
    amount: i64,
    secp: Secp256k1<VerifyOnly>,
}

impl<'a> TransactionSignatureChecker<'a> {
    /// `amount` is the value of the spent output, committed by the
    /// BIP143 digest and ignored by the legacy one.
    pub fn new(tx: &'a Transaction, input_index: usize, amount: i64) -> Self {
        TransactionSignatureChecker {
            tx,
            input_index,
            amount,
            secp: Secp256k1::verification_only(),
        }
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn check_sig(
        &self,
        sig: &[u8],
        pubkey: &[u8],
        script_code: &[u8],
        sig_version: SigVersion,
    ) -> bool {
        if sig.is_empty() {
            return false;
        }
        let pubkey = match PublicKey::from_slice(pubkey) {
            Ok(pubkey) => pubkey,
            Err(_) => return false,
        };
        let hash_type = u32::from(sig[sig.len() - 1]);
        let mut signature = match Signature::from_der_lax(&sig[..sig.len() - 1]) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        // high-S forms are valid unless LOW_S rejected them earlier
        signature.normalize_s();
        let digest = match sig_version {
            SigVersion::Base => {
                legacy_sighash(self.tx, self.input_index, script_code, hash_type)
            }
            SigVersion::WitnessV0 => witness_v0_sighash(
                self.tx,
                self.input_index,
                script_code,
                self.amount,
                hash_type,
            ),
        };
        let message = Message::from_digest(digest);
        self.secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
    }

    fn check_lock_time(&self, lock_time: i64) -> bool {
        let tx_lock_time = i64::from(self.tx.lock_time);
        // operand and transaction must use the same clock
        let same_kind = (tx_lock_time < LOCKTIME_THRESHOLD && lock_time < LOCKTIME_THRESHOLD)
            || (tx_lock_time >= LOCKTIME_THRESHOLD && lock_time >= LOCKTIME_THRESHOLD);
        if !same_kind || lock_time > tx_lock_time {
            return false;
        }
        // a final input would let the lock time be bypassed entirely
        match self.tx.inputs.get(self.input_index) {
            Some(input) => input.sequence != SEQUENCE_FINAL,
            None => false,
        }
    }

    fn check_sequence(&self, sequence: i64) -> bool {
        let tx_sequence = match self.tx.inputs.get(self.input_index) {
            Some(input) => i64::from(input.sequence),
            None => return false,
        };
        if self.tx.version < 2 {
            return false;
        }
        if tx_sequence & i64::from(SEQUENCE_LOCKTIME_DISABLE_FLAG) != 0 {
            return false;
        }
        let type_flag = i64::from(SEQUENCE_LOCKTIME_TYPE_FLAG);
        let mask = type_flag | i64::from(SEQUENCE_LOCKTIME_MASK);
        let masked_op = sequence & mask;
        let masked_tx = tx_sequence & mask;
        let same_kind = (masked_tx < type_flag && masked_op < type_flag)
            || (masked_tx >= type_flag && masked_op >= type_flag);
        same_kind && masked_op <= masked_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutPoint, TransactionInput, TransactionOutput};

    fn valid_der_sig() -> Vec<u8> {
        // 0x30 | len | 0x02 | r | 0x02 | s | hashtype
        let mut sig = vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        sig.push(0x01);
        sig
    }

    #[test]
    fn der_layout_checks() {
        assert!(is_valid_signature_encoding(&[]));
        assert!(is_valid_signature_encoding(&valid_der_sig()));

        let mut bad_type = valid_der_sig();
        bad_type[0] = 0x31;
        assert!(!is_valid_signature_encoding(&bad_type));

        let mut bad_len = valid_der_sig();
        bad_len[1] = 0x07;
        assert!(!is_valid_signature_encoding(&bad_len));

        // negative R
        let mut negative_r = valid_der_sig();
        negative_r[4] = 0x80;
        assert!(!is_valid_signature_encoding(&negative_r));

        // padded R: 0x00 followed by a byte without its high bit
        let padded = vec![0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01, 0x01];
        assert!(!is_valid_signature_encoding(&padded));

        // legitimate padding to keep R positive
        let needed = vec![0x30, 0x07, 0x02, 0x02, 0x00, 0x81, 0x02, 0x01, 0x01, 0x01];
        assert!(is_valid_signature_encoding(&needed));

        assert!(!is_valid_signature_encoding(&[0x30]));
        assert!(!is_valid_signature_encoding(&vec![0x30; 80]));
    }

    #[test]
    fn pubkey_forms() {
        let mut compressed = vec![0x02];
        compressed.extend_from_slice(&[0u8; 32]);
        assert!(is_compressed_or_uncompressed_pubkey(&compressed));
        compressed[0] = 0x03;
        assert!(is_compressed_or_uncompressed_pubkey(&compressed));

        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&[0u8; 64]);
        assert!(is_compressed_or_uncompressed_pubkey(&uncompressed));

        // hybrid prefix
        uncompressed[0] = 0x06;
        assert!(!is_compressed_or_uncompressed_pubkey(&uncompressed));
        // wrong lengths
        assert!(!is_compressed_or_uncompressed_pubkey(&[0x02; 32]));
        assert!(!is_compressed_or_uncompressed_pubkey(&[]));
    }

    #[test]
    fn encoding_checks_follow_flags() {
        let garbage = vec![0xff; 20];
        assert!(check_signature_encoding(&garbage, VerifyFlags::NONE).is_ok());
        assert_eq!(
            check_signature_encoding(&garbage, VerifyFlags::DERSIG),
            Err(ScriptError::SigDer)
        );
        assert!(check_signature_encoding(&[], VerifyFlags::DERSIG).is_ok());

        let mut undefined_type = valid_der_sig();
        *undefined_type.last_mut().unwrap() = 0x04;
        assert!(check_signature_encoding(&undefined_type, VerifyFlags::DERSIG).is_ok());
        assert_eq!(
            check_signature_encoding(&undefined_type, VerifyFlags::STRICTENC),
            Err(ScriptError::SigHashType)
        );

        assert!(check_pubkey_encoding(&[0xff; 12], VerifyFlags::NONE).is_ok());
        assert_eq!(
            check_pubkey_encoding(&[0xff; 12], VerifyFlags::STRICTENC),
            Err(ScriptError::PubkeyType)
        );
    }

    fn locked_tx(lock_time: u32, sequence: u32, version: u32) -> Transaction {
        Transaction {
            version,
            inputs: vec![TransactionInput {
                prevout: OutPoint {
                    hash: [0; 32],
                    index: 0,
                },
                script_sig: Vec::new(),
                sequence,
            }],
            outputs: vec![TransactionOutput {
                value: 1,
                script_pubkey: Vec::new(),
            }],
            lock_time,
        }
    }

    #[test]
    fn lock_time_predicate() {
        let tx = locked_tx(500, 0, 1);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(checker.check_lock_time(400));
        assert!(checker.check_lock_time(500));
        assert!(!checker.check_lock_time(501));
        // block height operand against a timestamp lock, and vice versa
        assert!(!checker.check_lock_time(LOCKTIME_THRESHOLD));
        let tx = locked_tx(600_000_000, 0, 1);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(!checker.check_lock_time(400));
        assert!(checker.check_lock_time(599_999_999));

        // final sequence disables lock time entirely
        let tx = locked_tx(500, SEQUENCE_FINAL, 1);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(!checker.check_lock_time(400));
    }

    #[test]
    fn sequence_predicate() {
        let tx = locked_tx(0, 10, 2);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(checker.check_sequence(5));
        assert!(checker.check_sequence(10));
        assert!(!checker.check_sequence(11));
        // time-based operand against a height-based sequence
        assert!(!checker.check_sequence(i64::from(SEQUENCE_LOCKTIME_TYPE_FLAG) | 5));

        // version 1 transactions never satisfy the check
        let tx = locked_tx(0, 10, 1);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(!checker.check_sequence(5));

        // disable flag on the input's sequence
        let tx = locked_tx(0, SEQUENCE_LOCKTIME_DISABLE_FLAG | 10, 2);
        let checker = TransactionSignatureChecker::new(&tx, 0, 0);
        assert!(!checker.check_sequence(5));
    }

    #[test]
    fn checker_bound_past_last_input_fails_cleanly() {
        let tx = locked_tx(500, 0, 2);
        let checker = TransactionSignatureChecker::new(&tx, 3, 0);
        assert!(!checker.check_lock_time(400));
        assert!(!checker.check_sequence(0));
        let sig = valid_der_sig();
        let mut pubkey = vec![0x02];
        pubkey.extend_from_slice(&[0x11; 32]);
        assert!(!checker.check_sig(&sig, &pubkey, &[0x51], SigVersion::Base));
    }
}
