//! End-to-end spends with real signatures

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use bscript::asm::push_data;
use bscript::hashes::hash160;
use bscript::opcodes::*;
use bscript::sighash::{
    legacy_sighash, witness_v0_sighash, ONE_HASH, SIGHASH_ALL, SIGHASH_SINGLE,
};
use bscript::{
    verify_script, OutPoint, ScriptError, SignatureChecker, SigVersion, Transaction,
    TransactionInput, TransactionOutput, TransactionSignatureChecker, VerifyFlags,
};

fn keypair(seed: u8) -> (SecretKey, PublicKey) {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[seed; 32]).unwrap();
    let pk = PublicKey::from_secret_key(&secp, &sk);
    (sk, pk)
}

fn spend_tx(input_count: usize) -> Transaction {
    Transaction {
        version: 2,
        inputs: (0..input_count)
            .map(|i| TransactionInput {
                prevout: OutPoint {
                    hash: [i as u8 + 1; 32],
                    index: i as u32,
                },
                script_sig: Vec::new(),
                sequence: 0xffff_fffe,
            })
            .collect(),
        outputs: vec![TransactionOutput {
            value: 90_000,
            script_pubkey: vec![OP_TRUE],
        }],
        lock_time: 0,
    }
}

fn sign_legacy(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    hash_type: u32,
    sk: &SecretKey,
) -> Vec<u8> {
    let secp = Secp256k1::new();
    let digest = legacy_sighash(tx, input_index, script_code, hash_type);
    let sig = secp.sign_ecdsa(&Message::from_digest(digest), sk);
    let mut encoded = sig.serialize_der().to_vec();
    encoded.push(hash_type as u8);
    encoded
}

fn p2pkh_script(pk: &PublicKey) -> Vec<u8> {
    let mut script = vec![OP_DUP, OP_HASH160];
    push_data(&mut script, &hash160(&pk.serialize()));
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

#[test]
fn p2pkh_spend() {
    let (sk, pk) = keypair(0x11);
    let script_pubkey = p2pkh_script(&pk);
    let tx = spend_tx(1);
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);

    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);
    push_data(&mut script_sig, &pk.serialize());

    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base).unwrap();
}

#[test]
fn p2pkh_rejects_wrong_key() {
    let (sk, _) = keypair(0x11);
    let (_, other_pk) = keypair(0x22);
    let script_pubkey = p2pkh_script(&other_pk);
    let tx = spend_tx(1);
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);

    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);
    push_data(&mut script_sig, &other_pk.serialize());

    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base),
        Err(ScriptError::EvalFalse)
    );
}

#[test]
fn p2pkh_rejects_modified_transaction() {
    let (sk, pk) = keypair(0x11);
    let script_pubkey = p2pkh_script(&pk);
    let tx = spend_tx(1);
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);

    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);
    push_data(&mut script_sig, &pk.serialize());

    let mut altered = tx.clone();
    altered.outputs[0].value = 90_001;
    let checker = TransactionSignatureChecker::new(&altered, 0, 100_000);
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base),
        Err(ScriptError::EvalFalse)
    );
}

#[test]
fn p2pkh_rejects_any_signature_corruption() {
    let (sk, pk) = keypair(0x12);
    let script_pubkey = p2pkh_script(&pk);
    let tx = spend_tx(1);
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);
    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);

    for i in 0..sig.len() {
        let mut corrupted = sig.clone();
        corrupted[i] ^= 0x01;
        let mut script_sig = Vec::new();
        push_data(&mut script_sig, &corrupted);
        push_data(&mut script_sig, &pk.serialize());
        // depending on which byte flips this is a hard encoding error
        // or a clean false, but never a panic or an accept
        assert!(
            verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base)
                .is_err(),
            "byte {i}"
        );
    }
}

fn multisig_redeem(pks: &[&PublicKey]) -> Vec<u8> {
    let mut redeem = vec![OP_2];
    for pk in pks {
        push_data(&mut redeem, &pk.serialize());
    }
    redeem.push(OP_3);
    redeem.push(OP_CHECKMULTISIG);
    redeem
}

#[test]
fn p2sh_two_of_three_multisig() {
    let (sk1, pk1) = keypair(0x31);
    let (sk2, pk2) = keypair(0x32);
    let (_, pk3) = keypair(0x33);
    let redeem = multisig_redeem(&[&pk1, &pk2, &pk3]);

    let mut script_pubkey = vec![OP_HASH160];
    push_data(&mut script_pubkey, &hash160(&redeem));
    script_pubkey.push(OP_EQUAL);

    let tx = spend_tx(1);
    let sig1 = sign_legacy(&tx, 0, &redeem, SIGHASH_ALL, &sk1);
    let sig2 = sign_legacy(&tx, 0, &redeem, SIGHASH_ALL, &sk2);

    let mut script_sig = vec![OP_0];
    push_data(&mut script_sig, &sig1);
    push_data(&mut script_sig, &sig2);
    push_data(&mut script_sig, &redeem);

    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base).unwrap();

    // signatures in the wrong order do not verify
    let mut reversed = vec![OP_0];
    push_data(&mut reversed, &sig2);
    push_data(&mut reversed, &sig1);
    push_data(&mut reversed, &redeem);
    assert_eq!(
        verify_script(&reversed, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base),
        Err(ScriptError::EvalFalse)
    );

    // without the P2SH flag only the hash comparison runs, but the
    // leftover signature pushes fail the terminal rule
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::NONE, &checker, SigVersion::Base),
        Err(ScriptError::CleanStack)
    );
}

#[test]
fn p2sh_rejects_wrong_redeem_script() {
    let (_, pk) = keypair(0x41);
    let redeem = p2pkh_script(&pk);
    let mut script_pubkey = vec![OP_HASH160];
    push_data(&mut script_pubkey, &hash160(&redeem));
    script_pubkey.push(OP_EQUAL);

    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &[OP_TRUE]);

    let tx = spend_tx(1);
    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::MANDATORY, &checker, SigVersion::Base),
        Err(ScriptError::EvalFalse)
    );
}

#[test]
fn cltv_locked_output() {
    let (sk, pk) = keypair(0x55);
    let mut script_pubkey = Vec::new();
    push_data(&mut script_pubkey, &bscript::ScriptNum(500).encode());
    script_pubkey.push(OP_CHECKLOCKTIMEVERIFY);
    script_pubkey.push(OP_DROP);
    push_data(&mut script_pubkey, &pk.serialize());
    script_pubkey.push(OP_CHECKSIG);

    let mut tx = spend_tx(1);
    tx.lock_time = 600;
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);
    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);

    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base).unwrap();

    // spend too early
    let mut early = tx.clone();
    early.lock_time = 400;
    let sig = sign_legacy(&early, 0, &script_pubkey, SIGHASH_ALL, &sk);
    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);
    let checker = TransactionSignatureChecker::new(&early, 0, 100_000);
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base),
        Err(ScriptError::UnsatisfiedLockTime)
    );
}

#[test]
fn code_separator_scopes_the_signed_script() {
    let (sk, pk) = keypair(0x66);
    let mut script_pubkey = vec![OP_NOP, OP_CODESEPARATOR];
    let tail_start = script_pubkey.len();
    push_data(&mut script_pubkey, &pk.serialize());
    script_pubkey.push(OP_CHECKSIG);

    let tx = spend_tx(1);
    // the digest covers only the script after the separator
    let sig = sign_legacy(&tx, 0, &script_pubkey[tail_start..], SIGHASH_ALL, &sk);
    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);

    let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
    verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base).unwrap();

    // a signature over the whole script must not verify
    let sig = sign_legacy(&tx, 0, &script_pubkey, SIGHASH_ALL, &sk);
    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &sig);
    assert_eq!(
        verify_script(&script_sig, &script_pubkey, VerifyFlags::STANDARD, &checker, SigVersion::Base),
        Err(ScriptError::EvalFalse)
    );
}

#[test]
fn sighash_single_quirk_signs_the_one_value() {
    let (sk, pk) = keypair(0x77);
    let secp = Secp256k1::new();
    // second input has no paired output
    let tx = spend_tx(2);
    let script_code = p2pkh_script(&pk);

    assert_eq!(legacy_sighash(&tx, 1, &script_code, SIGHASH_SINGLE), ONE_HASH);

    let sig = secp.sign_ecdsa(&Message::from_digest(ONE_HASH), &sk);
    let mut encoded = sig.serialize_der().to_vec();
    encoded.push(SIGHASH_SINGLE as u8);

    let checker = TransactionSignatureChecker::new(&tx, 1, 100_000);
    assert!(checker.check_sig(&encoded, &pk.serialize(), &script_code, SigVersion::Base));
}

#[test]
fn witness_v0_digest_drives_witness_checks() {
    let (sk, pk) = keypair(0x88);
    let secp = Secp256k1::new();
    let tx = spend_tx(1);
    let script_code = p2pkh_script(&pk);
    let amount = 100_000;

    let digest = witness_v0_sighash(&tx, 0, &script_code, amount, SIGHASH_ALL);
    let sig = secp.sign_ecdsa(&Message::from_digest(digest), &sk);
    let mut encoded = sig.serialize_der().to_vec();
    encoded.push(SIGHASH_ALL as u8);

    let checker = TransactionSignatureChecker::new(&tx, 0, amount);
    assert!(checker.check_sig(&encoded, &pk.serialize(), &script_code, SigVersion::WitnessV0));
    // the same signature is not valid under the legacy digest
    assert!(!checker.check_sig(&encoded, &pk.serialize(), &script_code, SigVersion::Base));

    // an amount mismatch breaks verification
    let wrong_amount = TransactionSignatureChecker::new(&tx, 0, amount + 1);
    assert!(!wrong_amount.check_sig(&encoded, &pk.serialize(), &script_code, SigVersion::WitnessV0));
}
