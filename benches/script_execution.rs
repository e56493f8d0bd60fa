use criterion::{black_box, criterion_group, criterion_main, Criterion};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use bscript::asm::{assemble, push_data};
use bscript::hashes::hash160;
use bscript::opcodes::*;
use bscript::sighash::{legacy_sighash, SIGHASH_ALL};
use bscript::{
    eval_script, verify_script, NoSignatureCheck, OutPoint, SigVersion, Stack, Transaction,
    TransactionInput, TransactionOutput, TransactionSignatureChecker, VerifyFlags,
};

fn bench_arithmetic(c: &mut Criterion) {
    let script = assemble("2 3 OP_ADD 5 OP_NUMEQUAL OP_VERIFY 1").unwrap();
    c.bench_function("eval_arithmetic", |b| {
        b.iter(|| {
            let mut stack = Stack::new();
            eval_script(
                &mut stack,
                black_box(&script),
                VerifyFlags::NONE,
                &NoSignatureCheck,
                SigVersion::Base,
            )
            .unwrap();
        })
    });
}

fn bench_hashing(c: &mut Criterion) {
    let script = assemble("0xdeadbeef OP_HASH256 OP_DROP 1").unwrap();
    c.bench_function("eval_hash256", |b| {
        b.iter(|| {
            let mut stack = Stack::new();
            eval_script(
                &mut stack,
                black_box(&script),
                VerifyFlags::NONE,
                &NoSignatureCheck,
                SigVersion::Base,
            )
            .unwrap();
        })
    });
}

fn bench_p2pkh(c: &mut Criterion) {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[0x42; 32]).unwrap();
    let pk = PublicKey::from_secret_key(&secp, &sk);

    let mut script_pubkey = vec![OP_DUP, OP_HASH160];
    push_data(&mut script_pubkey, &hash160(&pk.serialize()));
    script_pubkey.push(OP_EQUALVERIFY);
    script_pubkey.push(OP_CHECKSIG);

    let tx = Transaction {
        version: 2,
        inputs: vec![TransactionInput {
            prevout: OutPoint {
                hash: [1; 32],
                index: 0,
            },
            script_sig: Vec::new(),
            sequence: 0xffff_fffe,
        }],
        outputs: vec![TransactionOutput {
            value: 90_000,
            script_pubkey: vec![OP_TRUE],
        }],
        lock_time: 0,
    };

    let digest = legacy_sighash(&tx, 0, &script_pubkey, SIGHASH_ALL);
    let sig = secp.sign_ecdsa(&Message::from_digest(digest), &sk);
    let mut encoded = sig.serialize_der().to_vec();
    encoded.push(SIGHASH_ALL as u8);

    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &encoded);
    push_data(&mut script_sig, &pk.serialize());

    c.bench_function("verify_p2pkh", |b| {
        b.iter(|| {
            let checker = TransactionSignatureChecker::new(&tx, 0, 100_000);
            verify_script(
                black_box(&script_sig),
                black_box(&script_pubkey),
                VerifyFlags::STANDARD,
                &checker,
                SigVersion::Base,
            )
            .unwrap();
        })
    });
}

criterion_group!(benches, bench_arithmetic, bench_hashing, bench_p2pkh);
criterion_main!(benches);
