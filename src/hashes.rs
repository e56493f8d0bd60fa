//! Digest helpers used by the crypto opcodes and signature hashing

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::types::Hash;

pub fn sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// SHA-256 applied twice, the transaction digest function.
pub fn hash256(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256, the address digest function.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}
