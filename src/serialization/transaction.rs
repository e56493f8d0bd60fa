//! Transaction wire encoding
//!
//! Legacy (non-witness) layout: version, varint-counted inputs, varint
//! counted outputs, lock time. Decoding is canonical: non-minimal varints,
//! truncation, and trailing bytes are all rejected.

use crate::error::SerializeError;
use crate::serialization::{write_var_bytes, write_varint, Reader};
use crate::types::{OutPoint, Transaction, TransactionInput, TransactionOutput};

fn write_input(out: &mut Vec<u8>, input: &TransactionInput) {
    out.extend_from_slice(&input.prevout.hash);
    out.extend_from_slice(&input.prevout.index.to_le_bytes());
    write_var_bytes(out, &input.script_sig);
    out.extend_from_slice(&input.sequence.to_le_bytes());
}

fn write_output(out: &mut Vec<u8>, output: &TransactionOutput) {
    out.extend_from_slice(&output.value.to_le_bytes());
    write_var_bytes(out, &output.script_pubkey);
}

/// Serialize a transaction to its wire form.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&tx.version.to_le_bytes());
    write_varint(&mut out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        write_input(&mut out, input);
    }
    write_varint(&mut out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        write_output(&mut out, output);
    }
    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

fn read_input(reader: &mut Reader<'_>) -> Result<TransactionInput, SerializeError> {
    let hash = reader.read_hash()?;
    let index = reader.read_u32()?;
    let script_sig = reader.read_var_bytes()?;
    let sequence = reader.read_u32()?;
    Ok(TransactionInput {
        prevout: OutPoint { hash, index },
        script_sig,
        sequence,
    })
}

fn read_output(reader: &mut Reader<'_>) -> Result<TransactionOutput, SerializeError> {
    let value = reader.read_i64()?;
    let script_pubkey = reader.read_var_bytes()?;
    Ok(TransactionOutput {
        value,
        script_pubkey,
    })
}

/// Deserialize a transaction, requiring the buffer to be exactly consumed.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction, SerializeError> {
    let mut reader = Reader::new(bytes);
    let version = reader.read_u32()?;
    let input_count = reader.read_length()?;
    let mut inputs = Vec::with_capacity(input_count.min(1024));
    for _ in 0..input_count {
        inputs.push(read_input(&mut reader)?);
    }
    let output_count = reader.read_length()?;
    let mut outputs = Vec::with_capacity(output_count.min(1024));
    for _ in 0..output_count {
        outputs.push(read_output(&mut reader)?);
    }
    let lock_time = reader.read_u32()?;
    reader.expect_end()?;
    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}
