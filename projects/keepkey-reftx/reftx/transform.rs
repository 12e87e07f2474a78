//! Previous transaction → device record

use bitcoin::hashes::Hash;

use crate::chains::RefTxSource;
use crate::errors::{RefTxError, Result};
use crate::reftx::{RefTransaction, RefTxBinOutput, RefTxInput};
use crate::utils::reversed_hex;

/// Transform fetched previous transactions into device records, in order.
///
/// Fails as a whole if any transaction cannot be transformed.
pub fn transform_transactions<T: RefTxSource>(txs: &[T]) -> Result<Vec<RefTransaction>> {
    txs.iter().map(transform_transaction).collect()
}

pub fn transform_transaction<T: RefTxSource + ?Sized>(tx: &T) -> Result<RefTransaction> {
    let hash = tx.txid();
    let (extra_data, version_group_id) = match tx.shielded() {
        Some(ext) => {
            let extra_data = join_split_data(tx, &hash)?;
            let version_group_id = ext
                .version_group_id
                .as_deref()
                .map(parse_version_group_id)
                .transpose()?;
            (extra_data, version_group_id)
        }
        None => (None, None),
    };

    let inputs = tx
        .inputs()
        .iter()
        .map(|input| RefTxInput {
            prev_index: input.previous_output.vout,
            sequence: input.sequence.0,
            prev_hash: reversed_hex(input.previous_output.txid.as_byte_array()),
            script_sig: hex::encode(input.script_sig.as_bytes()),
        })
        .collect();

    let bin_outputs = tx
        .outputs()
        .iter()
        .map(|output| RefTxBinOutput {
            amount: output.value,
            script_pubkey: hex::encode(output.script_pubkey.as_bytes()),
        })
        .collect();

    Ok(RefTransaction {
        lock_time: tx.lock_time(),
        version: tx.version(),
        hash,
        inputs,
        bin_outputs,
        extra_data,
        timestamp: tx.timestamp(),
        version_group_id,
        expiry: tx.expiry(),
    })
}

/// Hex of the shielded tail, cut from the full serialization by the length
/// the parser reports. The payload itself is never decoded.
fn join_split_data<T: RefTxSource + ?Sized>(tx: &T, txid: &str) -> Result<Option<String>> {
    if tx.version() < 2 {
        return Ok(None);
    }

    let raw = tx.serialize();
    let payload_len = tx.extra_data_len();
    if payload_len > raw.len() {
        return Err(RefTxError::MalformedPayload {
            txid: txid.to_string(),
            payload_len,
            serialized_len: raw.len(),
        });
    }

    log::debug!("Extracted {} bytes of extra data from {}", payload_len, txid);
    Ok(Some(hex::encode(&raw[raw.len() - payload_len..])))
}

/// Parse a hex version group id, with or without `0x`.
fn parse_version_group_id(value: &str) -> Result<u32> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let malformed = || RefTxError::MalformedField {
        field: "version_group_id",
        value: value.to_string(),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u32::from_str_radix(digits, 16).map_err(|_| malformed())
}
