//! Byte-order helpers for transaction ids

use crate::errors::Result;

/// Return a copy of `bytes` in reverse order.
pub fn reverse_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

/// Hex encode `bytes` after reversing them.
///
/// Transaction ids are hashed and stored little-endian but displayed, looked
/// up and compared big-endian, so every previous-transaction id leaving this
/// crate goes through here.
pub fn reversed_hex(bytes: &[u8]) -> String {
    hex::encode(reverse_bytes(bytes))
}

/// Inverse of [`reversed_hex`]: decode a display-order txid into internal byte order.
pub fn parse_reversed_hex(txid: &str) -> Result<Vec<u8>> {
    let mut bytes = hex::decode(txid)?;
    bytes.reverse();
    Ok(bytes)
}
