//! Previous transactions the host has to fetch before signing

use std::collections::HashSet;

use crate::utils::reversed_hex;

/// An input of the transaction being signed.
pub trait SpendInput {
    /// Previous transaction id in internal (little-endian) byte order.
    fn prev_hash(&self) -> &[u8];

    /// Whether the spent output is segwit, in which case the device signs
    /// over the amount and never asks for the previous transaction.
    fn is_segwit(&self) -> bool;
}

/// Ids of the previous transactions referenced by legacy `inputs`, display
/// order hex, deduplicated in first-seen order.
///
/// Ids are passed through whatever their length; nothing is validated here.
pub fn select_references<I: SpendInput>(inputs: &[I]) -> Vec<String> {
    let legacy: Vec<&I> = inputs.iter().filter(|input| !input.is_segwit()).collect();
    if legacy.is_empty() {
        return Vec::new();
    }
    let legacy_count = legacy.len();

    let mut seen = HashSet::new();
    let refs: Vec<String> = legacy
        .into_iter()
        .map(|input| reversed_hex(input.prev_hash()))
        .filter(|txid| seen.insert(txid.clone()))
        .collect();

    log::debug!(
        "{} of {} inputs need a referenced transaction ({} unique)",
        legacy_count,
        inputs.len(),
        refs.len()
    );
    refs
}
