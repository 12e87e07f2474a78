//! Zcash support
//!
//! Zcash keeps Bitcoin's transparent input/output layout but appends shielded
//! data the device cannot interpret. The firmware still needs those bytes to
//! recompute the previous transaction's hash, so they are handed over as an
//! opaque `extra_data` blob.

use bitcoin::consensus::encode;

use crate::errors::Result;

pub mod shielded;
pub mod transaction;

pub use shielded::{
    JoinSplitData, JoinSplitDescription, OutputDescription, SaplingData, SpendDescription,
};
pub use transaction::ZcashTransaction;

/// nVersionGroupId of v3 (Overwinter) transactions.
pub const OVERWINTER_VERSION_GROUP_ID: u32 = 0x03C4_8270;
/// nVersionGroupId of v4 (Sapling) transactions.
pub const SAPLING_VERSION_GROUP_ID: u32 = 0x892F_2085;

/// Decode a raw Zcash transaction.
pub fn parse_transaction(raw: &[u8]) -> Result<ZcashTransaction> {
    let tx: ZcashTransaction = encode::deserialize(raw)?;
    log::debug!(
        "Decoded zcash v{} tx {} ({} shielded bytes)",
        tx.version,
        tx.txid(),
        tx.shielded_len()
    );
    Ok(tx)
}
