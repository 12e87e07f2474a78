//! Referenced transactions for legacy input verification
//!
//! A KeepKey signing a non-segwit input cannot trust the amount the host
//! claims, so during `SignTx` it requests every previous transaction through
//! `TxRequest` and hashes what it receives. This module decides which
//! previous transactions are needed and builds the records sent back.

use serde::{Deserialize, Serialize};

pub mod references;
pub mod transform;

pub use references::{select_references, SpendInput};
pub use transform::{transform_transaction, transform_transactions};

/// Input of a referenced transaction as the firmware expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefTxInput {
    pub prev_index: u32,
    pub sequence: u32,
    /// Previous transaction id, display order hex
    pub prev_hash: String,
    pub script_sig: String,
}

/// Output of a referenced transaction in binary form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefTxBinOutput {
    /// Value in the chain's base unit
    pub amount: u64,
    pub script_pubkey: String,
}

/// Previous transaction record streamed to the device.
///
/// Absent optional fields are omitted when serialized.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefTransaction {
    pub lock_time: u32,
    pub version: i32,
    pub hash: String,
    pub inputs: Vec<RefTxInput>,
    pub bin_outputs: Vec<RefTxBinOutput>,
    pub extra_data: Option<String>,
    pub timestamp: Option<u32>,
    pub version_group_id: Option<u32>,
    pub expiry: Option<u32>,
}
