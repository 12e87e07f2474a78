//! Bitcoin and plain UTXO fork support
//!
//! Provides:
//! - Spend-side input description with script types (P2PKH, P2SH, P2WPKH, P2WSH, P2TR)
//! - `RefTxSource` for `bitcoin::Transaction`, used by Bitcoin, Litecoin, Dogecoin
//!   and any other fork whose previous transactions carry no extra fields

use bitcoin::consensus::encode;
use bitcoin::{Transaction, TxIn, TxOut};
use serde::{Deserialize, Serialize};

use crate::chains::RefTxSource;
use crate::errors::Result;

pub mod transaction;

pub use transaction::BitcoinTxInput;

/// Bitcoin script types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// Pay to Public Key Hash (Legacy)
    P2PKH,
    /// Pay to Script Hash (Legacy)
    P2SH,
    /// Pay to Witness Public Key Hash (SegWit)
    P2WPKH,
    /// Pay to Witness Script Hash (SegWit)
    P2WSH,
    /// Pay to Taproot
    P2TR,
}

impl ScriptType {
    /// Whether spending this script type commits to the input amount in the
    /// signature, so the device does not need the previous transaction.
    ///
    /// P2SH reports `false`; wrapped segwit must be flagged on the input.
    pub fn is_segwit(&self) -> bool {
        matches!(self, ScriptType::P2WPKH | ScriptType::P2WSH | ScriptType::P2TR)
    }
}

/// Decode a raw Bitcoin transaction (witness serialization accepted).
pub fn parse_transaction(raw: &[u8]) -> Result<Transaction> {
    let tx: Transaction = encode::deserialize(raw)?;
    log::debug!(
        "Decoded bitcoin tx {} ({} inputs, {} outputs)",
        tx.txid(),
        tx.input.len(),
        tx.output.len()
    );
    Ok(tx)
}

impl RefTxSource for Transaction {
    fn version(&self) -> i32 {
        self.version
    }

    fn lock_time(&self) -> u32 {
        self.lock_time.to_consensus_u32()
    }

    fn txid(&self) -> String {
        Transaction::txid(self).to_string()
    }

    fn inputs(&self) -> &[TxIn] {
        &self.input
    }

    fn outputs(&self) -> &[TxOut] {
        &self.output
    }

    fn serialize(&self) -> Vec<u8> {
        encode::serialize(self)
    }
}
