//! Spend-side Bitcoin transaction inputs

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use super::ScriptType;
use crate::reftx::SpendInput;

/// Bitcoin transaction input
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinTxInput {
    /// Previous transaction hash, internal (little-endian) byte order
    #[serde_as(as = "Hex")]
    pub prev_hash: Vec<u8>,
    /// Previous output index
    pub prev_index: u32,
    /// Derivation path
    #[serde(default)]
    pub address_n: Vec<u32>,
    /// Input amount in satoshis
    pub amount: u64,
    /// Script type
    pub script_type: ScriptType,
    /// Spends a segwit output (native or P2SH-wrapped)
    pub segwit: bool,
}

impl BitcoinTxInput {
    pub fn new(
        prev_hash: Vec<u8>,
        prev_index: u32,
        address_n: Vec<u32>,
        amount: u64,
        script_type: ScriptType,
    ) -> Self {
        Self {
            prev_hash,
            prev_index,
            address_n,
            amount,
            script_type,
            segwit: script_type.is_segwit(),
        }
    }

    /// Build an input from a display-order txid as shown by explorers and RPC.
    pub fn from_txid(
        txid: &str,
        prev_index: u32,
        address_n: Vec<u32>,
        amount: u64,
        script_type: ScriptType,
    ) -> crate::errors::Result<Self> {
        let prev_hash = crate::utils::parse_reversed_hex(txid)?;
        Ok(Self::new(prev_hash, prev_index, address_n, amount, script_type))
    }

    /// Mark a P2SH input as wrapping a segwit program.
    pub fn wrapped_segwit(mut self) -> Self {
        self.segwit = true;
        self
    }
}

impl SpendInput for BitcoinTxInput {
    fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    fn is_segwit(&self) -> bool {
        self.segwit
    }
}
