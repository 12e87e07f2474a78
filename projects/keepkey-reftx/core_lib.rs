//! Referenced-transaction support for KeepKey UTXO signing.
//!
//! When a KeepKey signs a legacy (non-segwit) input it asks the host for the
//! full previous transaction so it can check the amount being spent. This
//! crate works out which previous transactions the host has to fetch and turns
//! each fetched transaction into the flat record the firmware streams back
//! through `TxAck`.

pub mod chains;
pub mod errors;
pub mod reftx;
pub mod utils;

pub use chains::{RefTxSource, ShieldedExtension};
pub use errors::{RefTxError, Result};
pub use reftx::{
    select_references, transform_transaction, transform_transactions, RefTransaction,
    RefTxBinOutput, RefTxInput, SpendInput,
};
