//! UTXO chain transaction models
//!
//! Each supported chain family parses raw transactions into its own type and
//! exposes them to the record transformer through [`RefTxSource`]:
//! - Bitcoin and forks without chain-specific fields (`bitcoin::Transaction`)
//! - Zcash, including Overwinter/Sapling fields and JoinSplit data
//! - Peercoin-style chains carrying a transaction timestamp

use ::bitcoin::{TxIn, TxOut};

pub mod bitcoin;
pub mod peercoin;
pub mod zcash;

pub use self::bitcoin::{BitcoinTxInput, ScriptType};
pub use self::peercoin::TimestampedTransaction;
pub use self::zcash::ZcashTransaction;

/// Fields present only on the shielded-capable (Zcash) chain variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldedExtension {
    /// Version group id as a hex string (`0x03c48270`), `None` before Overwinter.
    pub version_group_id: Option<String>,
}

/// Read-only view of a parsed previous transaction.
pub trait RefTxSource {
    /// Transaction version as the chain defines it, without flag bits.
    fn version(&self) -> i32;

    fn lock_time(&self) -> u32;

    /// Transaction id in display (big-endian) order.
    fn txid(&self) -> String;

    fn inputs(&self) -> &[TxIn];

    fn outputs(&self) -> &[TxOut];

    /// Full consensus serialization.
    fn serialize(&self) -> Vec<u8>;

    fn timestamp(&self) -> Option<u32> {
        None
    }

    fn expiry(&self) -> Option<u32> {
        None
    }

    fn shielded(&self) -> Option<ShieldedExtension> {
        None
    }

    /// Byte length of the chain-specific payload at the tail of [`serialize`](Self::serialize).
    fn extra_data_len(&self) -> usize {
        0
    }
}

impl<T: RefTxSource + ?Sized> RefTxSource for Box<T> {
    fn version(&self) -> i32 {
        (**self).version()
    }

    fn lock_time(&self) -> u32 {
        (**self).lock_time()
    }

    fn txid(&self) -> String {
        (**self).txid()
    }

    fn inputs(&self) -> &[TxIn] {
        (**self).inputs()
    }

    fn outputs(&self) -> &[TxOut] {
        (**self).outputs()
    }

    fn serialize(&self) -> Vec<u8> {
        (**self).serialize()
    }

    fn timestamp(&self) -> Option<u32> {
        (**self).timestamp()
    }

    fn expiry(&self) -> Option<u32> {
        (**self).expiry()
    }

    fn shielded(&self) -> Option<ShieldedExtension> {
        (**self).shielded()
    }

    fn extra_data_len(&self) -> usize {
        (**self).extra_data_len()
    }
}
