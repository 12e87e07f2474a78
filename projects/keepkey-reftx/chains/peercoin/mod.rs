//! Peercoin-style chains
//!
//! Transactions on these chains carry an `nTime` field right after the
//! version. The device needs it back as `timestamp` to rebuild the hash.

use std::io;

use bitcoin::consensus::encode::{self, Decodable, Encodable};
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::{TxIn, TxOut, Txid};

use crate::chains::RefTxSource;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedTransaction {
    pub version: i32,
    /// nTime, seconds since the Unix epoch
    pub time: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl TimestampedTransaction {
    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&encode::serialize(self)))
    }
}

impl Encodable for TimestampedTransaction {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = 0;
        len += self.version.consensus_encode(writer)?;
        len += self.time.consensus_encode(writer)?;
        len += self.inputs.consensus_encode(writer)?;
        len += self.outputs.consensus_encode(writer)?;
        len += self.lock_time.consensus_encode(writer)?;
        Ok(len)
    }
}

impl Decodable for TimestampedTransaction {
    fn consensus_decode<R: io::Read + ?Sized>(reader: &mut R) -> std::result::Result<Self, encode::Error> {
        Ok(TimestampedTransaction {
            version: Decodable::consensus_decode(reader)?,
            time: Decodable::consensus_decode(reader)?,
            inputs: Decodable::consensus_decode(reader)?,
            outputs: Decodable::consensus_decode(reader)?,
            lock_time: Decodable::consensus_decode(reader)?,
        })
    }
}

/// Decode a raw timestamped transaction.
pub fn parse_transaction(raw: &[u8]) -> Result<TimestampedTransaction> {
    let tx: TimestampedTransaction = encode::deserialize(raw)?;
    log::debug!("Decoded timestamped tx {} (time {})", tx.txid(), tx.time);
    Ok(tx)
}

impl RefTxSource for TimestampedTransaction {
    fn version(&self) -> i32 {
        self.version
    }

    fn lock_time(&self) -> u32 {
        self.lock_time
    }

    fn txid(&self) -> String {
        TimestampedTransaction::txid(self).to_string()
    }

    fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    fn serialize(&self) -> Vec<u8> {
        encode::serialize(self)
    }

    fn timestamp(&self) -> Option<u32> {
        Some(self.time)
    }
}
