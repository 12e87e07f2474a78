//! Zcash transaction model (versions 1 through 4)

use std::io;

use bitcoin::consensus::encode::{self, Decodable, Encodable, VarInt};
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::{TxIn, TxOut, Txid};

use super::shielded::{
    read_fixed, write_all, JoinSplitData, JoinSplitDescription, OutputDescription, SaplingData,
    SpendDescription, SIGNATURE_SIZE,
};
use super::{OVERWINTER_VERSION_GROUP_ID, SAPLING_VERSION_GROUP_ID};
use crate::chains::{RefTxSource, ShieldedExtension};

const OVERWINTERED_FLAG: u32 = 1 << 31;

/// Full Zcash transaction data.
///
/// Field presence follows the transaction version:
/// - v1: transparent only
/// - v2: + JoinSplits (BCTV14)
/// - v3 (Overwinter): + nVersionGroupId, nExpiryHeight
/// - v4 (Sapling): + valueBalance, spends, outputs, bindingSig; Groth16 JoinSplits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZcashTransaction {
    /// fOverwintered bit of the header. Size\[bytes\]: \[in 4 byte header\]
    pub overwintered: bool,
    /// Transaction format version, without the fOverwintered bit.
    pub version: u32,
    /// Some iff `overwintered`.
    pub version_group_id: Option<u32>,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
    /// Some iff `overwintered`.
    pub expiry_height: Option<u32>,
    /// Some iff `version >= 4`.
    pub sapling: Option<SaplingData>,
    pub join_splits: Option<JoinSplitData>,
}

impl ZcashTransaction {
    fn header(&self) -> u32 {
        if self.overwintered {
            self.version | OVERWINTERED_FLAG
        } else {
            self.version
        }
    }

    /// Byte length of everything after nExpiryHeight (or nLockTime before
    /// Overwinter), i.e. the part of the transaction the device receives as
    /// `extra_data`.
    pub fn shielded_len(&self) -> usize {
        if self.version < 2 {
            return 0;
        }

        let mut len = 0;
        if let Some(sapling) = &self.sapling {
            len += 8;
            len += VarInt(sapling.spends.len() as u64).len();
            len += sapling.spends.iter().map(SpendDescription::encoded_len).sum::<usize>();
            len += VarInt(sapling.outputs.len() as u64).len();
            len += sapling.outputs.iter().map(OutputDescription::encoded_len).sum::<usize>();
        }

        match &self.join_splits {
            Some(js) => {
                len += VarInt(js.descriptions.len() as u64).len();
                len += js
                    .descriptions
                    .iter()
                    .map(JoinSplitDescription::encoded_len)
                    .sum::<usize>();
                len += js.pubkey.len() + js.sig.len();
            }
            None => len += VarInt(0).len(),
        }

        if let Some(sig) = self.sapling.as_ref().and_then(|s| s.binding_sig.as_ref()) {
            len += sig.len();
        }
        len
    }

    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&encode::serialize(self)))
    }
}

impl Encodable for ZcashTransaction {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = 0;
        len += self.header().consensus_encode(writer)?;
        if let Some(group) = self.version_group_id {
            len += group.consensus_encode(writer)?;
        }
        len += self.inputs.consensus_encode(writer)?;
        len += self.outputs.consensus_encode(writer)?;
        len += self.lock_time.consensus_encode(writer)?;
        if let Some(expiry) = self.expiry_height {
            len += expiry.consensus_encode(writer)?;
        }

        if self.version < 2 {
            return Ok(len);
        }

        if let Some(sapling) = &self.sapling {
            len += sapling.value_balance.consensus_encode(writer)?;
            len += VarInt(sapling.spends.len() as u64).consensus_encode(writer)?;
            for spend in &sapling.spends {
                len += spend.consensus_encode(writer)?;
            }
            len += VarInt(sapling.outputs.len() as u64).consensus_encode(writer)?;
            for output in &sapling.outputs {
                len += output.consensus_encode(writer)?;
            }
        }

        match &self.join_splits {
            Some(js) => {
                len += VarInt(js.descriptions.len() as u64).consensus_encode(writer)?;
                for description in &js.descriptions {
                    len += description.consensus_encode(writer)?;
                }
                len += js.pubkey.consensus_encode(writer)?;
                len += write_all(writer, &js.sig)?;
            }
            None => len += VarInt(0).consensus_encode(writer)?,
        }

        if let Some(sig) = self.sapling.as_ref().and_then(|s| s.binding_sig.as_ref()) {
            len += write_all(writer, sig)?;
        }
        Ok(len)
    }
}

impl Decodable for ZcashTransaction {
    fn consensus_decode<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self, encode::Error> {
        let header = u32::consensus_decode(reader)?;
        let overwintered = header & OVERWINTERED_FLAG != 0;
        let version = header & !OVERWINTERED_FLAG;

        let version_group_id = if overwintered {
            let group = u32::consensus_decode(reader)?;
            match (version, group) {
                (3, OVERWINTER_VERSION_GROUP_ID) | (4, SAPLING_VERSION_GROUP_ID) => Some(group),
                (3, _) | (4, _) => {
                    return Err(encode::Error::ParseFailed(
                        "version group id does not match transaction version",
                    ))
                }
                _ => {
                    return Err(encode::Error::ParseFailed(
                        "unsupported overwintered transaction version",
                    ))
                }
            }
        } else {
            if !(1..=2).contains(&version) {
                return Err(encode::Error::ParseFailed(
                    "unsupported zcash transaction version",
                ));
            }
            None
        };

        let inputs = Vec::<TxIn>::consensus_decode(reader)?;
        let outputs = Vec::<TxOut>::consensus_decode(reader)?;
        let lock_time = u32::consensus_decode(reader)?;
        let expiry_height = if overwintered {
            Some(u32::consensus_decode(reader)?)
        } else {
            None
        };

        let mut tx = ZcashTransaction {
            overwintered,
            version,
            version_group_id,
            inputs,
            outputs,
            lock_time,
            expiry_height,
            sapling: None,
            join_splits: None,
        };
        if version < 2 {
            return Ok(tx);
        }

        if version >= 4 {
            let value_balance = i64::consensus_decode(reader)?;
            let spend_count = VarInt::consensus_decode(reader)?.0;
            let mut spends = Vec::new();
            for _ in 0..spend_count {
                spends.push(SpendDescription::consensus_decode(reader)?);
            }
            let output_count = VarInt::consensus_decode(reader)?.0;
            let mut outputs = Vec::new();
            for _ in 0..output_count {
                outputs.push(OutputDescription::consensus_decode(reader)?);
            }
            tx.sapling = Some(SaplingData {
                value_balance,
                spends,
                outputs,
                binding_sig: None,
            });
        }

        let join_split_count = VarInt::consensus_decode(reader)?.0;
        if join_split_count > 0 {
            let mut descriptions = Vec::new();
            for _ in 0..join_split_count {
                descriptions.push(JoinSplitDescription::decode(reader, version)?);
            }
            let pubkey = <[u8; 32]>::consensus_decode(reader)?;
            let sig = read_fixed(reader, SIGNATURE_SIZE)?;
            tx.join_splits = Some(JoinSplitData {
                descriptions,
                pubkey,
                sig,
            });
        }

        if let Some(sapling) = tx.sapling.as_mut() {
            if !sapling.spends.is_empty() || !sapling.outputs.is_empty() {
                sapling.binding_sig = Some(read_fixed(reader, SIGNATURE_SIZE)?);
            }
        }

        Ok(tx)
    }
}

impl RefTxSource for ZcashTransaction {
    fn version(&self) -> i32 {
        self.version as i32
    }

    fn lock_time(&self) -> u32 {
        self.lock_time
    }

    fn txid(&self) -> String {
        ZcashTransaction::txid(self).to_string()
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

    fn expiry(&self) -> Option<u32> {
        self.expiry_height
    }

    fn shielded(&self) -> Option<ShieldedExtension> {
        Some(ShieldedExtension {
            version_group_id: self.version_group_id.map(|id| format!("0x{:08x}", id)),
        })
    }

    fn extra_data_len(&self) -> usize {
        self.shielded_len()
    }
}
