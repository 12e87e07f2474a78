//! Shielded transaction components as laid out in sections 7.2–7.4 of the
//! Zcash protocol specification.
//!
//! The record transformer never looks inside these; they exist so that the
//! transaction model can round-trip raw bytes and report how long its
//! shielded tail is.

use std::io;

use bitcoin::consensus::encode::{self, Decodable, Encodable};

/// Size\[bytes\] of a BCTV14 JoinSplit proof (v2/v3 transactions).
pub const PHGR_PROOF_SIZE: usize = 296;
/// Size\[bytes\] of a Groth16 proof (JoinSplits in v4, Sapling spends/outputs).
pub const GROTH_PROOF_SIZE: usize = 192;
/// Size\[bytes\] of one JoinSplit note ciphertext.
pub const JS_CIPHERTEXT_SIZE: usize = 601;
/// Size\[bytes\] of a Sapling output's encrypted note.
pub const ENC_CIPHERTEXT_SIZE: usize = 580;
/// Size\[bytes\] of a Sapling output's outgoing ciphertext.
pub const OUT_CIPHERTEXT_SIZE: usize = 80;
/// Size\[bytes\] of Ed25519/RedJubjub signatures.
pub const SIGNATURE_SIZE: usize = 64;

pub(crate) fn read_fixed<R: io::Read + ?Sized>(
    reader: &mut R,
    len: usize,
) -> Result<Vec<u8>, encode::Error> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn write_all<W: io::Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    writer.write_all(bytes)?;
    Ok(bytes.len())
}

/// JoinSplit description (Sprout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSplitDescription {
    pub vpub_old: u64,
    pub vpub_new: u64,
    pub anchor: [u8; 32],
    pub nullifiers: [[u8; 32]; 2],
    pub commitments: [[u8; 32]; 2],
    pub ephemeral_key: [u8; 32],
    pub random_seed: [u8; 32],
    pub macs: [[u8; 32]; 2],
    /// BCTV14 before v4, Groth16 from v4 on.
    pub proof: Vec<u8>,
    pub ciphertexts: [Vec<u8>; 2],
}

impl JoinSplitDescription {
    /// Proof length used by transactions of `version`.
    pub fn proof_size(version: u32) -> usize {
        if version >= 4 {
            GROTH_PROOF_SIZE
        } else {
            PHGR_PROOF_SIZE
        }
    }

    pub fn encoded_len(&self) -> usize {
        8 + 8
            + 32
            + 32 * self.nullifiers.len()
            + 32 * self.commitments.len()
            + 32
            + 32
            + 32 * self.macs.len()
            + self.proof.len()
            + self.ciphertexts.iter().map(Vec::len).sum::<usize>()
    }

    pub fn decode<R: io::Read + ?Sized>(
        reader: &mut R,
        version: u32,
    ) -> Result<Self, encode::Error> {
        let vpub_old = u64::consensus_decode(reader)?;
        let vpub_new = u64::consensus_decode(reader)?;
        let anchor = <[u8; 32]>::consensus_decode(reader)?;
        let nullifiers = [
            <[u8; 32]>::consensus_decode(reader)?,
            <[u8; 32]>::consensus_decode(reader)?,
        ];
        let commitments = [
            <[u8; 32]>::consensus_decode(reader)?,
            <[u8; 32]>::consensus_decode(reader)?,
        ];
        let ephemeral_key = <[u8; 32]>::consensus_decode(reader)?;
        let random_seed = <[u8; 32]>::consensus_decode(reader)?;
        let macs = [
            <[u8; 32]>::consensus_decode(reader)?,
            <[u8; 32]>::consensus_decode(reader)?,
        ];
        let proof = read_fixed(reader, Self::proof_size(version))?;
        let ciphertexts = [
            read_fixed(reader, JS_CIPHERTEXT_SIZE)?,
            read_fixed(reader, JS_CIPHERTEXT_SIZE)?,
        ];

        Ok(JoinSplitDescription {
            vpub_old,
            vpub_new,
            anchor,
            nullifiers,
            commitments,
            ephemeral_key,
            random_seed,
            macs,
            proof,
            ciphertexts,
        })
    }
}

impl Encodable for JoinSplitDescription {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = 0;
        len += self.vpub_old.consensus_encode(writer)?;
        len += self.vpub_new.consensus_encode(writer)?;
        len += self.anchor.consensus_encode(writer)?;
        for nullifier in &self.nullifiers {
            len += nullifier.consensus_encode(writer)?;
        }
        for commitment in &self.commitments {
            len += commitment.consensus_encode(writer)?;
        }
        len += self.ephemeral_key.consensus_encode(writer)?;
        len += self.random_seed.consensus_encode(writer)?;
        for mac in &self.macs {
            len += mac.consensus_encode(writer)?;
        }
        len += write_all(writer, &self.proof)?;
        for ciphertext in &self.ciphertexts {
            len += write_all(writer, ciphertext)?;
        }
        Ok(len)
    }
}

/// JoinSplits of a transaction together with the signature that binds them.
/// Only present when the transaction has at least one JoinSplit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSplitData {
    pub descriptions: Vec<JoinSplitDescription>,
    pub pubkey: [u8; 32],
    pub sig: Vec<u8>,
}

/// Sapling spend description. Size\[bytes\]: 384
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendDescription {
    pub cv: [u8; 32],
    pub anchor: [u8; 32],
    pub nullifier: [u8; 32],
    pub rk: [u8; 32],
    pub zkproof: Vec<u8>,
    pub spend_auth_sig: Vec<u8>,
}

impl SpendDescription {
    pub fn encoded_len(&self) -> usize {
        32 * 4 + self.zkproof.len() + self.spend_auth_sig.len()
    }
}

impl Encodable for SpendDescription {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = 0;
        len += self.cv.consensus_encode(writer)?;
        len += self.anchor.consensus_encode(writer)?;
        len += self.nullifier.consensus_encode(writer)?;
        len += self.rk.consensus_encode(writer)?;
        len += write_all(writer, &self.zkproof)?;
        len += write_all(writer, &self.spend_auth_sig)?;
        Ok(len)
    }
}

impl Decodable for SpendDescription {
    fn consensus_decode<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self, encode::Error> {
        Ok(SpendDescription {
            cv: Decodable::consensus_decode(reader)?,
            anchor: Decodable::consensus_decode(reader)?,
            nullifier: Decodable::consensus_decode(reader)?,
            rk: Decodable::consensus_decode(reader)?,
            zkproof: read_fixed(reader, GROTH_PROOF_SIZE)?,
            spend_auth_sig: read_fixed(reader, SIGNATURE_SIZE)?,
        })
    }
}

/// Sapling output description. Size\[bytes\]: 948
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescription {
    pub cv: [u8; 32],
    pub cmu: [u8; 32],
    pub ephemeral_key: [u8; 32],
    pub enc_ciphertext: Vec<u8>,
    pub out_ciphertext: Vec<u8>,
    pub zkproof: Vec<u8>,
}

impl OutputDescription {
    pub fn encoded_len(&self) -> usize {
        32 * 3 + self.enc_ciphertext.len() + self.out_ciphertext.len() + self.zkproof.len()
    }
}

impl Encodable for OutputDescription {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = 0;
        len += self.cv.consensus_encode(writer)?;
        len += self.cmu.consensus_encode(writer)?;
        len += self.ephemeral_key.consensus_encode(writer)?;
        len += write_all(writer, &self.enc_ciphertext)?;
        len += write_all(writer, &self.out_ciphertext)?;
        len += write_all(writer, &self.zkproof)?;
        Ok(len)
    }
}

impl Decodable for OutputDescription {
    fn consensus_decode<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self, encode::Error> {
        Ok(OutputDescription {
            cv: Decodable::consensus_decode(reader)?,
            cmu: Decodable::consensus_decode(reader)?,
            ephemeral_key: Decodable::consensus_decode(reader)?,
            enc_ciphertext: read_fixed(reader, ENC_CIPHERTEXT_SIZE)?,
            out_ciphertext: read_fixed(reader, OUT_CIPHERTEXT_SIZE)?,
            zkproof: read_fixed(reader, GROTH_PROOF_SIZE)?,
        })
    }
}

/// Sapling part of a v4 transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaplingData {
    pub value_balance: i64,
    pub spends: Vec<SpendDescription>,
    pub outputs: Vec<OutputDescription>,
    /// Present iff there is at least one spend or output.
    pub binding_sig: Option<Vec<u8>>,
}

#[cfg(test)]
pub(crate) mod test_vectors {
    use super::*;

    pub fn join_split(version: u32, seed: u8) -> JoinSplitDescription {
        JoinSplitDescription {
            vpub_old: 0,
            vpub_new: 100_000 + seed as u64,
            anchor: [seed; 32],
            nullifiers: [[seed.wrapping_add(1); 32], [seed.wrapping_add(2); 32]],
            commitments: [[seed.wrapping_add(3); 32], [seed.wrapping_add(4); 32]],
            ephemeral_key: [seed.wrapping_add(5); 32],
            random_seed: [seed.wrapping_add(6); 32],
            macs: [[seed.wrapping_add(7); 32], [seed.wrapping_add(8); 32]],
            proof: vec![seed.wrapping_add(9); JoinSplitDescription::proof_size(version)],
            ciphertexts: [
                vec![seed.wrapping_add(10); JS_CIPHERTEXT_SIZE],
                vec![seed.wrapping_add(11); JS_CIPHERTEXT_SIZE],
            ],
        }
    }

    pub fn spend(seed: u8) -> SpendDescription {
        SpendDescription {
            cv: [seed; 32],
            anchor: [seed.wrapping_add(1); 32],
            nullifier: [seed.wrapping_add(2); 32],
            rk: [seed.wrapping_add(3); 32],
            zkproof: vec![seed.wrapping_add(4); GROTH_PROOF_SIZE],
            spend_auth_sig: vec![seed.wrapping_add(5); SIGNATURE_SIZE],
        }
    }

    pub fn output(seed: u8) -> OutputDescription {
        OutputDescription {
            cv: [seed; 32],
            cmu: [seed.wrapping_add(1); 32],
            ephemeral_key: [seed.wrapping_add(2); 32],
            enc_ciphertext: vec![seed.wrapping_add(3); ENC_CIPHERTEXT_SIZE],
            out_ciphertext: vec![seed.wrapping_add(4); OUT_CIPHERTEXT_SIZE],
            zkproof: vec![seed.wrapping_add(5); GROTH_PROOF_SIZE],
        }
    }
}
