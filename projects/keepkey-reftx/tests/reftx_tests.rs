use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode;
use bitcoin::hashes::Hash;
use bitcoin::{OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use keepkey_reftx::chains::zcash::{
    self, JoinSplitData, JoinSplitDescription, ZcashTransaction, OVERWINTER_VERSION_GROUP_ID,
};
use keepkey_reftx::chains::{peercoin, BitcoinTxInput, ScriptType, TimestampedTransaction};
use keepkey_reftx::utils::{reverse_bytes, reversed_hex};
use keepkey_reftx::{
    select_references, transform_transactions, RefTransaction, RefTxBinOutput, RefTxSource,
};

fn tx_in(prev: [u8; 32], vout: u32, script_sig: Vec<u8>) -> TxIn {
    TxIn {
        previous_output: OutPoint {
            txid: Txid::from_byte_array(prev),
            vout,
        },
        script_sig: ScriptBuf::from_bytes(script_sig),
        sequence: Sequence::MAX,
        witness: Witness::default(),
    }
}

fn tx_out(value: u64, script: Vec<u8>) -> TxOut {
    TxOut {
        value,
        script_pubkey: ScriptBuf::from_bytes(script),
    }
}

fn bitcoin_tx(version: i32) -> Transaction {
    Transaction {
        version,
        lock_time: LockTime::from_consensus(650_000),
        input: vec![tx_in([0x42; 32], 2, vec![0x00, 0x14])],
        output: vec![tx_out(1000, vec![0xab]), tx_out(2500, vec![0xcd])],
    }
}

fn sprout_join_split() -> JoinSplitDescription {
    JoinSplitDescription {
        vpub_old: 10_000,
        vpub_new: 0,
        anchor: [1; 32],
        nullifiers: [[2; 32], [3; 32]],
        commitments: [[4; 32], [5; 32]],
        ephemeral_key: [6; 32],
        random_seed: [7; 32],
        macs: [[8; 32], [9; 32]],
        proof: vec![10; 296],
        ciphertexts: [vec![11; 601], vec![12; 601]],
    }
}

fn overwinter_tx() -> ZcashTransaction {
    ZcashTransaction {
        overwintered: true,
        version: 3,
        version_group_id: Some(OVERWINTER_VERSION_GROUP_ID),
        inputs: vec![tx_in([0x77; 32], 0, vec![0x51])],
        outputs: vec![tx_out(2_000_000, vec![0x76, 0xa9, 0x14])],
        lock_time: 0,
        expiry_height: Some(419_300),
        sapling: None,
        join_splits: Some(JoinSplitData {
            descriptions: vec![sprout_join_split()],
            pubkey: [0xee; 32],
            sig: vec![0xdd; 64],
        }),
    }
}

#[test]
fn test_empty_inputs_and_transactions() {
    let inputs: Vec<BitcoinTxInput> = Vec::new();
    assert!(select_references(&inputs).is_empty());

    let txs: Vec<Transaction> = Vec::new();
    assert!(transform_transactions(&txs).unwrap().is_empty());
}

#[test]
fn test_prev_hash_is_reversed() {
    let prev: [u8; 32] = core::array::from_fn(|i| i as u8 + 1);
    let mut tx = bitcoin_tx(1);
    tx.input = vec![tx_in(prev, 0, vec![])];

    let records = transform_transactions(&[tx]).unwrap();
    let mut expected = prev;
    expected.reverse();
    assert_eq!(records[0].inputs[0].prev_hash, hex::encode(expected));
    assert_eq!(records[0].inputs[0].script_sig, "");
}

#[test]
fn test_bin_outputs_keep_order() {
    let records = transform_transactions(&[bitcoin_tx(1)]).unwrap();
    assert_eq!(
        records[0].bin_outputs,
        vec![
            RefTxBinOutput {
                amount: 1000,
                script_pubkey: "ab".to_string(),
            },
            RefTxBinOutput {
                amount: 2500,
                script_pubkey: "cd".to_string(),
            },
        ]
    );
}

#[test]
fn test_bitcoin_record_fields() {
    let tx = bitcoin_tx(2);
    let records = transform_transactions(std::slice::from_ref(&tx)).unwrap();
    let record = &records[0];

    assert_eq!(record.lock_time, 650_000);
    assert_eq!(record.version, 2);
    assert_eq!(record.hash, tx.txid().to_string());
    assert_eq!(record.inputs[0].prev_index, 2);
    assert_eq!(record.inputs[0].sequence, 0xffff_ffff);
    assert_eq!(record.inputs[0].script_sig, "0014");
    // Plain Bitcoin has no shielded variant, even at version 2
    assert_eq!(record.extra_data, None);
    assert_eq!(record.version_group_id, None);
    assert_eq!(record.timestamp, None);
    assert_eq!(record.expiry, None);
}

#[test]
fn test_record_hash_is_not_reversed_again() {
    let tx = bitcoin_tx(1);
    let records = transform_transactions(std::slice::from_ref(&tx)).unwrap();
    let record = &records[0];
    assert_eq!(record.hash, reversed_hex(tx.txid().as_byte_array()));
}

#[test]
fn test_absent_fields_are_omitted_from_json() {
    let records = transform_transactions(&[bitcoin_tx(1)]).unwrap();
    let record = &records[0];
    let value = serde_json::to_value(record).unwrap();
    let object = value.as_object().unwrap();

    for key in ["lock_time", "version", "hash", "inputs", "bin_outputs"] {
        assert!(object.contains_key(key), "missing {}", key);
    }
    for key in ["extra_data", "timestamp", "version_group_id", "expiry"] {
        assert!(!object.contains_key(key), "unexpected {}", key);
    }

    let back: RefTransaction = serde_json::from_value(value).unwrap();
    assert_eq!(&back, record);
}

#[test]
fn test_zcash_overwinter_end_to_end() {
    let _ = env_logger::try_init();

    let raw = encode::serialize(&overwinter_tx());
    let tx = zcash::parse_transaction(&raw).unwrap();
    let records = transform_transactions(&[tx]).unwrap();
    let record = &records[0];

    // nJoinSplit + one BCTV14 JoinSplit + joinSplitPubKey + joinSplitSig
    let extra_len = 1 + 1802 + 32 + 64;
    assert_eq!(
        record.extra_data.as_deref(),
        Some(hex::encode(&raw[raw.len() - extra_len..]).as_str())
    );
    assert_eq!(record.version, 3);
    assert_eq!(record.version_group_id, Some(63210608));
    assert_eq!(record.expiry, Some(419_300));
    assert_eq!(record.timestamp, None);
    assert_eq!(record.inputs[0].prev_hash, "77".repeat(32));
    assert_eq!(record.bin_outputs[0].script_pubkey, "76a914");

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["version_group_id"], 63210608);
    assert_eq!(json["expiry"], 419_300);
}

#[test]
fn test_zcash_known_sapling_transaction_record() {
    let raw = hex::decode(
        "0400008085202f8901a8c685478265f4c14dada651969c45a65e1aeb8cd6791f2f5bb6a1d9952104d901000000\
         6b483045022100ef50a15eece0f43a0efd13a2c45aecf85e8e999858721150a70e75b106d80ea702202b3ff79f\
         dcd2ff101dcacd74a7f6e3adb1250955f7a80962b259d1e17742f2f70121037e8e3a964e0f59c52633e25f9cec\
         2fc8bb9af5b23eace85f6264f68b47db5cb6feffffff02005a6202000000001976a9148132712c3ff19f3a1512\
         34616777420a6d7ef22688ac8b959800000000001976a9145453e4698f02a38abdaa521cd1ff2dee6fac187188\
         ac29b0040048b004000000000000000000000000",
    )
    .unwrap();
    let tx = zcash::parse_transaction(&raw).unwrap();
    assert_eq!(encode::serialize(&tx), raw);

    let records = transform_transactions(&[tx]).unwrap();
    let record = &records[0];
    assert_eq!(
        record.hash,
        "c721c1643f30fc1f0a884b589de4537691c1d652966c8e81c8f67a5203537883"
    );
    assert_eq!(record.version, 4);
    assert_eq!(record.version_group_id, Some(0x892F_2085));
    assert_eq!(record.expiry, Some(0x0004_b048));
    assert_eq!(record.lock_time, 0x0004_b029);
    assert_eq!(record.extra_data, Some("00".repeat(11)));
    assert_eq!(
        record.inputs[0].prev_hash,
        "d9042195d9a1b65b2f1f79d68ceb1a5ea6459c9651a6ad4dc1f465824785c6a8"
    );
    assert_eq!(record.inputs[0].prev_index, 1);
    assert_eq!(record.inputs[0].sequence, 0xffff_fffe);
    assert_eq!(record.bin_outputs[0].amount, 40_000_000);
    assert_eq!(
        record.bin_outputs[1].script_pubkey,
        "76a9145453e4698f02a38abdaa521cd1ff2dee6fac187188ac"
    );
}

#[test]
fn test_zcash_v1_has_no_extra_data() {
    let tx = ZcashTransaction {
        overwintered: false,
        version: 1,
        version_group_id: None,
        inputs: vec![tx_in([0x01; 32], 0, vec![])],
        outputs: vec![tx_out(1, vec![])],
        lock_time: 0,
        expiry_height: None,
        sapling: None,
        join_splits: None,
    };
    let records = transform_transactions(&[tx]).unwrap();
    let record = &records[0];
    assert_eq!(record.extra_data, None);
    assert_eq!(record.version_group_id, None);
    assert_eq!(record.expiry, None);
}

#[test]
fn test_zcash_sprout_v2_extra_data_without_group_id() {
    let mut tx = overwinter_tx();
    tx.overwintered = false;
    tx.version = 2;
    tx.version_group_id = None;
    tx.expiry_height = None;

    let raw = encode::serialize(&tx);
    let records = transform_transactions(&[zcash::parse_transaction(&raw).unwrap()]).unwrap();
    let record = &records[0];
    let extra = record.extra_data.as_deref().unwrap();
    assert_eq!(extra.len() / 2, 1 + 1802 + 32 + 64);
    assert!(extra.starts_with("01"));
    assert_eq!(record.version_group_id, None);
    assert_eq!(record.expiry, None);
}

#[test]
fn test_peercoin_timestamp_passthrough() {
    let tx = TimestampedTransaction {
        version: 1,
        time: 1_600_000_000,
        inputs: vec![tx_in([0x05; 32], 1, vec![0x51])],
        outputs: vec![tx_out(10_000, vec![0x6a])],
        lock_time: 0,
    };
    let parsed = peercoin::parse_transaction(&encode::serialize(&tx)).unwrap();
    let records = transform_transactions(&[parsed]).unwrap();
    let record = &records[0];

    assert_eq!(record.timestamp, Some(1_600_000_000));
    assert_eq!(record.hash, tx.txid().to_string());
    assert_eq!(record.extra_data, None);
    assert_eq!(record.version_group_id, None);
}

#[test]
fn test_mixed_chains_in_one_batch() {
    let txs: Vec<Box<dyn RefTxSource>> = vec![Box::new(bitcoin_tx(1)), Box::new(overwinter_tx())];
    let records = transform_transactions(&txs).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].extra_data.is_none());
    assert!(records[1].extra_data.is_some());
}

#[test]
fn test_select_then_transform() {
    let fetched = bitcoin_tx(1);
    let txid = fetched.txid().to_string();
    let inputs = vec![
        BitcoinTxInput::from_txid(
            &txid,
            0,
            vec![0x8000_002c, 0x8000_0000, 0x8000_0000, 0, 0],
            1000,
            ScriptType::P2PKH,
        )
        .unwrap(),
        BitcoinTxInput::from_txid(&txid, 1, vec![], 2500, ScriptType::P2PKH).unwrap(),
        BitcoinTxInput::new(vec![0x99; 32], 0, vec![], 5000, ScriptType::P2WPKH),
    ];

    let refs = select_references(&inputs);
    assert_eq!(refs, vec![txid.clone()]);

    let records = transform_transactions(&[fetched]).unwrap();
    assert_eq!(records[0].hash, refs[0]);
}

#[test]
fn test_double_reverse_is_identity() {
    let bytes: Vec<u8> = (0..32).map(|i| i * 7).collect();
    assert_eq!(reverse_bytes(&reverse_bytes(&bytes)), bytes);
}
