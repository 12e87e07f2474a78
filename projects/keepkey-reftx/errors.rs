use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefTxError {
    #[error("Malformed payload in {txid}: extra data of {payload_len} bytes exceeds serialized size {serialized_len}")]
    MalformedPayload {
        txid: String,
        payload_len: usize,
        serialized_len: usize,
    },

    #[error("Malformed field {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Consensus decode error: {0}")]
    Consensus(#[from] bitcoin::consensus::encode::Error),
}

pub type Result<T> = std::result::Result<T, RefTxError>;
