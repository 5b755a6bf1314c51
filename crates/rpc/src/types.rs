use serde::Deserialize;

/// The subset of `eth_getBlockByNumber`'s response this crate needs:
/// enough to populate `rivergate_types::Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BlockHeader {
    /// Block number, decoded from the response's `0x`-hex `number` field.
    #[serde(rename = "number", deserialize_with = "crate::hexnum::de_u64")]
    pub number: u64,
    /// Block timestamp, decoded from the response's `0x`-hex `timestamp`
    /// field.
    #[serde(rename = "timestamp", deserialize_with = "crate::hexnum::de_i64")]
    pub timestamp: i64,
}

/// A raw (undecoded) event log, as returned by `eth_getLogs`. Decoding
/// topics/data into a named argument mapping is out of scope for this
/// crate (spec.md §1): that is the job of an ABI-aware collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    /// Lowercase hex contract address that emitted the log.
    pub address: String,
    /// Indexed topics, `topics[0]` is the event signature hash.
    pub topics: Vec<String>,
    /// Non-indexed data, `0x`-hex encoded.
    pub data: String,
    /// Block the log was included in.
    #[serde(rename = "blockNumber", deserialize_with = "crate::hexnum::de_u64")]
    pub block_number: u64,
    /// Transaction hash, lowercase hex.
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
    /// Index of the log within its transaction's receipt.
    #[serde(rename = "logIndex", deserialize_with = "crate::hexnum::de_u64")]
    pub log_index: u64,
}
