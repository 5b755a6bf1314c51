use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A cached `eth_call` result. Uniqueness: `(chain_id, address, calldata,
/// block_number)`. `calldata` and `address` are lowercase hex; the response
/// is stored as canonical JSON since `eth_call` returns may decode to a
/// scalar, a tuple, or a nested structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Chain the call was made against.
    pub chain_id: u64,
    /// Lowercase hex target contract address.
    pub address: String,
    /// Lowercase hex `selector ++ abi_encode(args)`.
    pub calldata: String,
    /// Block the call was evaluated at.
    pub block_number: u64,
    /// Decoded response, as canonical JSON.
    pub response: Json,
}
