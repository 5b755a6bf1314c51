use serde::{Deserialize, Serialize};

/// A cached native-token balance. Uniqueness: `(chain_id, address,
/// block_number)`. `address` is lowercase hex; `wei` is always the
/// canonical integer amount, never scaled (Open Question #4 in the
/// design notes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Chain the balance was observed on.
    pub chain_id: u64,
    /// Lowercase hex account address.
    pub address: String,
    /// Block the balance was observed at.
    pub block_number: u64,
    /// Amount held, in wei.
    pub wei: u128,
}
