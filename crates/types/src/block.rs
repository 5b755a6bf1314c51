use serde::{Deserialize, Serialize};

/// A cached block header, the minimum the resolver needs: its number and
/// timestamp. Immutable once written; uniqueness is `(chain_id, number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Chain this block belongs to.
    pub chain_id: u64,
    /// Block number. Monotonic, nonnegative.
    pub number: u64,
    /// Seconds since epoch. Strictly increasing with `number`.
    pub timestamp: i64,
}
