use serde::{Deserialize, Serialize};

/// ERC-20 token metadata, consumed read-only by the core. Populated by an
/// external collaborator (not this workspace); rivergate only stores and
/// serves what it is given. Uniqueness: `(chain_id, address)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Meta {
    /// Chain the token contract is deployed on.
    pub chain_id: u64,
    /// Lowercase hex token contract address.
    pub address: String,
    /// Token name, e.g. `"USD Coin"`.
    pub name: String,
    /// Token symbol, e.g. `"USDC"`.
    pub symbol: String,
    /// Number of decimals the token's balance is scaled by.
    pub decimals: u8,
}
