use crate::{BlockHeader, LogEntry, RpcError};
use async_trait::async_trait;

/// Object-safe seam over the Ethereum JSON-RPC methods `rivergate-core`'s
/// services call. [`RpcClient`](crate::RpcClient) is the only production
/// implementation; tests in `rivergate-core` implement this trait directly
/// to script RPC responses (including failures) deterministically, without
/// a live endpoint.
#[async_trait]
pub trait EthRpc: Send + Sync + std::fmt::Debug {
    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// `eth_blockNumber`.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// `eth_getBlockByNumber(number, false)`, or `"latest"` when `number` is
    /// `None`.
    async fn get_block_by_number(&self, number: Option<u64>) -> Result<Option<BlockHeader>, RpcError>;

    /// `eth_getLogs` over `[from_block, to_block]` for `address`.
    async fn get_logs(
        &self,
        from_block: u64,
        to_block: u64,
        address: &str,
        topics: &[Option<Vec<String>>],
    ) -> Result<Vec<LogEntry>, RpcError>;

    /// `eth_call({to, data}, block)`.
    async fn call(&self, to: &str, data: &str, block: u64) -> Result<String, RpcError>;

    /// `eth_getBalance(address, block)`, in wei.
    async fn get_balance(&self, address: &str, block: u64) -> Result<u128, RpcError>;
}

#[async_trait]
impl EthRpc for crate::RpcClient {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Self::chain_id(self).await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        Self::block_number(self).await
    }

    async fn get_block_by_number(&self, number: Option<u64>) -> Result<Option<BlockHeader>, RpcError> {
        Self::get_block_by_number(self, number).await
    }

    async fn get_logs(
        &self,
        from_block: u64,
        to_block: u64,
        address: &str,
        topics: &[Option<Vec<String>>],
    ) -> Result<Vec<LogEntry>, RpcError> {
        Self::get_logs(self, from_block, to_block, address, topics).await
    }

    async fn call(&self, to: &str, data: &str, block: u64) -> Result<String, RpcError> {
        Self::call(self, to, data, block).await
    }

    async fn get_balance(&self, address: &str, block: u64) -> Result<u128, RpcError> {
        Self::get_balance(self, address, block).await
    }
}
