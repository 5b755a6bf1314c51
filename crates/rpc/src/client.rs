use crate::{hexnum, BlockHeader, LogEntry, RpcError};
use jsonrpsee_core::client::ClientT;
use jsonrpsee_core::rpc_params;
use jsonrpsee_http_client::{HttpClient, HttpClientBuilder};
use tracing::instrument;

/// A thin async client for the read-only Ethereum JSON-RPC methods
/// `rivergate-core`'s services need: `eth_chainId`, `eth_blockNumber`,
/// `eth_getBlockByNumber`, `eth_getLogs`, `eth_call`, `eth_getBalance`.
///
/// Cheap to clone: `jsonrpsee_http_client::HttpClient` is itself a cheap,
/// `Arc`-backed handle over a pooled `hyper` connector.
#[derive(Debug, Clone)]
pub struct RpcClient {
    inner: HttpClient,
}

impl RpcClient {
    /// Connect to `url`. Fails only if the URL cannot be parsed or the
    /// underlying HTTP client cannot be built; no network call is made
    /// here (use [`RpcClient::chain_id`] to verify connectivity).
    pub fn connect(url: &str) -> Result<Self, RpcError> {
        let inner = HttpClientBuilder::default()
            .build(url)
            .map_err(RpcError::from_client_error)?;
        Ok(Self { inner })
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: jsonrpsee_core::params::ArrayParams,
    ) -> Result<T, RpcError> {
        self.inner.request(method, params).await.map_err(RpcError::from_client_error)
    }

    /// `eth_chainId`, read once at startup by `Env::connect`.
    #[instrument(skip_all)]
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let hex: String = self.request("eth_chainId", rpc_params![]).await?;
        hexnum::parse_u64(&hex)
    }

    /// `eth_blockNumber`, the current chain head.
    #[instrument(skip_all)]
    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let hex: String = self.request("eth_blockNumber", rpc_params![]).await?;
        hexnum::parse_u64(&hex)
    }

    /// `eth_getBlockByNumber(number, false)`, or `"latest"` when `number`
    /// is `None`. Returns `Ok(None)` on an RPC `null` response
    /// (`BlockNotFound` is a "not found" outcome, never an error,
    /// spec.md §7).
    #[instrument(skip_all)]
    pub async fn get_block_by_number(&self, number: Option<u64>) -> Result<Option<BlockHeader>, RpcError> {
        let tag = number.map(hexnum::to_quantity).unwrap_or_else(|| "latest".to_string());
        let raw: Option<BlockHeader> = self.request("eth_getBlockByNumber", rpc_params![tag, false]).await?;
        Ok(raw)
    }

    /// `eth_getLogs` over `[from_block, to_block]` (inclusive, matching the
    /// RPC method's own semantics) for `address`, with `topics` passed
    /// through verbatim — `topics[0]` is conventionally the event
    /// signature hash, `topics[1..]` encode an indexed-argument filter.
    /// Argument-filter-to-topic translation is the caller's (ABI-aware)
    /// responsibility; this client only forwards whatever topics it is
    /// given.
    #[instrument(skip_all, fields(from_block, to_block))]
    pub async fn get_logs(
        &self,
        from_block: u64,
        to_block: u64,
        address: &str,
        topics: &[Option<Vec<String>>],
    ) -> Result<Vec<LogEntry>, RpcError> {
        let filter = serde_json::json!({
            "fromBlock": hexnum::to_quantity(from_block),
            "toBlock": hexnum::to_quantity(to_block),
            "address": address,
            "topics": topics,
        });
        self.request("eth_getLogs", rpc_params![filter]).await
    }

    /// `eth_call({to, data}, block)`. Returns the ABI-encoded hex response
    /// verbatim; decoding it into a JSON value is the caller's job
    /// (`rivergate-core`'s `CallCache` stores whatever the caller decoded).
    #[instrument(skip_all)]
    pub async fn call(&self, to: &str, data: &str, block: u64) -> Result<String, RpcError> {
        let tx = serde_json::json!({ "to": to, "data": data });
        let tag = hexnum::to_quantity(block);
        self.request::<String>("eth_call", rpc_params![tx, tag]).await
    }

    /// `eth_getBalance(address, block)`, returned as wei.
    #[instrument(skip_all)]
    pub async fn get_balance(&self, address: &str, block: u64) -> Result<u128, RpcError> {
        let tag = hexnum::to_quantity(block);
        let hex: String = self.request("eth_getBalance", rpc_params![address, tag]).await?;
        hexnum::parse_u128(&hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_malformed_url() {
        assert!(RpcClient::connect("not a url").is_err());
    }
}
