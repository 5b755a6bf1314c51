use crate::{Env, FetchError};
use futures::stream::{self, StreamExt};
use rivergate_types::{to_lowercase_hex, Balance};
use tracing::instrument;

/// Bound on concurrent in-flight `eth_getBalance` requests for a bulk
/// lookup (spec.md §5).
const MAX_CONCURRENT_REQUESTS: usize = 16;

/// Caches native-token balances, keyed on `(address, block_number)`.
#[derive(Debug, Clone)]
pub struct BalanceCache {
    env: Env,
}

impl BalanceCache {
    /// Build a cache from a shared [`Env`].
    pub const fn new(env: Env) -> Self {
        Self { env }
    }

    /// The cached (or freshly fetched and persisted) balance, in wei.
    #[instrument(skip(self))]
    pub async fn get_balance(&self, address: &str, block_number: u64) -> Result<u128, FetchError> {
        let chain_id = self.env.chain_id();
        let address = to_lowercase_hex(address);

        let found = self.env.store().balances().find(chain_id, std::slice::from_ref(&address), block_number).await?;
        if let Some(Some(balance)) = found.into_iter().next() {
            return Ok(balance.wei);
        }

        let wei = self.env.rpc().get_balance(&address, block_number).await?;
        self.env.store().balances().save(Balance { chain_id, address, block_number, wei }).await?;
        Ok(wei)
    }

    /// Bulk lookup over `addresses` at `block_number`, preserving the
    /// caller's order and multiplicity rather than deduplicating through a
    /// set (Open Question #2: the source's `BalancesRepo.find` scrambled
    /// order this way; this cache and [`rivergate_store::repos::BalancesRepo::find`]
    /// both avoid it). Only cache misses are fetched, fanned out with
    /// bounded concurrency.
    #[instrument(skip(self, addresses))]
    pub async fn get_balances(&self, addresses: &[String], block_number: u64) -> Result<Vec<u128>, FetchError> {
        let chain_id = self.env.chain_id();
        let normalized: Vec<String> = addresses.iter().map(|a| to_lowercase_hex(a)).collect();

        let cached = self.env.store().balances().find(chain_id, &normalized, block_number).await?;

        let results = stream::iter(normalized.into_iter().zip(cached).enumerate())
            .map(|(i, (address, hit))| async move {
                let result = match hit {
                    Some(balance) => Ok(balance.wei),
                    None => self.get_balance(&address, block_number).await,
                };
                result.map(|wei| (i, wei))
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect::<Vec<Result<(usize, u128), FetchError>>>()
            .await;

        // `buffer_unordered` completes out of submission order; restore it
        // by the index stamped on each future before the fan-out.
        let mut indexed = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        indexed.sort_by_key(|(i, _)| *i);
        Ok(indexed.into_iter().map(|(_, v)| v).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivergate_rpc::{BlockHeader, EthRpc, LogEntry, RpcError};
    use rivergate_store::Store;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct CountingRpc {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EthRpc for CountingRpc {
        async fn chain_id(&self) -> Result<u64, RpcError> {
            Ok(1)
        }
        async fn block_number(&self) -> Result<u64, RpcError> {
            Ok(0)
        }
        async fn get_block_by_number(&self, _number: Option<u64>) -> Result<Option<BlockHeader>, RpcError> {
            Ok(None)
        }
        async fn get_logs(
            &self,
            _from_block: u64,
            _to_block: u64,
            _address: &str,
            _topics: &[Option<Vec<String>>],
        ) -> Result<Vec<LogEntry>, RpcError> {
            Ok(vec![])
        }
        async fn call(&self, _to: &str, _data: &str, _block: u64) -> Result<String, RpcError> {
            Ok("0x".to_string())
        }
        async fn get_balance(&self, address: &str, _block: u64) -> Result<u128, RpcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(address.len() as u128)
        }
    }

    async fn cache_with(rpc: CountingRpc) -> (BalanceCache, Arc<CountingRpc>) {
        let store = Store::open_in_memory().await.unwrap();
        let rpc = Arc::new(rpc);
        let env = Env::from_parts(1, rpc.clone(), store, 1000);
        (BalanceCache::new(env), rpc)
    }

    #[tokio::test]
    async fn caches_single_balance() {
        let (cache, rpc) = cache_with(CountingRpc::default()).await;
        let first = cache.get_balance("0xAAA", 100).await.unwrap();
        let second = cache.get_balance("0xaaa", 100).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bulk_lookup_preserves_order_and_duplicates() {
        let (cache, _rpc) = cache_with(CountingRpc::default()).await;
        let addresses = vec!["0xa".to_string(), "0xbb".to_string(), "0xa".to_string()];
        let results = cache.get_balances(&addresses, 100).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], results[2]);
        assert_ne!(results[0], results[1]);
    }

    #[tokio::test]
    async fn bulk_lookup_only_fetches_misses() {
        let (cache, rpc) = cache_with(CountingRpc::default()).await;
        cache.get_balance("0xa", 1).await.unwrap();

        let addresses = vec!["0xa".to_string(), "0xb".to_string(), "0xc".to_string()];
        cache.get_balances(&addresses, 1).await.unwrap();
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 3);
    }

    /// Sleeps longer for addresses submitted earlier, so completion order is
    /// the exact reverse of submission order — a real fan-out race, not one
    /// that happens to resolve in submission order by luck.
    #[derive(Debug, Default)]
    struct ReverseOrderRpc;

    #[async_trait::async_trait]
    impl EthRpc for ReverseOrderRpc {
        async fn chain_id(&self) -> Result<u64, RpcError> {
            Ok(1)
        }
        async fn block_number(&self) -> Result<u64, RpcError> {
            Ok(0)
        }
        async fn get_block_by_number(&self, _number: Option<u64>) -> Result<Option<BlockHeader>, RpcError> {
            Ok(None)
        }
        async fn get_logs(
            &self,
            _from_block: u64,
            _to_block: u64,
            _address: &str,
            _topics: &[Option<Vec<String>>],
        ) -> Result<Vec<LogEntry>, RpcError> {
            Ok(vec![])
        }
        async fn call(&self, _to: &str, _data: &str, _block: u64) -> Result<String, RpcError> {
            Ok("0x".to_string())
        }
        async fn get_balance(&self, address: &str, _block: u64) -> Result<u128, RpcError> {
            // address encodes its submission index as "0x<digit>"; later
            // completion for earlier indices inverts submission order.
            let index: u64 = address.trim_start_matches("0x").parse().unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20 * (5 - index))).await;
            Ok(index as u128)
        }
    }

    #[tokio::test]
    async fn bulk_lookup_survives_out_of_order_completion() {
        let store = Store::open_in_memory().await.unwrap();
        let env = Env::from_parts(1, Arc::new(ReverseOrderRpc), store, 1000);
        let cache = BalanceCache::new(env);

        let addresses = vec!["0x0".to_string(), "0x1".to_string(), "0x2".to_string(), "0x3".to_string(), "0x4".to_string()];
        let results = cache.get_balances(&addresses, 1).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }
}
