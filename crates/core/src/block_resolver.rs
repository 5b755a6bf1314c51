use crate::{Env, FetchError};
use rivergate_types::Block;
use tracing::{info, instrument};

/// Mainnet-family chain ids whose ~13s block time is used only to size the
/// progress log in [`BlockResolver::get_block_at_or_after`] — ground truth:
/// `BlocksService.__init__`'s `_block_time_est`.
const THIRTEEN_SECOND_CHAIN_IDS: &[u64] = &[1, 3, 4, 5, 42];

/// Resolves block headers and timestamps, caching every block it fetches.
#[derive(Debug, Clone)]
pub struct BlockResolver {
    env: Env,
}

impl BlockResolver {
    /// Build a resolver from a shared [`Env`].
    pub const fn new(env: Env) -> Self {
        Self { env }
    }

    /// Estimated seconds per block for this resolver's chain, used only to
    /// size a progress log — never the search's correctness or termination.
    fn block_time_estimate(&self) -> f64 {
        if THIRTEEN_SECOND_CHAIN_IDS.contains(&self.env.chain_id()) {
            13.0
        } else {
            1.0
        }
    }

    /// Look up `number` (or the chain head, when `None`), persisting on a
    /// cache miss. `Ok(None)` means the RPC endpoint reports no such block
    /// (`BlockNotFound` is a "not found" outcome, never an error).
    #[instrument(skip(self))]
    pub async fn get_block(&self, number: Option<u64>) -> Result<Option<Block>, FetchError> {
        let chain_id = self.env.chain_id();

        if let Some(number) = number {
            let cached = self.env.store().blocks().find(chain_id, &[number]).await?;
            if let Some(Some(block)) = cached.into_iter().next() {
                return Ok(Some(block));
            }
        }

        self.fetch_and_save(number).await
    }

    /// The chain head. Always issues an RPC call; never served from cache.
    #[instrument(skip(self))]
    pub async fn latest_block(&self) -> Result<Option<Block>, FetchError> {
        self.fetch_and_save(None).await
    }

    async fn fetch_and_save(&self, number: Option<u64>) -> Result<Option<Block>, FetchError> {
        let header = self.env.rpc().get_block_by_number(number).await?;
        let Some(header) = header else { return Ok(None) };
        let block = Block { chain_id: self.env.chain_id(), number: header.number, timestamp: header.timestamp };
        self.env.store().blocks().save(block).await?;
        Ok(Some(block))
    }

    /// Timestamps for `numbers`, approximated via grid interpolation: each
    /// block fetches the two surrounding grid lines (`⌊b/grid_step⌋·grid_step`
    /// and that plus `grid_step`) rather than itself, so `N` arbitrary block
    /// numbers cost at most `2*ceil(N/grid_step)` RPC calls rather than `N`.
    /// `grid_step == 0`, or a block that already lands on the grid, is
    /// fetched exactly.
    #[instrument(skip(self, numbers))]
    pub async fn get_block_timestamps(&self, numbers: &[u64], grid_step: u64) -> Result<Vec<Option<i64>>, FetchError> {
        use std::collections::BTreeSet;

        let mut wanted: BTreeSet<u64> = BTreeSet::new();
        for &bn in numbers {
            if grid_step == 0 || bn % grid_step == 0 {
                wanted.insert(bn);
            } else {
                let rounded = bn - (bn % grid_step);
                wanted.insert(rounded);
                wanted.insert(rounded + grid_step);
            }
        }
        let wanted: Vec<u64> = wanted.into_iter().collect();

        let chain_id = self.env.chain_id();
        let cached = self.env.store().blocks().find(chain_id, &wanted).await?;

        let mut timestamps: std::collections::HashMap<u64, i64> = std::collections::HashMap::new();
        for (number, block) in wanted.iter().zip(cached.iter()) {
            if let Some(block) = block {
                timestamps.insert(*number, block.timestamp);
            }
        }

        let missing: Vec<u64> = wanted.iter().copied().filter(|n| !timestamps.contains_key(n)).collect();
        for number in missing {
            if let Some(block) = self.fetch_and_save(Some(number)).await? {
                timestamps.insert(number, block.timestamp);
            }
        }

        let mut out = Vec::with_capacity(numbers.len());
        for &bn in numbers {
            if grid_step == 0 || bn % grid_step == 0 {
                out.push(timestamps.get(&bn).copied());
                continue;
            }
            let rounded = bn - (bn % grid_step);
            let (Some(&lo), Some(&hi)) = (timestamps.get(&rounded), timestamps.get(&(rounded + grid_step))) else {
                out.push(None);
                continue;
            };
            let w = (bn % grid_step) as f64 / grid_step as f64;
            let interpolated = (lo as f64 * (1.0 - w) + hi as f64 * w) as i64;
            out.push(Some(interpolated));
        }
        Ok(out)
    }

    /// The earliest block whose timestamp is `>= timestamp`, found by
    /// interpolation search bracketed by the latest known-below and
    /// known-above blocks in the store (falling back to block 1 and the
    /// chain head). Invariant: `left.timestamp < timestamp <=
    /// right.timestamp`. `None` if even the chain head predates
    /// `timestamp`.
    #[instrument(skip(self))]
    pub async fn get_block_at_or_after(&self, timestamp: i64) -> Result<Option<Block>, FetchError> {
        let chain_id = self.env.chain_id();

        let mut right = match self.env.store().blocks().get_after_timestamp(chain_id, timestamp).await? {
            Some(block) => block,
            None => match self.latest_block().await? {
                Some(block) => block,
                None => return Ok(None),
            },
        };
        if right.timestamp < timestamp {
            return Ok(None);
        }

        let mut left = match self.env.store().blocks().get_before_timestamp(chain_id, timestamp).await? {
            Some(block) => block,
            None => match self.get_block(Some(1)).await? {
                Some(block) => block,
                None => return Ok(Some(right)),
            },
        };

        if left.timestamp >= timestamp {
            return Ok(Some(left));
        }
        if right.number.saturating_sub(left.number) <= 1 {
            return Ok(Some(right));
        }

        let estimated_hops = ((right.number - left.number) as f64).log2().ceil() as u64;
        let mut hops = 0u64;
        let block_time = self.block_time_estimate();
        info!(estimated_hops, block_time, "interpolation-searching for block at or after timestamp");

        while right.number.saturating_sub(left.number) > 1 {
            hops += 1;
            let w = (timestamp - left.timestamp) as f64 / (right.timestamp - left.timestamp) as f64;
            let mut num = (left.number as f64 * (1.0 - w) + right.number as f64 * w) as u64;
            if num == left.number {
                num += 1;
            } else if num == right.number {
                num -= 1;
            }

            let Some(block) = self.get_block(Some(num)).await? else { break };
            if block.timestamp >= timestamp {
                right = block;
            } else {
                left = block;
            }
        }
        info!(hops, "interpolation search converged");

        Ok(Some(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivergate_rpc::{BlockHeader, EthRpc, LogEntry, RpcError};
    use rivergate_store::Store;
    use std::sync::Arc;

    #[derive(Debug)]
    struct LinearChain {
        genesis: i64,
        block_time: i64,
        head: u64,
    }

    #[async_trait::async_trait]
    impl EthRpc for LinearChain {
        async fn chain_id(&self) -> Result<u64, RpcError> {
            Ok(1)
        }
        async fn block_number(&self) -> Result<u64, RpcError> {
            Ok(self.head)
        }
        async fn get_block_by_number(&self, number: Option<u64>) -> Result<Option<BlockHeader>, RpcError> {
            let number = number.unwrap_or(self.head);
            if number > self.head {
                return Ok(None);
            }
            Ok(Some(BlockHeader { number, timestamp: self.genesis + self.block_time * number as i64 }))
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
        async fn get_balance(&self, _address: &str, _block: u64) -> Result<u128, RpcError> {
            Ok(0)
        }
    }

    async fn resolver_with(rpc: LinearChain) -> BlockResolver {
        let store = Store::open_in_memory().await.unwrap();
        let env = Env::from_parts(1, Arc::new(rpc), store, 1000);
        BlockResolver::new(env)
    }

    #[tokio::test]
    async fn get_block_caches_on_second_call() {
        let resolver = resolver_with(LinearChain { genesis: 0, block_time: 12, head: 1000 }).await;
        let first = resolver.get_block(Some(500)).await.unwrap().unwrap();
        let second = resolver.get_block(Some(500)).await.unwrap().unwrap();
        assert_eq!(first.timestamp, second.timestamp);
    }

    #[tokio::test]
    async fn get_block_returns_none_past_head() {
        let resolver = resolver_with(LinearChain { genesis: 0, block_time: 12, head: 100 }).await;
        assert!(resolver.get_block(Some(10_000)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn interpolation_search_finds_block_at_or_after() {
        let resolver = resolver_with(LinearChain { genesis: 0, block_time: 12, head: 10_000 }).await;
        let target_ts = 12 * 4_242;
        let found = resolver.get_block_at_or_after(target_ts).await.unwrap().unwrap();
        assert!(found.timestamp >= target_ts);
        let before = resolver.get_block(Some(found.number - 1)).await.unwrap().unwrap();
        assert!(before.timestamp < target_ts);
    }

    #[tokio::test]
    async fn search_before_genesis_returns_block_one() {
        let resolver = resolver_with(LinearChain { genesis: 1_000, block_time: 12, head: 10_000 }).await;
        let found = resolver.get_block_at_or_after(0).await.unwrap().unwrap();
        assert_eq!(found.number, 1);
    }

    #[tokio::test]
    async fn search_past_head_returns_none() {
        let resolver = resolver_with(LinearChain { genesis: 0, block_time: 12, head: 100 }).await;
        assert!(resolver.get_block_at_or_after(12 * 100_000).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn timestamps_interpolate_on_grid() {
        let resolver = resolver_with(LinearChain { genesis: 0, block_time: 12, head: 10_000 }).await;
        let timestamps = resolver.get_block_timestamps(&[1500, 1000, 2000], 1000).await.unwrap();
        assert_eq!(timestamps[1], Some(12_000));
        assert_eq!(timestamps[2], Some(24_000));
        assert_eq!(timestamps[0], Some(18_000));
    }
}
