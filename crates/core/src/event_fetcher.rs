use crate::{Env, EventDecoder, FetchError};
use rivergate_index::{normalize, EventIndex, IndexData};
use rivergate_types::{to_lowercase_hex, Event, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Fetches and caches `eth_getLogs` events, retrying with progressively
/// smaller block chunks when the endpoint rejects a request as too large
/// (spec.md §4.4). Decoding a raw log into an event's argument mapping is
/// delegated to an injected [`EventDecoder`], since ABI decoding itself is
/// out of scope for this workspace.
#[derive(Clone)]
pub struct EventFetcher {
    env: Env,
    decoder: Arc<dyn EventDecoder>,
}

impl std::fmt::Debug for EventFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFetcher").field("env", &self.env).finish_non_exhaustive()
    }
}

impl EventFetcher {
    /// Build a fetcher from a shared [`Env`] and the decoder used to turn
    /// raw logs into decoded argument mappings.
    pub fn new(env: Env, decoder: Arc<dyn EventDecoder>) -> Self {
        Self { env, decoder }
    }

    /// Fetch (caching as needed) and return every event matching `filter`
    /// over `[from_block, to_block)`.
    #[instrument(skip(self, filter), fields(contract_address, event_name))]
    pub async fn get_events(
        &self,
        contract_address: &str,
        event_name: &str,
        event_signature: &str,
        from_block: u64,
        to_block: u64,
        filter: &Value,
    ) -> Result<Vec<Event>, FetchError> {
        self.prefetch_events(contract_address, event_name, event_signature, from_block, to_block, filter).await?;

        let address = to_lowercase_hex(contract_address);
        let all = self
            .env
            .store()
            .events()
            .find(self.env.chain_id(), &address, event_name, from_block, to_block)
            .await?;
        Ok(all.into_iter().filter(|e| e.matches_filter(filter)).collect())
    }

    /// Fetch and cache events over `[from_block, to_block)` without
    /// reading them back — the scheduler half of [`EventFetcher::get_events`].
    #[instrument(skip(self, filter), fields(contract_address, event_name))]
    pub async fn prefetch_events(
        &self,
        contract_address: &str,
        event_name: &str,
        event_signature: &str,
        from_block: u64,
        to_block: u64,
        filter: &Value,
    ) -> Result<(), FetchError> {
        let chain_id = self.env.chain_id();
        let step = self.env.block_grid_step();
        let address = to_lowercase_hex(contract_address);
        let args = normalize(filter);

        let read_indices =
            self.env.store().events_indices().find_covering(chain_id, &address, event_name, filter, step).await?;
        let write_index = self.env.store().events_indices().get_exact(chain_id, &address, event_name, filter, step).await?;
        let mut write_data = write_index.map(|idx| idx.data).unwrap_or_else(|| IndexData::new(step));

        let (from_grid, to_grid) = snap_range(from_block, to_block, step);
        if from_grid >= to_grid {
            return Ok(());
        }

        let mut chunk_size_in_steps = (to_grid - from_grid).div_ceil(step);
        let mut last_error: Option<FetchError> = None;

        while chunk_size_in_steps > 0 {
            match self
                .fetch_chunk_size(
                    chunk_size_in_steps,
                    chain_id,
                    &address,
                    event_name,
                    event_signature,
                    &args,
                    from_grid,
                    to_grid,
                    &read_indices,
                    &mut write_data,
                )
                .await
            {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(chunk_size_in_steps, error = %err, "chunk fetch failed, halving chunk size");
                    last_error = Some(err);
                    chunk_size_in_steps /= 2;
                }
            }
        }

        Err(FetchError::ChunkExhausted(Box::new(
            last_error.expect("chunk_size_in_steps starts above zero, so a failed attempt always precedes exhaustion"),
        )))
    }

    /// Delete every cached event and index row.
    pub async fn clear_cache(&self) -> Result<(), FetchError> {
        self.env.store().events_indices().purge().await?;
        self.env.store().events().purge().await?;
        Ok(())
    }

    #[instrument(skip(self, read_indices, write_data, args), fields(from_grid, to_grid))]
    #[allow(clippy::too_many_arguments)]
    async fn fetch_chunk_size(
        &self,
        chunk_size_in_steps: u64,
        chain_id: u64,
        address: &str,
        event_name: &str,
        event_signature: &str,
        args: &Value,
        from_grid: u64,
        to_grid: u64,
        read_indices: &[EventIndex],
        write_data: &mut IndexData,
    ) -> Result<(), FetchError> {
        let step = write_data.step();
        let stride = chunk_size_in_steps * step;
        let topic0 = rivergate_rpc::event_topic0(event_signature);

        let mut start = from_grid;
        while start < to_grid {
            let end = (start + stride).min(to_grid);
            let (s, e) = shrink(read_indices, write_data, start, end, step);
            if s < e {
                self.fetch_and_save_chunk(chain_id, address, event_name, args, &topic0, s, e, write_data).await?;
            }
            start = end;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn fetch_and_save_chunk(
        &self,
        chain_id: u64,
        address: &str,
        event_name: &str,
        args: &Value,
        topic0: &str,
        from_block: u64,
        to_block: u64,
        write_data: &mut IndexData,
    ) -> Result<(), FetchError> {
        debug!(from_block, to_block, "fetching event chunk");
        let topics = vec![Some(vec![topic0.to_string()])];
        let logs = self.env.rpc().get_logs(from_block, to_block - 1, address, &topics).await?;

        let events: Vec<Event> = logs
            .iter()
            .filter_map(|log| {
                self.decoder.decode(event_name, log).map(|decoded_args| Event {
                    chain_id,
                    block_number: log.block_number,
                    transaction_hash: to_lowercase_hex(&log.transaction_hash),
                    log_index: log.log_index,
                    address: to_lowercase_hex(&log.address),
                    event_name: event_name.to_string(),
                    args: decoded_args,
                })
            })
            .collect();

        let mut updated = write_data.clone();
        updated.set_range(from_block, to_block, true)?;

        let index = EventIndex::from_parts(chain_id, address.to_string(), event_name.to_string(), args.clone(), updated.clone());

        self.env
            .store()
            .transaction(move |tx| {
                rivergate_store::repos::EventsRepo::save_in_tx(tx, &events)?;
                rivergate_store::repos::EventsIndicesRepo::save_in_tx(tx, &index)?;
                Ok(())
            })
            .await?;

        *write_data = updated;
        Ok(())
    }
}

/// Snap `[from_block, to_block)` to the grid, matching
/// `original_source`'s `EventsService._fetch_events_for_chunk_size`: the
/// lower bound rounds down, the upper bound rounds up only when it isn't
/// already grid-aligned.
fn snap_range(from_block: u64, to_block: u64, step: u64) -> (u64, u64) {
    let from = from_block - (from_block % step);
    let to_snapped = to_block - (to_block % step);
    let to = if to_snapped == to_block { to_snapped } else { to_snapped + step };
    (from, to)
}

/// Shrink `[from_block, to_block)` so both ends face an uncovered chunk,
/// checking both the softer indices already on record (`read_indices`) and
/// this call's own in-progress coverage (`write_data`) — the latter is what
/// lets a chunk-halving retry skip strides this same call already
/// committed, instead of re-fetching them (spec.md §4.4).
fn shrink(read_indices: &[EventIndex], write_data: &IndexData, from_block: u64, to_block: u64, step: u64) -> (u64, u64) {
    let covered = |block: u64| write_data.get(block) || read_indices.iter().any(|index| index.data.get(block));

    let mut start = from_block;
    while start < to_block && covered(start) {
        start += step;
    }

    let mut end = to_block;
    while end > start && end >= step && covered(end - step) {
        end -= step;
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivergate_rpc::{BlockHeader, EthRpc, LogEntry, RpcError};
    use rivergate_store::Store;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MockRpc {
        calls: AtomicUsize,
        fail_first_n: usize,
        logs: Mutex<Vec<LogEntry>>,
    }

    #[async_trait::async_trait]
    impl EthRpc for MockRpc {
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
            from_block: u64,
            to_block: u64,
            _address: &str,
            _topics: &[Option<Vec<String>>],
        ) -> Result<Vec<LogEntry>, RpcError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first_n {
                return Err(RpcError::ResponseTooLarge);
            }
            let logs = self.logs.lock().unwrap();
            Ok(logs.iter().filter(|l| l.block_number >= from_block && l.block_number <= to_block).cloned().collect())
        }
        async fn call(&self, _to: &str, _data: &str, _block: u64) -> Result<String, RpcError> {
            Ok("0x".to_string())
        }
        async fn get_balance(&self, _address: &str, _block: u64) -> Result<u128, RpcError> {
            Ok(0)
        }
    }

    struct IdentityDecoder;
    impl EventDecoder for IdentityDecoder {
        fn decode(&self, _event_name: &str, log: &LogEntry) -> Option<Value> {
            let mut m = std::collections::BTreeMap::new();
            m.insert("data".to_string(), Value::String(log.data.clone()));
            Some(Value::Object(m))
        }
    }

    fn sample_log(block_number: u64, log_index: u64) -> LogEntry {
        LogEntry {
            address: "0xc0ffee".into(),
            topics: vec!["0xtopic0".into()],
            data: format!("0x{log_index}"),
            block_number,
            transaction_hash: format!("0xhash{block_number}-{log_index}"),
            log_index,
        }
    }

    async fn fetcher_with(rpc: MockRpc) -> (EventFetcher, Store) {
        let store = Store::open_in_memory().await.unwrap();
        let env = Env::from_parts(1, Arc::new(rpc), store.clone(), 1000);
        (EventFetcher::new(env, Arc::new(IdentityDecoder)), store)
    }

    #[tokio::test]
    async fn fetches_and_caches_events() {
        let rpc = MockRpc { logs: Mutex::new(vec![sample_log(100, 0), sample_log(2500, 1)]), ..Default::default() };
        let (fetcher, _store) = fetcher_with(rpc).await;

        let events = fetcher
            .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 3000, &Value::Null)
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn second_call_does_not_refetch() {
        let rpc = MockRpc { logs: Mutex::new(vec![sample_log(100, 0)]), ..Default::default() };
        let (fetcher, _store) = fetcher_with(rpc).await;

        fetcher
            .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 1000, &Value::Null)
            .await
            .unwrap();

        let events = fetcher
            .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 1000, &Value::Null)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn retries_with_smaller_chunks_on_failure() {
        let rpc =
            MockRpc { logs: Mutex::new(vec![sample_log(100, 0), sample_log(2500, 0)]), fail_first_n: 1, ..Default::default() };
        let (fetcher, _store) = fetcher_with(rpc).await;

        let events = fetcher
            .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 3000, &Value::Null)
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn clear_cache_empties_both_tables() {
        let rpc = MockRpc { logs: Mutex::new(vec![sample_log(100, 0)]), ..Default::default() };
        let (fetcher, store) = fetcher_with(rpc).await;

        fetcher
            .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 1000, &Value::Null)
            .await
            .unwrap();
        fetcher.clear_cache().await.unwrap();

        let events = store.events().find(1, "0xc0ffee", "Transfer", 0, 1000).await.unwrap();
        assert!(events.is_empty());
    }
}
