use crate::{Env, FetchError};
use futures::stream::{self, StreamExt};
use rivergate_types::Call;
use serde_json::Value as Json;
use tracing::instrument;

/// Bound on concurrent in-flight `eth_call` requests for a bulk lookup
/// (spec.md §5: bounded fan-out, not one request per missing key).
const MAX_CONCURRENT_REQUESTS: usize = 16;

/// Caches `eth_call` results, keyed on `(address, calldata, block_number)`.
/// ABI-encoding the call arguments and decoding the response are both the
/// caller's responsibility (spec.md §1); this cache stores whatever raw hex
/// string the endpoint returned.
#[derive(Debug, Clone)]
pub struct CallCache {
    env: Env,
}

impl CallCache {
    /// Build a cache from a shared [`Env`].
    pub const fn new(env: Env) -> Self {
        Self { env }
    }

    /// The cached (or freshly fetched and persisted) raw response for one
    /// `eth_call`. `calldata` is typically built via
    /// [`rivergate_rpc::calldata`].
    #[instrument(skip(self))]
    pub async fn get_call(&self, address: &str, calldata: &str, block_number: u64) -> Result<Json, FetchError> {
        let chain_id = self.env.chain_id();
        let address = rivergate_types::to_lowercase_hex(address);
        let calldata = rivergate_types::to_lowercase_hex(calldata);

        if let Some(call) = self.env.store().calls().find(chain_id, &address, &calldata, block_number).await? {
            return Ok(call.response);
        }

        let raw = self.env.rpc().call(&address, &calldata, block_number).await?;
        let response = Json::String(raw);
        let call = Call { chain_id, address, calldata, block_number, response: response.clone() };
        self.env.store().calls().save(call).await?;
        Ok(response)
    }

    /// Bulk lookup over `(address, calldata, block_number)` keys, fanning
    /// out only the cache misses with bounded concurrency.
    #[instrument(skip(self, keys))]
    pub async fn get_calls(&self, keys: &[(String, String, u64)]) -> Result<Vec<Json>, FetchError> {
        let chain_id = self.env.chain_id();
        let normalized: Vec<(String, String, u64)> = keys
            .iter()
            .map(|(a, c, b)| (rivergate_types::to_lowercase_hex(a), rivergate_types::to_lowercase_hex(c), *b))
            .collect();

        let cached = self.env.store().calls().find_many(chain_id, &normalized).await?;

        let results = stream::iter(normalized.into_iter().zip(cached).enumerate())
            .map(|(i, ((address, calldata, block_number), hit))| async move {
                let result = match hit {
                    Some(call) => Ok(call.response),
                    None => self.get_call(&address, &calldata, block_number).await,
                };
                result.map(|json| (i, json))
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect::<Vec<Result<(usize, Json), FetchError>>>()
            .await;

        // `buffer_unordered` completes out of submission order; restore it
        // by the index stamped on each future before the fan-out.
        let mut indexed = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        indexed.sort_by_key(|(i, _)| *i);
        Ok(indexed.into_iter().map(|(_, json)| json).collect())
    }
}
