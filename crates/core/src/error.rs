use rivergate_index::IndexError;
use rivergate_rpc::RpcError;
use rivergate_store::StoreError;
use thiserror::Error;

/// Errors raised by `rivergate-core`'s services.
#[derive(Debug, Error)]
pub enum FetchError {
    /// `rpc_url` or `cache_path` was not supplied and had no env fallback
    /// (spec.md §7). Surfaced immediately from `Env::connect`, never
    /// deferred behind I/O.
    #[error("missing configuration: {0}")]
    NotConfigured(String),
    /// The RPC endpoint failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An index mutation was attempted with misaligned or invalid bounds —
    /// a programming error, per spec.md §7, not a retryable condition.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// The fetch scheduler halved its chunk size to zero without a
    /// successful request; the last RPC error is re-surfaced as the
    /// cause. Every chunk committed before this point remains durable —
    /// callers that want the partial result re-query the store (spec.md
    /// §7's "partial events committed" calling convention).
    #[error("exhausted chunk-halving retries")]
    ChunkExhausted(#[source] Box<FetchError>),
}
