use crate::FetchError;
use std::env;

/// Default grid step (`G`), in blocks, when neither an explicit override
/// nor `WEB3_BLOCK_GRID_STEP` is supplied.
pub const DEFAULT_BLOCK_GRID_STEP: u64 = 1000;

const RPC_URL_VAR: &str = "WEB3_PROVIDER_URI";
const CACHE_PATH_VAR: &str = "WEB3_CACHE_PATH";
const GRID_STEP_VAR: &str = "WEB3_BLOCK_GRID_STEP";

/// Explicit overrides layered on top of the environment-variable fallbacks
/// (spec.md §6/§9: "centralize the fallback logic in `Env` construction").
/// Any field left `None` falls back to its environment variable, then to
/// `DEFAULT_BLOCK_GRID_STEP` for the grid step only — `rpc_url` and
/// `cache_path` have no default and raise [`FetchError::NotConfigured`]
/// when neither source supplies them.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Overrides `WEB3_PROVIDER_URI`.
    pub rpc_url: Option<String>,
    /// Overrides `WEB3_CACHE_PATH`.
    pub cache_path: Option<String>,
    /// Overrides `WEB3_BLOCK_GRID_STEP`.
    pub block_grid_step: Option<u64>,
}

/// Resolved configuration for one `Env`: the RPC endpoint, the store's
/// file path, and the grid granularity `G`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// RPC endpoint URL.
    pub rpc_url: String,
    /// Path to the embedded store file.
    pub cache_path: String,
    /// Chunk granularity in blocks, also the bit-width unit (`G`).
    pub block_grid_step: u64,
}

impl Config {
    /// Resolve `overrides` against the environment, applying
    /// [`DEFAULT_BLOCK_GRID_STEP`] when neither supplies a grid step.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, FetchError> {
        let rpc_url = overrides
            .rpc_url
            .or_else(|| env::var(RPC_URL_VAR).ok())
            .ok_or_else(|| FetchError::NotConfigured(RPC_URL_VAR.to_string()))?;

        let cache_path = overrides
            .cache_path
            .or_else(|| env::var(CACHE_PATH_VAR).ok())
            .ok_or_else(|| FetchError::NotConfigured(CACHE_PATH_VAR.to_string()))?;

        let block_grid_step = overrides
            .block_grid_step
            .or_else(|| env::var(GRID_STEP_VAR).ok().and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_BLOCK_GRID_STEP);

        Ok(Self { rpc_url, cache_path, block_grid_step })
    }
}
