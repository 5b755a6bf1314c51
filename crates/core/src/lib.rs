//! Orchestration layer for rivergate: connection/config plumbing plus the
//! four caching services built on top of it.
//!
//! [`Env`] resolves `rpc_url`/`cache_path`/`block_grid_step` (falling back to
//! `WEB3_PROVIDER_URI`/`WEB3_CACHE_PATH`/`WEB3_BLOCK_GRID_STEP`) and opens a
//! shared [`rivergate_rpc::RpcClient`] and [`rivergate_store::Store`] once per
//! `(rpc_url, cache_path)` pair. Every service below is built from one `Env`:
//!
//! - [`EventFetcher`]: incremental, filter-aware `eth_getLogs` caching with
//!   chunk-halving retry.
//! - [`BlockResolver`]: block header/timestamp lookups, including grid
//!   interpolation and an interpolation search for "block at or after a
//!   timestamp".
//! - [`CallCache`] / [`BalanceCache`]: get-or-fetch-and-persist caches for
//!   `eth_call` and `eth_getBalance`.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! # use rivergate_core::{ConfigOverrides, Env, EventDecoder, EventFetcher};
//! # use rivergate_rpc::LogEntry;
//! # use rivergate_types::Value;
//! # use std::sync::Arc;
//! # struct NoopDecoder;
//! # impl EventDecoder for NoopDecoder {
//! #     fn decode(&self, _event_name: &str, _log: &LogEntry) -> Option<Value> { None }
//! # }
//! # async fn f() -> Result<(), rivergate_core::FetchError> {
//! let env = Env::connect(ConfigOverrides::default()).await?;
//! let fetcher = EventFetcher::new(env, Arc::new(NoopDecoder));
//! let events = fetcher
//!     .get_events("0xc0ffee", "Transfer", "Transfer(address,address,uint256)", 0, 1000, &Value::Null)
//!     .await?;
//! println!("{} events", events.len());
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::FetchError;

mod config;
pub use config::{Config, ConfigOverrides, DEFAULT_BLOCK_GRID_STEP};

mod env;
pub use env::Env;

mod decoder;
pub use decoder::EventDecoder;

mod event_fetcher;
pub use event_fetcher::EventFetcher;

mod block_resolver;
pub use block_resolver::BlockResolver;

mod call_cache;
pub use call_cache::CallCache;

mod balance_cache;
pub use balance_cache::BalanceCache;
