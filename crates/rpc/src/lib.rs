//! JSON-RPC client for the read-only Ethereum methods rivergate needs.
//!
//! [`RpcClient`] wraps a [`jsonrpsee_http_client::HttpClient`] and exposes
//! one typed async method per RPC call used by `rivergate-core`'s services:
//! `eth_chainId`, `eth_blockNumber`, `eth_getBlockByNumber`, `eth_getLogs`,
//! `eth_call`, `eth_getBalance`. This crate also owns calldata encoding
//! (`keccak256(signature)[..4] ++ abi_encode(args)`), since ABI concerns
//! belong next to the client that sends them over the wire.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! # async fn f() -> Result<(), rivergate_rpc::RpcError> {
//! let client = rivergate_rpc::RpcClient::connect("https://eth.example.com")?;
//! let chain_id = client.chain_id().await?;
//! let head = client.block_number().await?;
//! println!("chain {chain_id} at block {head}");
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
pub use error::RpcError;

mod hexnum;

mod calldata;
pub use calldata::{calldata, event_topic0};

mod types;
pub use types::{BlockHeader, LogEntry};

mod client;
pub use client::RpcClient;

mod transport;
pub use transport::EthRpc;
