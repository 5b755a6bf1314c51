//! The embedded durable store backing rivergate's caches.
//!
//! [`Store`] wraps a single `rusqlite` connection behind a lock and runs
//! every query inside [`tokio::task::spawn_blocking`], so async callers
//! await a blocking call without stalling the runtime — matching the
//! "every Store write is a blocking operation" framing this crate
//! implements. [`Store::transaction`] gives callers a scoped commit/rollback
//! primitive for operations that must land atomically, such as the event
//! fetcher's "insert events + set index bits" pair.

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
pub use error::StoreError;

mod schema;

mod store;
pub use store::Store;

pub mod repos;
