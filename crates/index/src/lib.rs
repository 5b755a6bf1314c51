//! Block-range coverage tracking and argument-filter algebra for the
//! rivergate event cache.
//!
//! [`BitMask`] tracks, per grid-aligned chunk, whether a range of blocks has
//! already been fetched. [`IndexData`] anchors a `BitMask` at a block and
//! exposes the block-space API the fetch scheduler drives.
//! [`normalize`]/[`is_softer_than`] decide whether a previously stored
//! [`EventIndex`] can answer a narrower query without touching the RPC
//! endpoint.

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
pub use error::IndexError;

mod bitmask;
pub use bitmask::BitMask;

mod index_data;
pub use index_data::IndexData;

mod filter;
pub use filter::{is_softer_than, normalize};

mod event_index;
pub use event_index::EventIndex;
