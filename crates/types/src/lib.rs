//! Rivergate data model.
//!
//! This crate defines the entities cached by rivergate's store — blocks,
//! events, calls, balances and read-only ERC-20 metadata — plus the
//! polymorphic [`Value`] used for event arguments and argument filters.
//!
//! ## Usage Example
//!
//! ```rust
//! use rivergate_types::{Event, Value};
//! use std::collections::BTreeMap;
//!
//! let mut args = BTreeMap::new();
//! args.insert("from".to_string(), Value::String("0xabc...".into()));
//!
//! let event = Event {
//!     chain_id: 1,
//!     block_number: 100,
//!     transaction_hash: "0xdead".into(),
//!     log_index: 0,
//!     address: "0xcontract".into(),
//!     event_name: "Transfer".into(),
//!     args: Value::Object(args),
//! };
//!
//! assert!(event.matches_filter(&Value::Null));
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

mod value;
pub use value::Value;

mod block;
pub use block::Block;

mod event;
pub use event::Event;

mod call;
pub use call::Call;

mod balance;
pub use balance::Balance;

mod erc20;
pub use erc20::Erc20Meta;

mod addr;
pub use addr::to_lowercase_hex;
