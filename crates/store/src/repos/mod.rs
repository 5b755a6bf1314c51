//! Per-entity repositories. Each repo is a thin, cloneable handle onto the
//! store's shared connection; every method runs its SQL synchronously
//! inside [`tokio::task::spawn_blocking`].

mod events;
pub use events::EventsRepo;

mod events_indices;
pub use events_indices::EventsIndicesRepo;

mod blocks;
pub use blocks::BlocksRepo;

mod calls;
pub use calls::CallsRepo;

mod balances;
pub use balances::BalancesRepo;

mod erc20;
pub use erc20::Erc20MetasRepo;
