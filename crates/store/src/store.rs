use crate::{repos, schema, StoreError};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// A handle to the embedded cache database.
///
/// Cheap to clone: the underlying connection is behind an `Arc<Mutex<_>>`,
/// so every clone of a `Store` talks to the same file and serializes writes
/// through the same lock, matching the single-writer model the design
/// assumes.
#[derive(Debug, Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (creating if needed) the database at `path`, running schema
    /// creation if this is a fresh file.
    #[instrument(skip_all)]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
            let conn = Connection::open(path)?;
            schema::init(&conn)?;
            Ok(conn)
        })
        .await
        .expect("store open task panicked")?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// An in-memory store, useful for tests.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = tokio::task::spawn_blocking(|| -> Result<Connection, StoreError> {
            let conn = Connection::open_in_memory()?;
            schema::init(&conn)?;
            Ok(conn)
        })
        .await
        .expect("store open task panicked")?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Run `f` inside a single `rusqlite` transaction: commits on `Ok`,
    /// rolls back on `Err`. Guarantees release on every exit path,
    /// including a panic unwinding through `f` (`rusqlite::Transaction`
    /// rolls back on `Drop` if never committed).
    pub async fn transaction<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            let tx = guard.transaction()?;
            let result = f(&tx)?;
            tx.commit()?;
            Ok(result)
        })
        .await
        .expect("store transaction task panicked")
    }

    /// The events repository.
    pub fn events(&self) -> repos::EventsRepo {
        repos::EventsRepo::new(self.conn.clone())
    }

    /// The event-index repository.
    pub fn events_indices(&self) -> repos::EventsIndicesRepo {
        repos::EventsIndicesRepo::new(self.conn.clone())
    }

    /// The block repository.
    pub fn blocks(&self) -> repos::BlocksRepo {
        repos::BlocksRepo::new(self.conn.clone())
    }

    /// The `eth_call` cache repository.
    pub fn calls(&self) -> repos::CallsRepo {
        repos::CallsRepo::new(self.conn.clone())
    }

    /// The balance cache repository.
    pub fn balances(&self) -> repos::BalancesRepo {
        repos::BalancesRepo::new(self.conn.clone())
    }

    /// The ERC-20 metadata repository (read/write surface only; no fetch
    /// logic lives in this workspace).
    pub fn erc20_metas(&self) -> repos::Erc20MetasRepo {
        repos::Erc20MetasRepo::new(self.conn.clone())
    }
}
