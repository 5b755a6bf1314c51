use crate::StoreError;
use parking_lot::Mutex;
use rivergate_types::{Event, Value};
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for decoded event logs.
#[derive(Debug, Clone)]
pub struct EventsRepo {
    conn: Arc<Mutex<Connection>>,
}

impl EventsRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert `events`, ignoring duplicates keyed on
    /// `(chain_id, transaction_hash, log_index)`.
    pub async fn save(&self, events: Vec<Event>) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            insert_events(&guard, &events)
        })
        .await
        .expect("events save task panicked")
    }

    /// Rows for `(chain_id, address, event_name)` with `block_number` in
    /// `[from_block, to_block)`, ordered by `(block_number, log_index)`.
    pub async fn find(
        &self,
        chain_id: u64,
        address: &str,
        event_name: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Event>, StoreError> {
        let conn = self.conn.clone();
        let address = address.to_ascii_lowercase();
        let event_name = event_name.to_string();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            find_events(&guard, chain_id, &address, &event_name, from_block, to_block)
        })
        .await
        .expect("events find task panicked")
    }

    /// Delete every row in the events table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM events", [])?;
            Ok(())
        })
        .await
        .expect("events purge task panicked")
    }

    /// Insert `events` within an already-open [`crate::Store::transaction`]
    /// scope, so a caller (the event fetcher) can commit them alongside an
    /// index update in one transaction.
    pub fn save_in_tx(tx: &rusqlite::Transaction<'_>, events: &[Event]) -> Result<(), StoreError> {
        insert_events(tx, events)
    }
}

pub(crate) fn insert_events(conn: &Connection, events: &[Event]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO events (chain_id, block_number, tx_hash, log_index, address, event, args_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(chain_id, tx_hash, log_index) DO NOTHING",
    )?;
    for event in events {
        let args_json = serde_json::to_string(&event.args)
            .map_err(|source| StoreError::Serialize { what: "event args", source })?;
        stmt.execute(rusqlite::params![
            event.chain_id as i64,
            event.block_number as i64,
            event.transaction_hash,
            event.log_index as i64,
            event.address,
            event.event_name,
            args_json,
        ])?;
    }
    Ok(())
}

fn find_events(
    conn: &Connection,
    chain_id: u64,
    address: &str,
    event_name: &str,
    from_block: u64,
    to_block: u64,
) -> Result<Vec<Event>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT block_number, tx_hash, log_index, address, event, args_json
         FROM events
         WHERE chain_id = ?1 AND address = ?2 AND event = ?3
           AND block_number >= ?4 AND block_number < ?5
         ORDER BY block_number, log_index",
    )?;
    let rows = stmt.query_map(
        rusqlite::params![chain_id as i64, address, event_name, from_block as i64, to_block as i64],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        },
    )?;

    let mut out = Vec::new();
    for row in rows {
        let (block_number, tx_hash, log_index, address, event, args_json) = row?;
        let args: Value = serde_json::from_str(&args_json)
            .map_err(|source| StoreError::Deserialize { what: "event args", source })?;
        out.push(Event {
            chain_id,
            block_number: block_number as u64,
            transaction_hash: tx_hash,
            log_index: log_index as u64,
            address,
            event_name: event,
            args,
        });
    }
    Ok(out)
}
