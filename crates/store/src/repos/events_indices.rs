use crate::StoreError;
use parking_lot::Mutex;
use rivergate_index::{is_softer_than, normalize, EventIndex, IndexData};
use rivergate_types::Value;
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for event-coverage indices.
#[derive(Debug, Clone)]
pub struct EventsIndicesRepo {
    conn: Arc<Mutex<Connection>>,
}

impl EventsIndicesRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// The row matching the normalized args exactly, or `None`.
    pub async fn get_exact(
        &self,
        chain_id: u64,
        address: &str,
        event_name: &str,
        args: &Value,
        step: u64,
    ) -> Result<Option<EventIndex>, StoreError> {
        let conn = self.conn.clone();
        let address = address.to_ascii_lowercase();
        let event_name = event_name.to_string();
        let args_json = serde_json::to_string(&normalize(args))
            .map_err(|source| StoreError::Serialize { what: "index args", source })?;
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached(
                "SELECT data_blob FROM events_indices
                 WHERE chain_id = ?1 AND address = ?2 AND event = ?3 AND args_json = ?4",
            )?;
            let mut rows = stmt.query(rusqlite::params![chain_id as i64, address, event_name, args_json])?;
            match rows.next()? {
                Some(row) => {
                    let blob: Vec<u8> = row.get(0)?;
                    let data = IndexData::from_bytes(step, &blob)?;
                    let args: Value = serde_json::from_str(&args_json)
                        .map_err(|source| StoreError::Deserialize { what: "index args", source })?;
                    Ok(Some(EventIndex::from_parts(chain_id, address, event_name, args, data)))
                }
                None => Ok(None),
            }
        })
        .await
        .expect("index get_exact task panicked")
    }

    /// Every stored index whose filter is softer than `args` — the "read
    /// indices" whose covered chunks the fetcher may skip.
    pub async fn find_covering(
        &self,
        chain_id: u64,
        address: &str,
        event_name: &str,
        args: &Value,
        step: u64,
    ) -> Result<Vec<EventIndex>, StoreError> {
        let conn = self.conn.clone();
        let address = address.to_ascii_lowercase();
        let event_name = event_name.to_string();
        let query_args = normalize(args);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached(
                "SELECT args_json, data_blob FROM events_indices WHERE chain_id = ?1 AND address = ?2 AND event = ?3",
            )?;
            let rows = stmt.query_map(rusqlite::params![chain_id as i64, address, event_name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?;

            let mut out = Vec::new();
            for row in rows {
                let (args_json, blob) = row?;
                let stored_args: Value = serde_json::from_str(&args_json)
                    .map_err(|source| StoreError::Deserialize { what: "index args", source })?;
                if is_softer_than(&stored_args, &query_args) {
                    let data = IndexData::from_bytes(step, &blob)?;
                    out.push(EventIndex::from_parts(chain_id, address.clone(), event_name.clone(), stored_args, data));
                }
            }
            Ok(out)
        })
        .await
        .expect("index find_covering task panicked")
    }

    /// Upsert on `(chain_id, address, event, args_json)`, replacing only
    /// the coverage data.
    pub async fn save(&self, index: EventIndex) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            save_index(&guard, &index)
        })
        .await
        .expect("index save task panicked")
    }

    /// Delete every row in the events_indices table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM events_indices", [])?;
            Ok(())
        })
        .await
        .expect("index purge task panicked")
    }

    /// Upsert `index` within an already-open [`crate::Store::transaction`]
    /// scope, so a caller can commit it alongside the events it covers in
    /// one transaction.
    pub fn save_in_tx(tx: &rusqlite::Transaction<'_>, index: &EventIndex) -> Result<(), StoreError> {
        save_index(tx, index)
    }
}

pub(crate) fn save_index(conn: &Connection, index: &EventIndex) -> Result<(), StoreError> {
    let args_json = serde_json::to_string(index.args())
        .map_err(|source| StoreError::Serialize { what: "index args", source })?;
    conn.execute(
        "INSERT INTO events_indices (chain_id, address, event, args_json, data_blob)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(chain_id, address, event, args_json) DO UPDATE SET data_blob = excluded.data_blob",
        rusqlite::params![index.chain_id as i64, index.address, index.event_name, args_json, index.data.to_bytes()],
    )?;
    Ok(())
}
