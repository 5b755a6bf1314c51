use crate::StoreError;
use parking_lot::Mutex;
use rivergate_types::Call;
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for cached `eth_call` results.
#[derive(Debug, Clone)]
pub struct CallsRepo {
    conn: Arc<Mutex<Connection>>,
}

impl CallsRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// The cached response for `(address, calldata, block_number)`, if any.
    pub async fn find(
        &self,
        chain_id: u64,
        address: &str,
        calldata: &str,
        block_number: u64,
    ) -> Result<Option<Call>, StoreError> {
        let found = self.find_many(chain_id, &[(address.to_string(), calldata.to_string(), block_number)]).await?;
        Ok(found.into_iter().next().flatten())
    }

    /// Batch lookup, one slot per key, preserving input order.
    pub async fn find_many(
        &self,
        chain_id: u64,
        keys: &[(String, String, u64)],
    ) -> Result<Vec<Option<Call>>, StoreError> {
        let conn = self.conn.clone();
        let keys = keys.to_vec();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached(
                "SELECT response_json FROM calls
                 WHERE chain_id = ?1 AND address = ?2 AND calldata = ?3 AND block_number = ?4",
            )?;
            let mut out = Vec::with_capacity(keys.len());
            for (address, calldata, block_number) in keys {
                let address_lc = address.to_ascii_lowercase();
                let calldata_lc = calldata.to_ascii_lowercase();
                let mut rows =
                    stmt.query(rusqlite::params![chain_id as i64, address_lc, calldata_lc, block_number as i64])?;
                out.push(match rows.next()? {
                    Some(row) => {
                        let response_json: String = row.get(0)?;
                        let response = serde_json::from_str(&response_json)
                            .map_err(|source| StoreError::Deserialize { what: "call response", source })?;
                        Some(Call { chain_id, address: address_lc, calldata: calldata_lc, block_number, response })
                    }
                    None => None,
                });
            }
            Ok(out)
        })
        .await
        .expect("calls find_many task panicked")
    }

    /// Persist `call`.
    pub async fn save(&self, call: Call) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let response_json = serde_json::to_string(&call.response)
                .map_err(|source| StoreError::Serialize { what: "call response", source })?;
            guard.execute(
                "INSERT INTO calls (chain_id, address, calldata, block_number, response_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(chain_id, address, calldata, block_number) DO UPDATE SET response_json = excluded.response_json",
                rusqlite::params![call.chain_id as i64, call.address, call.calldata, call.block_number as i64, response_json],
            )?;
            Ok(())
        })
        .await
        .expect("calls save task panicked")
    }

    /// Delete every row in the calls table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM calls", [])?;
            Ok(())
        })
        .await
        .expect("calls purge task panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;
    use serde_json::json;

    #[tokio::test]
    async fn miss_then_hit() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.calls().find(1, "0xc0ffee", "0xdead", 100).await.unwrap().is_none());

        store
            .calls()
            .save(Call { chain_id: 1, address: "0xc0ffee".into(), calldata: "0xdead".into(), block_number: 100, response: json!("0x2a") })
            .await
            .unwrap();

        let found = store.calls().find(1, "0xc0ffee", "0xdead", 100).await.unwrap().unwrap();
        assert_eq!(found.response, json!("0x2a"));
    }
}
