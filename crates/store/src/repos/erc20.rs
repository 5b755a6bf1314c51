use crate::StoreError;
use parking_lot::Mutex;
use rivergate_types::Erc20Meta;
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for ERC-20 metadata. Read/write surface only — fetching or
/// deriving metadata is the responsibility of an external collaborator,
/// out of this workspace's scope.
#[derive(Debug, Clone)]
pub struct Erc20MetasRepo {
    conn: Arc<Mutex<Connection>>,
}

impl Erc20MetasRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// The stored metadata for `(chain_id, address)`, if any.
    pub async fn find(&self, chain_id: u64, address: &str) -> Result<Option<Erc20Meta>, StoreError> {
        let conn = self.conn.clone();
        let address = address.to_ascii_lowercase();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached(
                "SELECT name, symbol, decimals FROM erc20_metas WHERE chain_id = ?1 AND address = ?2",
            )?;
            let mut rows = stmt.query(rusqlite::params![chain_id as i64, address])?;
            match rows.next()? {
                Some(row) => {
                    let name: String = row.get(0)?;
                    let symbol: String = row.get(1)?;
                    let decimals: i64 = row.get(2)?;
                    Ok(Some(Erc20Meta { chain_id, address, name, symbol, decimals: decimals as u8 }))
                }
                None => Ok(None),
            }
        })
        .await
        .expect("erc20_metas find task panicked")
    }

    /// Persist `meta`.
    pub async fn save(&self, meta: Erc20Meta) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute(
                "INSERT INTO erc20_metas (chain_id, address, name, symbol, decimals)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(chain_id, address) DO UPDATE SET
                    name = excluded.name, symbol = excluded.symbol, decimals = excluded.decimals",
                rusqlite::params![meta.chain_id as i64, meta.address, meta.name, meta.symbol, meta.decimals as i64],
            )?;
            Ok(())
        })
        .await
        .expect("erc20_metas save task panicked")
    }

    /// Delete every row in the erc20_metas table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM erc20_metas", [])?;
            Ok(())
        })
        .await
        .expect("erc20_metas purge task panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn save_and_find() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .erc20_metas()
            .save(Erc20Meta { chain_id: 1, address: "0xusdc".into(), name: "USD Coin".into(), symbol: "USDC".into(), decimals: 6 })
            .await
            .unwrap();
        let found = store.erc20_metas().find(1, "0xusdc").await.unwrap().unwrap();
        assert_eq!(found.symbol, "USDC");
    }
}
