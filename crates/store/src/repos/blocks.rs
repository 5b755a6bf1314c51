use crate::StoreError;
use parking_lot::Mutex;
use rivergate_types::Block;
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for cached block headers.
#[derive(Debug, Clone)]
pub struct BlocksRepo {
    conn: Arc<Mutex<Connection>>,
}

impl BlocksRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Look up `numbers`, one slot per input, preserving order and
    /// multiplicity; `None` where a block has not been cached yet.
    pub async fn find(&self, chain_id: u64, numbers: &[u64]) -> Result<Vec<Option<Block>>, StoreError> {
        let conn = self.conn.clone();
        let numbers = numbers.to_vec();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached("SELECT timestamp FROM blocks WHERE chain_id = ?1 AND number = ?2")?;
            let mut out = Vec::with_capacity(numbers.len());
            for number in numbers {
                let mut rows = stmt.query(rusqlite::params![chain_id as i64, number as i64])?;
                out.push(match rows.next()? {
                    Some(row) => {
                        let timestamp: i64 = row.get(0)?;
                        Some(Block { chain_id, number, timestamp })
                    }
                    None => None,
                });
            }
            Ok(out)
        })
        .await
        .expect("blocks find task panicked")
    }

    /// The cached block with the smallest `timestamp >= ts`, if any.
    pub async fn get_after_timestamp(&self, chain_id: u64, ts: i64) -> Result<Option<Block>, StoreError> {
        self.bound(chain_id, ts, true).await
    }

    /// The cached block with the largest `timestamp < ts`, if any.
    pub async fn get_before_timestamp(&self, chain_id: u64, ts: i64) -> Result<Option<Block>, StoreError> {
        self.bound(chain_id, ts, false).await
    }

    async fn bound(&self, chain_id: u64, ts: i64, after: bool) -> Result<Option<Block>, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let sql = if after {
                "SELECT number, timestamp FROM blocks WHERE chain_id = ?1 AND timestamp >= ?2 ORDER BY timestamp ASC LIMIT 1"
            } else {
                "SELECT number, timestamp FROM blocks WHERE chain_id = ?1 AND timestamp < ?2 ORDER BY timestamp DESC LIMIT 1"
            };
            let mut stmt = guard.prepare_cached(sql)?;
            let mut rows = stmt.query(rusqlite::params![chain_id as i64, ts])?;
            match rows.next()? {
                Some(row) => {
                    let number: i64 = row.get(0)?;
                    let timestamp: i64 = row.get(1)?;
                    Ok(Some(Block { chain_id, number: number as u64, timestamp }))
                }
                None => Ok(None),
            }
        })
        .await
        .expect("blocks bound task panicked")
    }

    /// Persist `block`. Blocks are immutable once written, so an existing
    /// row is left untouched.
    pub async fn save(&self, block: Block) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute(
                "INSERT OR IGNORE INTO blocks (chain_id, number, timestamp) VALUES (?1, ?2, ?3)",
                rusqlite::params![block.chain_id as i64, block.number as i64, block.timestamp],
            )?;
            Ok(())
        })
        .await
        .expect("blocks save task panicked")
    }

    /// Delete every row in the blocks table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM blocks", [])?;
            Ok(())
        })
        .await
        .expect("blocks purge task panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn find_preserves_order_and_reports_misses() {
        let store = Store::open_in_memory().await.unwrap();
        store.blocks().save(Block { chain_id: 1, number: 100, timestamp: 1_000 }).await.unwrap();
        let found = store.blocks().find(1, &[100, 200, 100]).await.unwrap();
        assert_eq!(found[0].unwrap().timestamp, 1_000);
        assert!(found[1].is_none());
        assert_eq!(found[2].unwrap().timestamp, 1_000);
    }

    #[tokio::test]
    async fn bracket_lookup() {
        let store = Store::open_in_memory().await.unwrap();
        store.blocks().save(Block { chain_id: 1, number: 100, timestamp: 1_000 }).await.unwrap();
        store.blocks().save(Block { chain_id: 1, number: 200, timestamp: 2_000 }).await.unwrap();

        let before = store.blocks().get_before_timestamp(1, 1_500).await.unwrap().unwrap();
        assert_eq!(before.number, 100);

        let after = store.blocks().get_after_timestamp(1, 1_500).await.unwrap().unwrap();
        assert_eq!(after.number, 200);
    }
}
