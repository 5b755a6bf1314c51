use crate::StoreError;
use parking_lot::Mutex;
use rivergate_types::Balance;
use rusqlite::Connection;
use std::sync::Arc;

/// Repository for cached native-token balances.
///
/// `find` preserves the caller's address order and multiplicity rather
/// than deduplicating through a set — the source had a latent bug here
/// (`BalancesRepo.find` deduped via `{...}`, scrambling the order of the
/// downstream `for addr in addresses` loop); this repo does not repeat it.
#[derive(Debug, Clone)]
pub struct BalancesRepo {
    conn: Arc<Mutex<Connection>>,
}

impl BalancesRepo {
    pub(crate) const fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Look up `addresses` at `block_number`, one slot per input address,
    /// in input order, with duplicates repeated rather than collapsed.
    pub async fn find(&self, chain_id: u64, addresses: &[String], block_number: u64) -> Result<Vec<Option<Balance>>, StoreError> {
        let conn = self.conn.clone();
        let addresses = addresses.to_vec();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let mut stmt = guard.prepare_cached(
                "SELECT wei FROM balances WHERE chain_id = ?1 AND address = ?2 AND block_number = ?3",
            )?;
            let mut out = Vec::with_capacity(addresses.len());
            for address in addresses {
                let address_lc = address.to_ascii_lowercase();
                let mut rows = stmt.query(rusqlite::params![chain_id as i64, address_lc, block_number as i64])?;
                out.push(match rows.next()? {
                    Some(row) => {
                        let wei_text: String = row.get(0)?;
                        let wei: u128 =
                            wei_text.parse().map_err(|_| StoreError::MalformedWei(wei_text.clone()))?;
                        Some(Balance { chain_id, address: address_lc, block_number, wei })
                    }
                    None => None,
                });
            }
            Ok(out)
        })
        .await
        .expect("balances find task panicked")
    }

    /// Persist `balance`.
    pub async fn save(&self, balance: Balance) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute(
                "INSERT INTO balances (chain_id, address, block_number, wei)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(chain_id, address, block_number) DO UPDATE SET wei = excluded.wei",
                rusqlite::params![balance.chain_id as i64, balance.address, balance.block_number as i64, balance.wei.to_string()],
            )?;
            Ok(())
        })
        .await
        .expect("balances save task panicked")
    }

    /// Delete every row in the balances table.
    pub async fn purge(&self) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            guard.execute("DELETE FROM balances", [])?;
            Ok(())
        })
        .await
        .expect("balances purge task panicked")
    }
}
