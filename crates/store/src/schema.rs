use crate::StoreError;
use rusqlite::Connection;

/// Idempotent schema creation, run once per fresh [`crate::Store::open`].
pub(crate) fn init(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS events (
            chain_id     INTEGER NOT NULL,
            block_number INTEGER NOT NULL,
            tx_hash      TEXT    NOT NULL,
            log_index    INTEGER NOT NULL,
            address      TEXT    NOT NULL,
            event        TEXT    NOT NULL,
            args_json    TEXT    NOT NULL,
            UNIQUE(chain_id, tx_hash, log_index)
        );
        CREATE INDEX IF NOT EXISTS events_query_idx
            ON events(chain_id, address, event, block_number);

        CREATE TABLE IF NOT EXISTS events_indices (
            chain_id  INTEGER NOT NULL,
            address   TEXT    NOT NULL,
            event     TEXT    NOT NULL,
            args_json TEXT    NOT NULL,
            data_blob BLOB    NOT NULL,
            UNIQUE(chain_id, address, event, args_json)
        );

        CREATE TABLE IF NOT EXISTS blocks (
            chain_id  INTEGER NOT NULL,
            number    INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            UNIQUE(chain_id, number)
        );

        CREATE TABLE IF NOT EXISTS calls (
            chain_id      INTEGER NOT NULL,
            address       TEXT    NOT NULL,
            calldata      TEXT    NOT NULL,
            block_number  INTEGER NOT NULL,
            response_json TEXT    NOT NULL,
            UNIQUE(chain_id, address, calldata, block_number)
        );

        CREATE TABLE IF NOT EXISTS balances (
            chain_id     INTEGER NOT NULL,
            address      TEXT    NOT NULL,
            block_number INTEGER NOT NULL,
            wei          TEXT    NOT NULL,
            UNIQUE(chain_id, address, block_number)
        );

        CREATE TABLE IF NOT EXISTS erc20_metas (
            chain_id INTEGER NOT NULL,
            address  TEXT    NOT NULL,
            name     TEXT    NOT NULL,
            symbol   TEXT    NOT NULL,
            decimals INTEGER NOT NULL,
            UNIQUE(chain_id, address)
        );
        ",
    )?;
    Ok(())
}
