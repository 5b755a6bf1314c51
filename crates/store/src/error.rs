use thiserror::Error;

/// Errors raised by the store: the sqlite layer itself, or malformed
/// `args_json`/index-blob payloads found in an existing database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A `rusqlite` call failed.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// A row's JSON column failed to serialize.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        /// What was being serialized, for diagnostics.
        what: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A row's JSON column failed to deserialize.
    #[error("failed to deserialize {what}: {source}")]
    Deserialize {
        /// What was being deserialized, for diagnostics.
        what: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A stored index blob failed to decode.
    #[error(transparent)]
    Index(#[from] rivergate_index::IndexError),
    /// A stored `wei` column was not a valid base-10 `u128`.
    #[error("malformed wei value: {0}")]
    MalformedWei(String),
}
