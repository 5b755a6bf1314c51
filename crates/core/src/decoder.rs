use rivergate_rpc::LogEntry;
use rivergate_types::Value;

/// The seam an ABI-aware collaborator plugs into: turning a raw log into
/// the decoded argument mapping `EventFetcher` persists.
///
/// ABI decoding itself is explicitly out of scope for this workspace
/// (spec.md §1, "ABI decoding ... assumed provided by a library binding to
/// the chain's ABI"); `rivergate-core` only needs *a* way to get from
/// `LogEntry` to `Value`, so it depends on this trait rather than a
/// concrete ABI library.
pub trait EventDecoder: Send + Sync {
    /// Attempt to decode `log` as an occurrence of `event_name`. Returns
    /// `None` if the log's topics/data don't correspond to this event
    /// (e.g. a different event sharing the watched address), in which case
    /// the log is skipped rather than persisted.
    fn decode(&self, event_name: &str, log: &LogEntry) -> Option<Value>;
}
