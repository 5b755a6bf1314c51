use crate::{filter, IndexData};
use rivergate_types::Value;

/// A stored record of which block chunks have been fetched for a given
/// `(contract, event, argument-filter)` key.
#[derive(Debug, Clone, PartialEq)]
pub struct EventIndex {
    /// Chain this index covers.
    pub chain_id: u64,
    /// Lowercase hex contract address.
    pub address: String,
    /// Decoded event name.
    pub event_name: String,
    /// The argument filter this index was built for, always stored
    /// normalized.
    args: Value,
    /// Coverage data.
    pub data: IndexData,
}

impl EventIndex {
    /// Build a new index, normalizing `args` at construction time —
    /// mirroring the source's `args` property setter.
    pub fn new(chain_id: u64, address: impl Into<String>, event_name: impl Into<String>, args: &Value, step: u64) -> Self {
        Self {
            chain_id,
            address: address.into(),
            event_name: event_name.into(),
            args: filter::normalize(args),
            data: IndexData::new(step),
        }
    }

    /// The normalized argument filter this index was built for.
    pub const fn args(&self) -> &Value {
        &self.args
    }

    /// Reconstruct an index from already-normalized parts, e.g. when
    /// loading a row back from storage. Unlike [`EventIndex::new`], `args`
    /// is taken as-is rather than re-normalized.
    pub const fn from_parts(
        chain_id: u64,
        address: String,
        event_name: String,
        args: Value,
        data: IndexData,
    ) -> Self {
        Self { chain_id, address, event_name, args, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_normalized_at_construction() {
        let idx = EventIndex::new(1, "0xabc", "Transfer", &Value::Null, 1000);
        assert_eq!(idx.args(), &filter::normalize(&Value::Null));
    }
}
