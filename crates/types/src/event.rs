use crate::Value;
use serde::{Deserialize, Serialize};

/// A decoded event log. Addresses and the transaction hash are lowercase
/// hex. Uniqueness: `(chain_id, transaction_hash, log_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Chain this log was emitted on.
    pub chain_id: u64,
    /// Block the log was included in.
    pub block_number: u64,
    /// Lowercase hex transaction hash.
    pub transaction_hash: String,
    /// Index of the log within its transaction's receipt.
    pub log_index: u64,
    /// Lowercase hex contract address that emitted the log.
    pub address: String,
    /// Name of the decoded event, e.g. `"Transfer"`.
    pub event_name: String,
    /// Decoded argument mapping, name to value.
    pub args: Value,
}

impl Event {
    /// True if this event's args satisfy `filter`.
    ///
    /// A `Null` filter or an empty object matches everything. Otherwise
    /// every key in an object filter must be present in `args` and match
    /// recursively; a filter value that is a list is an OR over its
    /// elements (covering both "any of these scalars" and, when `args`
    /// itself holds a list, "equals one of these lists"); anything else is
    /// direct equality.
    pub fn matches_filter(&self, filter: &Value) -> bool {
        if filter.is_empty_filter() {
            return true;
        }
        value_matches(&self.args, filter)
    }
}

fn value_matches(arg_value: &Value, filter_value: &Value) -> bool {
    match filter_value {
        Value::Null => true,
        Value::Object(fmap) if fmap.is_empty() => true,
        Value::Object(fmap) => match arg_value {
            Value::Object(amap) => fmap
                .iter()
                .all(|(k, fv)| amap.get(k).is_some_and(|av| value_matches(av, fv))),
            _ => false,
        },
        Value::List(items) => items.iter().any(|item| item == arg_value),
        scalar => arg_value == scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn event_with_args(args: Value) -> Event {
        Event {
            chain_id: 1,
            block_number: 100,
            transaction_hash: "0xdead".into(),
            log_index: 0,
            address: "0xc0ffee".into(),
            event_name: "Transfer".into(),
            args,
        }
    }

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut m = BTreeMap::new();
        for (k, v) in pairs {
            m.insert((*k).to_string(), v.clone());
        }
        Value::Object(m)
    }

    #[test]
    fn null_filter_matches_anything() {
        let e = event_with_args(obj(&[("from", Value::String("0xa".into()))]));
        assert!(e.matches_filter(&Value::Null));
    }

    #[test]
    fn empty_object_filter_matches_anything() {
        let e = event_with_args(obj(&[("from", Value::String("0xa".into()))]));
        assert!(e.matches_filter(&obj(&[])));
    }

    #[test]
    fn equality_filter() {
        let e = event_with_args(obj(&[("from", Value::String("0xa".into()))]));
        assert!(e.matches_filter(&obj(&[("from", Value::String("0xa".into()))])));
        assert!(!e.matches_filter(&obj(&[("from", Value::String("0xb".into()))])));
    }

    #[test]
    fn missing_key_does_not_match() {
        let e = event_with_args(obj(&[("from", Value::String("0xa".into()))]));
        assert!(!e.matches_filter(&obj(&[("to", Value::String("0xa".into()))])));
    }

    #[test]
    fn list_filter_is_or_over_scalars() {
        let e = event_with_args(obj(&[("from", Value::String("0xa".into()))]));
        let filter = obj(&[(
            "from",
            Value::List(vec![Value::String("0xa".into()), Value::String("0xb".into())]),
        )]);
        assert!(e.matches_filter(&filter));

        let filter_miss = obj(&[(
            "from",
            Value::List(vec![Value::String("0xc".into()), Value::String("0xb".into())]),
        )]);
        assert!(!e.matches_filter(&filter_miss));
    }

    #[test]
    fn list_of_lists_compares_by_exact_equality() {
        let list_arg = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let e = event_with_args(obj(&[("path", list_arg.clone())]));

        let filter = obj(&[(
            "path",
            Value::List(vec![list_arg.clone(), Value::List(vec![Value::Int(9)])]),
        )]);
        assert!(e.matches_filter(&filter));

        let filter_miss = obj(&[("path", Value::List(vec![Value::List(vec![Value::Int(9)])]))]);
        assert!(!e.matches_filter(&filter_miss));
    }

    #[test]
    fn nested_object_filter_recurses() {
        let inner = obj(&[("token", Value::String("0xusdc".into()))]);
        let e = event_with_args(obj(&[("detail", inner)]));

        let filter = obj(&[("detail", obj(&[("token", Value::String("0xusdc".into()))]))]);
        assert!(e.matches_filter(&filter));

        let filter_miss = obj(&[("detail", obj(&[("token", Value::String("0xdai".into()))]))]);
        assert!(!e.matches_filter(&filter_miss));
    }
}
