use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A polymorphic JSON-like value used for event arguments and argument
/// filters.
///
/// `Object` is backed by a `BTreeMap` so that key order is free once a value
/// has gone through normalization (`rivergate_index::normalize`); this type
/// only owns the shape and the comparisons normalization needs, not the
/// normalization algorithm itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The absence of a value. An empty/null filter matches everything.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar. Block numbers, indices and most decoded
    /// integers round-trip through this variant rather than `Float`.
    Int(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar, including 0x-prefixed hex payloads.
    String(String),
    /// An ordered list. As a filter, a list is an OR over its elements.
    List(Vec<Value>),
    /// A nested mapping, ordered lexicographically by key once normalized.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// True if this is `Value::Null` or an empty object — the two forms an
    /// "accepts everything" filter can normalize to.
    pub fn is_empty_filter(&self) -> bool {
        matches!(self, Value::Null) || matches!(self, Value::Object(m) if m.is_empty())
    }

    /// A deterministic textual rendering used as the tie-break when sorting
    /// `List` elements whose top-level scalar rank is equal (nested lists
    /// and objects have no natural numeric/lexicographic order of their
    /// own), and as part of `Eq`'s total order. Assumes children are
    /// already normalized, so object keys are already sorted.
    pub fn canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Value::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) => {
                let _ = write!(out, "{f}");
            }
            Value::String(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
            Value::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    out.push_str(k);
                    out.push_str("\":");
                    v.write_canonical(out);
                }
                out.push('}');
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::List(_) => 4,
            Value::Object(_) => 5,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (String(a), String(b)) => a.cmp(b),
            _ if self.rank() == other.rank() => self.canonical_string().cmp(&other.canonical_string()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_detection() {
        assert!(Value::Null.is_empty_filter());
        assert!(Value::Object(BTreeMap::new()).is_empty_filter());
        assert!(!Value::Bool(false).is_empty_filter());
    }

    #[test]
    fn ordering_is_numeric_for_numbers() {
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Int(1) < Value::Float(1.5));
    }

    #[test]
    fn ordering_ranks_scalars_before_compounds() {
        assert!(Value::String("z".into()) < Value::List(vec![]));
    }

    #[test]
    fn canonical_string_is_order_sensitive_on_input_order() {
        let mut a = BTreeMap::new();
        a.insert("a".to_string(), Value::Int(1));
        a.insert("b".to_string(), Value::Int(2));
        let obj = Value::Object(a);
        assert_eq!(obj.canonical_string(), "{\"a\":1,\"b\":2}");
    }
}
