use rivergate_types::Value;

/// Canonicalize a filter value: `Null` becomes an empty object, object keys
/// sort lexicographically (free, since `Value::Object` is a `BTreeMap`),
/// and list values sort by `Value`'s total order. Applied recursively, so
/// `normalize` is idempotent and two semantically equal filters produce
/// byte-identical normalized forms.
pub fn normalize(v: &Value) -> Value {
    match v {
        Value::Null => Value::Object(Default::default()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), normalize(v))).collect()),
        Value::List(items) => {
            let mut normalized: Vec<Value> = items.iter().map(normalize).collect();
            normalized.sort();
            Value::List(normalized)
        }
        other => other.clone(),
    }
}

/// True iff every object accepted by filter `b` is also accepted by filter
/// `a` — `a` is "at least as permissive as" `b`.
///
/// - `a = null` (or empty object) accepts everything, so it is softer than
///   anything.
/// - `b = null` is only accepted as "softer" by an equally-permissive `a`
///   (null or empty object); any other `a` is narrower than "everything".
/// - two objects: every key in `a` must exist in `b` and be softer there.
/// - two lists: `a` is softer iff `b`'s allowed set is a subset of `a`'s
///   (a list is an OR, so the larger allowed set is the softer one).
/// - a list `a` against a non-list `b`: `a` is softer iff `a` contains `b`
///   (a scalar query is a one-element allowed set).
/// - anything else: equality.
pub fn is_softer_than(a: &Value, b: &Value) -> bool {
    if a.is_empty_filter() {
        return true;
    }
    if b.is_empty_filter() {
        return false;
    }
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            ma.iter().all(|(k, va)| mb.get(k).is_some_and(|vb| is_softer_than(va, vb)))
        }
        (Value::List(la), Value::List(lb)) => lb.iter().all(|vb| la.contains(vb)),
        (Value::List(la), other) => la.contains(other),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut m = BTreeMap::new();
        for (k, v) in pairs {
            m.insert((*k).to_string(), v.clone());
        }
        Value::Object(m)
    }

    #[test]
    fn normalize_is_idempotent() {
        let f = obj(&[("from", Value::List(vec![Value::String("b".into()), Value::String("a".into())]))]);
        let once = normalize(&f);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_null_becomes_empty_object() {
        assert_eq!(normalize(&Value::Null), obj(&[]));
    }

    #[test]
    fn reflexive_and_antisymmetric() {
        let f = obj(&[("from", Value::String("0xa".into()))]);
        assert!(is_softer_than(&f, &f));

        let g = obj(&[("from", Value::String("0xb".into()))]);
        assert!(!is_softer_than(&f, &g) || !is_softer_than(&g, &f) || normalize(&f) == normalize(&g));
    }

    #[test]
    fn scenario_d_argument_filter_subset() {
        let stored = obj(&[("from", Value::List(vec![Value::String("0xA".into()), Value::String("0xB".into())]))]);
        let query_covered = obj(&[("from", Value::String("0xA".into()))]);
        let query_uncovered = obj(&[("from", Value::String("0xC".into()))]);

        assert!(is_softer_than(&stored, &query_covered));
        assert!(!is_softer_than(&stored, &query_uncovered));
    }

    #[test]
    fn null_is_softer_than_everything() {
        let f = obj(&[("from", Value::String("0xa".into()))]);
        assert!(is_softer_than(&Value::Null, &f));
    }

    #[test]
    fn non_empty_is_not_softer_than_null() {
        let f = obj(&[("from", Value::String("0xa".into()))]);
        assert!(!is_softer_than(&f, &Value::Null));
    }
}
