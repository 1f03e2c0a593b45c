//! Call history filtering.
//!
//! A filter arrives as the body of a `/calls` request:
//! `{"filter": {"path": "method", "value": "POST"}}`. `path` is either one
//! key or a list of keys walked into nested objects, e.g.
//! `["headers", "content-type"]`.

use serde::Deserialize;
use serde_json::Value;

/// Key or key sequence selecting a field of a call record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterPath {
    Key(String),
    Keys(Vec<String>),
}

impl FilterPath {
    fn keys(&self) -> &[String] {
        match self {
            FilterPath::Key(key) => std::slice::from_ref(key),
            FilterPath::Keys(keys) => keys,
        }
    }
}

/// Equality filter over call records viewed as JSON.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CallFilter {
    pub path: FilterPath,
    pub value: Value,
}

#[derive(Deserialize)]
struct FilterQuery {
    filter: Option<CallFilter>,
}

impl CallFilter {
    /// Extract a filter from a request body.
    ///
    /// Anything that is not a well-formed filter query yields `None`, which
    /// means "no filtering".
    pub fn from_body(body: &[u8]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        serde_json::from_slice::<FilterQuery>(body).ok()?.filter
    }

    /// Whether the record, serialized as JSON, matches this filter.
    ///
    /// A string filter value is compared with the textual form of the
    /// selected field, so `"201"` matches the number `201`.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(selected) = select(record, self.path.keys()) else {
            return false;
        };

        match (&self.value, selected) {
            (Value::String(expected), Value::String(actual)) => expected == actual,
            (Value::String(expected), Value::Number(n)) => *expected == n.to_string(),
            (Value::String(expected), Value::Bool(b)) => *expected == b.to_string(),
            (expected, actual) => expected == actual,
        }
    }
}

fn select<'a>(value: &'a Value, keys: &[String]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "timestamp": 1,
            "method": "POST",
            "url": "/orders",
            "headers": { "content-type": "application/json" },
            "body": "{}",
            "tags": ["x", "y"]
        })
    }

    #[test]
    fn test_from_body() {
        let filter = CallFilter::from_body(br#"{"filter":{"path":"method","value":"POST"}}"#).unwrap();
        assert_eq!(filter.path, FilterPath::Key("method".into()));
        assert_eq!(filter.value, json!("POST"));

        let nested = CallFilter::from_body(br#"{"filter":{"path":["headers","content-type"],"value":"x"}}"#).unwrap();
        assert_eq!(nested.path, FilterPath::Keys(vec!["headers".into(), "content-type".into()]));
    }

    #[test]
    fn test_from_body_without_filter() {
        assert!(CallFilter::from_body(b"").is_none());
        assert!(CallFilter::from_body(b"not json").is_none());
        assert!(CallFilter::from_body(br#"{"other":1}"#).is_none());
        assert!(CallFilter::from_body(br#"{"filter":{"path":"method"}}"#).is_none());
    }

    #[test]
    fn test_matches_single_key() {
        let filter = CallFilter {
            path: FilterPath::Key("method".into()),
            value: json!("POST"),
        };
        assert!(filter.matches(&record()));

        let filter = CallFilter {
            path: FilterPath::Key("method".into()),
            value: json!("GET"),
        };
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_matches_nested_keys() {
        let filter = CallFilter {
            path: FilterPath::Keys(vec!["headers".into(), "content-type".into()]),
            value: json!("application/json"),
        };
        assert!(filter.matches(&record()));

        let filter = CallFilter {
            path: FilterPath::Keys(vec!["tags".into(), "1".into()]),
            value: json!("y"),
        };
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let filter = CallFilter {
            path: FilterPath::Keys(vec!["headers".into(), "accept".into()]),
            value: json!("*/*"),
        };
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_string_value_matches_number() {
        let filter = CallFilter {
            path: FilterPath::Key("timestamp".into()),
            value: json!("1"),
        };
        assert!(filter.matches(&record()));
    }
}
