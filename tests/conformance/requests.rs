//! `QueryRequest` decoding and validation end to end

use crate::*;

fn request(json: &str) -> Result<Query> {
    let req: QueryRequest = serde_json::from_str(json).unwrap();
    Query::try_from(req)
}

#[test]
fn test_request_runs_against_store() {
    let store = MapDatastore::new();
    for (k, v) in [("/a/1", "c"), ("/a/2", "a"), ("/a/3", "b"), ("/b/1", "a")] {
        store.put(&Key::new(k), v.as_bytes()).unwrap();
    }

    let q = request(
        r#"{
            "prefix": "/a",
            "filters": [{"kind": "value_compare", "op": "!=", "value": [98]}],
            "orders": ["by_value"],
            "keys_only": true
        }"#,
    )
    .unwrap();

    let out = store.query(q).unwrap().rest().unwrap();
    let keys: Vec<&str> = out.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["/a/2", "/a/1"]);
    assert!(out.iter().all(|e| e.value.is_empty() && e.size == 1));
}

#[test]
fn test_empty_request_is_unbounded() {
    let q = request("{}").unwrap();
    assert_eq!(q.offset, 0);
    assert_eq!(q.limit, 0);
    assert!(q.filters.is_empty());
    assert!(q.orders.is_empty());
}

#[test]
fn test_negative_window_rejected() {
    let err = request(r#"{"offset": -1}"#).unwrap_err();
    assert!(err.is_invalid_query(), "{}", err);

    let err = request(r#"{"limit": -5}"#).unwrap_err();
    assert!(err.is_invalid_query(), "{}", err);
}

#[test]
fn test_bad_filters_rejected() {
    let err = request(r#"{"filters": [{"kind": "key_compare", "op": "~", "key": "/a"}]}"#)
        .unwrap_err();
    assert!(err.is_invalid_query());

    let err = request(r#"{"filters": [{"kind": "key_prefix", "prefix": "a//b/"}]}"#)
        .unwrap_err();
    assert!(err.is_invalid_query());
}

#[test]
fn test_unknown_fields_rejected_at_decode() {
    assert!(serde_json::from_str::<QueryRequest>(r#"{"sort": "key"}"#).is_err());
    assert!(serde_json::from_str::<QueryRequest>(r#"{"orders": ["by_size"]}"#).is_err());
}
