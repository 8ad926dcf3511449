//! Integration tests for collections and records

mod common;

use std::sync::Arc;
use std::thread;

use ::common::prelude::*;
use serde_json::json;

#[test]
fn test_notes_lifecycle() {
    let (store, _temp) = common::setup_store();

    let notes = store.create_collection("notes").unwrap();
    assert_eq!(notes.config["name"], "notes");
    assert_eq!(notes.config["slug"], "notes");

    let id = store
        .create_record(&notes.id, &common::doc(json!({"title": "a"})))
        .unwrap();

    let listed: Vec<Record> = store.list_records(&notes.id).unwrap().collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].body["title"], "a");

    store
        .update_record(&notes.id, &id, &common::doc(json!({"title": "b"})))
        .unwrap();
    let body = store.read_record(&notes.id, &id).unwrap();
    assert_eq!(body, common::doc(json!({"title": "b"})));
    assert_eq!(store.get_collection(&notes.id).unwrap().count, 1);

    store.delete_record(&notes.id, &id).unwrap();
    let err = store.read_record(&notes.id, &id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_twice() {
    let (store, _temp) = common::setup_store();
    let info = store.create_collection("twice").unwrap();
    let id = store
        .create_record(&info.id, &common::doc(json!({"n": 1})))
        .unwrap();

    store.delete_record(&info.id, &id).unwrap();
    assert_eq!(
        store.delete_record(&info.id, &id).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    store.delete_collection(&info.id).unwrap();
    assert_eq!(
        store.delete_collection(&info.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(store.list_collections().unwrap().is_empty());
}

#[test]
fn test_listing_skips_corrupt_records() {
    let (store, _temp) = common::setup_store();
    let info = store.create_collection("mixed").unwrap();
    let good = store
        .create_record(&info.id, &common::doc(json!({"ok": true})))
        .unwrap();

    let dir = store.root().join(&info.id);
    std::fs::write(dir.join("broken.json"), b"{not json").unwrap();
    std::fs::write(dir.join("array.json"), b"[1, 2]").unwrap();
    std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

    let ids: Vec<String> = store
        .list_records(&info.id)
        .unwrap()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![good]);
}

#[test]
fn test_list_missing_collection() {
    let (store, _temp) = common::setup_store();
    let err = store.list_records("nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_rename_keeps_records() {
    let (store, _temp) = common::setup_store();
    let info = store.create_collection("old").unwrap();
    let id = store
        .create_record(&info.id, &common::doc(json!({"k": "v"})))
        .unwrap();

    store.rename_collection(&info.id, "archive").unwrap();
    assert_eq!(
        store.get_collection(&info.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(store.read_record("archive", &id).unwrap()["k"], "v");
    assert_eq!(store.list_collections().unwrap(), vec!["archive".to_string()]);
}

#[test]
fn test_concurrent_renames_have_one_winner() {
    let (store, _temp) = common::setup_store();
    let store = Arc::new(store);
    let info = store.create_collection("contested").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            let from = info.id.clone();
            thread::spawn(move || store.rename_collection(&from, &format!("target-{i}")))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
    assert_eq!(store.list_collections().unwrap().len(), 1);
}

#[test]
fn test_concurrent_record_creates() {
    let (store, _temp) = common::setup_store();
    let store = Arc::new(store);
    let info = store.create_collection("busy").unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            let collection = info.id.clone();
            thread::spawn(move || {
                store
                    .create_record(&collection, &common::doc(json!({ "i": i })))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_collection(&info.id).unwrap().count, 16);
    assert_eq!(store.list_records(&info.id).unwrap().count(), 16);
}

#[test]
fn test_identifiers_cannot_escape_root() {
    let (store, _temp) = common::setup_store();
    for bad in ["..", "../etc", "a/b", ".hidden", ""] {
        let err = store.get_collection(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName, "{bad:?}");
    }
}
