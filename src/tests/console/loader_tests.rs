use super::*;
use crate::remote::MemoryStore;

fn rows(ids: &[&str]) -> Vec<Record> {
    ids.iter()
        .map(|id| Record::new(*id, "2026-01-01T00:00:00Z"))
        .collect()
}

fn ids(loader: &CollectionLoader) -> Vec<String> {
    loader.records().iter().map(|r| r.id.clone()).collect()
}

#[test]
fn missing_client_never_issues_a_load() {
    let mut loader = CollectionLoader::new("requirements");
    let out = loader.load(None).expect("no-op");
    assert_eq!(out, LoadOutcome::NotReady);
    assert_eq!(loader.state(), &LoadState::NotLoaded);
    assert!(loader.records().is_empty());
}

#[test]
fn load_replaces_rows_in_store_order() {
    let store = MemoryStore::new();
    store.put(
        "requirements",
        vec![
            Record::new("old", "2026-01-01T00:00:00Z"),
            Record::new("new", "2026-02-01T00:00:00Z"),
        ],
    );
    let mut loader = CollectionLoader::new("requirements");
    let out = loader.load(Some(&store)).expect("load");
    assert_eq!(out, LoadOutcome::Applied(2));
    assert_eq!(ids(&loader), vec!["new", "old"]);
    assert_eq!(loader.state(), &LoadState::Loaded);
    assert_eq!(store.select_calls(), 1);
}

#[test]
fn latest_initiated_load_wins() {
    let mut loader = CollectionLoader::new("requirements");
    let slow = loader.begin();
    let fast = loader.begin();

    let out = loader.finish(fast, Ok(rows(&["l2"]))).expect("apply l2");
    assert_eq!(out, LoadOutcome::Applied(1));

    let out = loader.finish(slow, Ok(rows(&["l1a", "l1b"]))).expect("stale");
    assert_eq!(out, LoadOutcome::Stale);
    assert_eq!(ids(&loader), vec!["l2"]);
}

#[test]
fn stale_failure_is_discarded_too() {
    let mut loader = CollectionLoader::new("requirements");
    let slow = loader.begin();
    let fast = loader.begin();
    loader.finish(fast, Ok(rows(&["x"]))).expect("apply");

    let err = ConsoleError::Fetch {
        collection: "requirements".to_string(),
        message: "boom".to_string(),
    };
    assert_eq!(loader.finish(slow, Err(err)).expect("stale"), LoadOutcome::Stale);
    assert_eq!(loader.state(), &LoadState::Loaded);
}

#[test]
fn failed_refetch_keeps_previous_rows() {
    let store = MemoryStore::with_rows("requirements", rows(&["a", "b"]));
    let mut loader = CollectionLoader::new("requirements");
    loader.load(Some(&store)).expect("first load");

    store.set_failing(true);
    let err = loader.load(Some(&store)).expect_err("second load fails");
    assert!(matches!(err, ConsoleError::Fetch { .. }));
    assert_eq!(ids(&loader), vec!["a", "b"]);
    assert!(matches!(loader.state(), LoadState::Failed(_)));
    assert!(!loader.is_loading());
}

#[test]
fn results_after_unmount_are_dropped() {
    let mut loader = CollectionLoader::new("requirements");
    let t = loader.begin();
    loader.unmount();
    assert_eq!(loader.finish(t, Ok(rows(&["a"]))).expect("stale"), LoadOutcome::Stale);
    assert!(loader.records().is_empty());
}

#[test]
fn tickets_do_not_cross_loader_instances() {
    let mut first = CollectionLoader::new("requirements");
    let mut second = CollectionLoader::new("requirements");
    let t = first.begin();
    second.begin();
    assert!(!second.is_current(t));
    assert_eq!(second.finish(t, Ok(rows(&["a"]))).expect("stale"), LoadOutcome::Stale);
}

#[test]
fn evict_and_patch_touch_only_named_rows() {
    let mut loader = CollectionLoader::new("requirements");
    let t = loader.begin();
    loader.finish(t, Ok(rows(&["a", "b", "c"]))).expect("apply");

    loader.patch(&["b".to_string()], "status", &serde_json::json!("approved"));
    assert_eq!(loader.records()[1].text("status").as_deref(), Some("approved"));
    assert_eq!(loader.records()[0].text("status"), None);

    loader.evict(&["a".to_string(), "c".to_string()]);
    assert_eq!(ids(&loader), vec!["b"]);
}
