use super::*;
use crate::model::{CONTACT_MESSAGES, IDENTITIES, REQUIREMENTS, Record};
use crate::remote::MemoryStore;

fn store() -> MemoryStore {
    MemoryStore::with_rows(
        "requirements",
        vec![
            Record::new("a", "2026-01-03T00:00:00Z").with_field("status", "pending"),
            Record::new("b", "2026-01-02T00:00:00Z").with_field("status", "pending"),
            Record::new("c", "2026-01-01T00:00:00Z").with_field("status", "approved"),
        ],
    )
}

fn status_field() -> &'static StatusField {
    REQUIREMENTS.primary_workflow().expect("requirements workflow")
}

#[test]
fn targets_reject_empty_lists_and_dedupe() {
    assert!(matches!(
        Targets::many(Vec::<String>::new()),
        Err(ConsoleError::EmptyTargets)
    ));
    let t = Targets::many(["a", "b", "a"]).expect("targets");
    assert_eq!(t.ids(), &["a".to_string(), "b".to_string()]);
    assert_eq!(Targets::from("x").len(), 1);
}

#[test]
fn update_status_issues_one_call_for_many_ids() {
    let store = store();
    let gw = MutationGateway::new(&store, &REQUIREMENTS);
    let targets = Targets::many(["a", "b"]).expect("targets");
    let affected = gw
        .update_status(status_field(), &targets, "in_review")
        .expect("update");
    assert_eq!(affected.ids(), &["a".to_string(), "b".to_string()]);
    assert_eq!(store.update_calls(), 1);
    let rows = store.rows("requirements");
    assert_eq!(rows[2].text("status").as_deref(), Some("approved"));
    assert_eq!(rows[0].text("status").as_deref(), Some("in_review"));
}

#[test]
fn undeclared_status_never_reaches_the_store() {
    let store = store();
    let gw = MutationGateway::new(&store, &REQUIREMENTS);
    let err = gw
        .update_status(status_field(), &Targets::one("a"), "shipped")
        .expect_err("invalid");
    assert!(matches!(err, ConsoleError::InvalidStatus { .. }));
    assert_eq!(store.update_calls(), 0);
}

#[test]
fn flag_status_is_written_as_bool() {
    let store = MemoryStore::with_rows(
        "contact_messages",
        vec![Record::new("m1", "2026-01-01T00:00:00Z").with_field("is_read", false)],
    );
    let gw = MutationGateway::new(&store, &CONTACT_MESSAGES);
    let field = CONTACT_MESSAGES.primary_workflow().expect("read flag");
    gw.update_status(field, &Targets::one("m1"), "read")
        .expect("mark read");
    assert_eq!(
        store.rows("contact_messages")[0].get("is_read"),
        Some(&serde_json::Value::Bool(true))
    );
}

#[test]
fn remove_reports_only_existing_ids() {
    let store = store();
    let gw = MutationGateway::new(&store, &REQUIREMENTS);
    let affected = gw
        .remove(&Targets::many(["a", "ghost"]).expect("targets"))
        .expect("remove");
    assert_eq!(affected.ids(), &["a".to_string()]);
    assert_eq!(store.rows("requirements").len(), 2);
}

#[test]
fn remote_failure_maps_to_mutation_error() {
    let store = store();
    store.set_failing(true);
    let gw = MutationGateway::new(&store, &REQUIREMENTS);
    let err = gw.remove(&Targets::one("a")).expect_err("fails");
    assert!(matches!(err, ConsoleError::Mutation { operation: "delete", .. }));
}

#[test]
fn read_only_entities_reject_mutations() {
    let store = MemoryStore::new();
    let gw = MutationGateway::new(&store, &IDENTITIES);
    assert!(matches!(
        gw.remove(&Targets::one("u1")),
        Err(ConsoleError::ReadOnly(_))
    ));
    assert_eq!(store.delete_calls(), 0);
}
