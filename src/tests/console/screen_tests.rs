use super::*;
use crate::model::Record;
use crate::remote::MemoryStore;

fn req(id: &str, ts: &str, name: &str, status: &str) -> Record {
    Record::new(id, ts)
        .with_field("name", name)
        .with_field("email", format!("{}@example.com", name.to_lowercase()))
        .with_field("status", status)
}

fn requirements_store() -> MemoryStore {
    MemoryStore::with_rows(
        "requirements",
        vec![
            req("1", "2026-01-04T00:00:00Z", "Ada", "pending"),
            req("2", "2026-01-03T00:00:00Z", "Linus", "pending"),
            req("3", "2026-01-02T00:00:00Z", "Grace", "approved"),
            req("4", "2026-01-01T00:00:00Z", "Ken", "pending"),
        ],
    )
}

fn loaded(store: &MemoryStore) -> CollectionScreen {
    let mut screen = CollectionScreen::new(EntityKind::Requirements);
    let out = screen.refresh(Some(store)).expect("load");
    assert_eq!(out, LoadOutcome::Applied(4));
    screen
}

fn status_of(store: &MemoryStore, id: &str) -> Option<String> {
    store
        .rows("requirements")
        .into_iter()
        .find(|r| r.id == id)
        .and_then(|r| r.text("status"))
}

#[test]
fn bulk_status_change_updates_stats_and_clears_selection() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_facet(Facet::parse("pending"));
    assert_eq!(screen.visible_ids(), vec!["1", "2", "4"]);

    assert!(screen.toggle("1"));
    assert!(screen.toggle("2"));
    let before = screen.stats(None).expect("stats");

    let affected = screen
        .bulk_set_status(Some(&store), None, "in_review")
        .expect("bulk update");
    assert_eq!(affected.ids(), &["1".to_string(), "2".to_string()]);
    assert_eq!(store.update_calls(), 1);

    let after = screen.stats(None).expect("stats");
    assert_eq!(after.get("pending"), before.get("pending") - 2);
    assert_eq!(after.get("in_review"), before.get("in_review") + 2);
    assert!(screen.selection().is_empty());
    // The refetch replaced the collection, so the facet is back to all.
    assert!(screen.criteria().is_empty());
    assert_eq!(screen.visible_ids(), vec!["1", "2", "3", "4"]);
}

#[test]
fn refetch_after_a_change_resets_criteria_and_selection() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_query("a");
    assert!(screen.toggle("1"));
    assert!(screen.toggle("2"));

    screen
        .set_status(Some(&store), None, &Targets::one("1"), "approved")
        .expect("update");
    assert_eq!(store.select_calls(), 2);
    assert_eq!(screen.criteria(), &FilterCriteria::default());
    assert!(screen.selection().is_empty());
    assert_eq!(screen.records()[0].text("status").as_deref(), Some("approved"));
}

#[test]
fn bulk_actions_ignore_hidden_selected_rows() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.toggle("3");
    screen.toggle("1");
    screen.set_facet(Facet::Only("pending".to_string()));
    assert_eq!(screen.selected_visible(), vec!["1".to_string()]);

    screen
        .bulk_set_status(Some(&store), None, "rejected")
        .expect("update");
    assert_eq!(status_of(&store, "1").as_deref(), Some("rejected"));
    assert_eq!(status_of(&store, "3").as_deref(), Some("approved"));
}

#[test]
fn toggling_a_hidden_row_is_refused() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_query("grace");
    assert!(!screen.toggle("1"));
    assert!(screen.selection().is_empty());
    assert!(screen.toggle("3"));
    assert!(screen.selection_flags().all_selected);
}

#[test]
fn header_toggle_selects_then_clears_visible() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_facet(Facet::Only("pending".to_string()));
    screen.toggle_all();
    assert_eq!(screen.selection().len(), 3);
    assert!(screen.selection_flags().all_selected);
    screen.toggle_all();
    assert!(screen.selection().is_empty());
}

#[test]
fn confirmed_bulk_delete_removes_exactly_the_selection() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.toggle("2");
    screen.toggle("4");
    assert!(screen.request_bulk_delete());
    assert_eq!(screen.open_gate(), Some(DeleteScope::Bulk));

    screen.gate_mut(DeleteScope::Bulk).set_input("DELETE");
    assert!(screen.confirm_delete(DeleteScope::Bulk, Some(&store)).is_none());
    assert_eq!(store.delete_calls(), 0);

    screen.gate_mut(DeleteScope::Bulk).set_input("DELETE SELECTED");
    let affected = screen
        .confirm_delete(DeleteScope::Bulk, Some(&store))
        .expect("confirmable")
        .expect("delete");
    assert_eq!(affected.len(), 2);
    assert_eq!(store.delete_calls(), 1);

    let left: Vec<String> = screen.records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(left, vec!["1", "3"]);
    assert!(screen.selection().is_empty());
    assert_eq!(screen.open_gate(), None);
}

#[test]
fn failed_delete_keeps_collection_and_reopens_gate() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    assert!(screen.request_delete("3"));
    screen.gate_mut(DeleteScope::Single).set_input("DELETE");

    let before: Vec<Record> = screen.records().to_vec();
    store.set_failing(true);
    let result = screen
        .confirm_delete(DeleteScope::Single, Some(&store))
        .expect("confirmable");
    assert!(result.is_err());
    assert_eq!(screen.records(), before.as_slice());
    assert!(screen.last_error().is_some());

    let pending = screen.gate(DeleteScope::Single).pending().expect("reopened");
    assert!(pending.error.is_some());
    assert_eq!(pending.ids, vec!["3".to_string()]);
}

#[test]
fn failed_status_change_leaves_state_untouched() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_facet(Facet::Only("pending".to_string()));
    screen.toggle("1");
    screen.toggle("4");

    let records = screen.records().to_vec();
    let selection = screen.selection().clone();
    let criteria = screen.criteria().clone();
    let stats = screen.stats(None);

    store.set_failing(true);
    let err = screen
        .bulk_set_status(Some(&store), None, "approved")
        .expect_err("fails");
    assert!(matches!(err, ConsoleError::Mutation { .. }));

    assert_eq!(screen.records(), records.as_slice());
    assert_eq!(screen.selection(), &selection);
    assert_eq!(screen.criteria(), &criteria);
    assert_eq!(screen.stats(None), stats);
    assert_eq!(store.select_calls(), 1);
}

#[test]
fn remove_drops_exactly_the_confirmed_ids() {
    let row = |id: &str, category: &str| {
        Record::new(id, "2026-01-01T00:00:00Z")
            .with_field("name", id)
            .with_field("message", "hi")
            .with_field("category", category)
    };
    let store = MemoryStore::with_rows(
        "feedback",
        vec![
            row("f1", "bug"),
            row("f2", "bug"),
            row("f3", "praise"),
            row("f4", "bug"),
        ],
    );
    let mut screen = CollectionScreen::new(EntityKind::Feedback);
    screen.refresh(Some(&store)).expect("load");
    screen.toggle("f3");
    screen.set_facet(Facet::Only("bug".to_string()));
    screen.toggle("f1");
    screen.toggle("f2");

    assert!(screen.request_bulk_delete());
    screen.gate_mut(DeleteScope::Bulk).set_input("DELETE SELECTED");
    let affected = screen
        .confirm_delete(DeleteScope::Bulk, Some(&store))
        .expect("confirmable")
        .expect("delete");
    assert_eq!(affected.ids(), &["f1".to_string(), "f2".to_string()]);

    let left: Vec<String> = screen.records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(left, vec!["f3", "f4"]);
    let selected: Vec<&String> = screen.selection().ids().collect();
    assert_eq!(selected, vec!["f3"]);
    assert_eq!(store.select_calls(), 1);
}

#[test]
fn single_and_bulk_gates_are_independent() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.toggle("4");
    assert!(screen.request_delete("1"));
    assert!(screen.request_bulk_delete());
    screen.cancel_delete(DeleteScope::Single);
    assert!(!screen.gate(DeleteScope::Single).is_open());
    assert!(screen.gate(DeleteScope::Bulk).is_open());
}

#[test]
fn empty_selection_opens_no_bulk_gate() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    assert!(!screen.request_bulk_delete());
    assert!(matches!(
        screen.bulk_set_status(Some(&store), None, "approved"),
        Err(ConsoleError::EmptyTargets)
    ));
    assert_eq!(store.update_calls(), 0);
}

#[test]
fn missing_client_is_a_quiet_no_op() {
    let mut screen = CollectionScreen::new(EntityKind::Requirements);
    assert_eq!(screen.refresh(None).expect("no-op"), LoadOutcome::NotReady);
    let affected = screen
        .set_status(None, None, &Targets::one("1"), "approved")
        .expect("no-op");
    assert!(affected.is_empty());
    assert!(screen.confirm_delete(DeleteScope::Single, None).is_none());
}

#[test]
fn operator_refresh_resets_filter_and_selection() {
    let store = requirements_store();
    let mut screen = loaded(&store);
    screen.set_query("ada");
    screen.toggle("1");
    screen.refresh(Some(&store)).expect("reload");
    assert!(screen.criteria().is_empty());
    assert!(screen.selection().is_empty());
}

#[test]
fn patch_entities_skip_the_refetch() {
    let store = MemoryStore::with_rows(
        "contact_messages",
        vec![Record::new("m1", "2026-01-01T00:00:00Z").with_field("is_read", false)],
    );
    let mut screen = CollectionScreen::new(EntityKind::ContactMessages);
    screen.refresh(Some(&store)).expect("load");
    screen
        .set_status(Some(&store), None, &Targets::one("m1"), "read")
        .expect("mark read");
    assert_eq!(store.select_calls(), 1);
    assert_eq!(screen.stats(None).expect("stats").get("read"), 1);
}

#[test]
fn facet_cycles_through_values_and_back() {
    let mut screen = CollectionScreen::new(EntityKind::SuccessStories);
    let mut seen = Vec::new();
    for _ in 0..4 {
        screen.cycle_facet();
        seen.push(screen.criteria().facet.label().to_string());
    }
    assert_eq!(seen, vec!["pending", "approved", "rejected", "all"]);
}

#[test]
fn read_only_entities_never_open_a_gate() {
    let mut screen = CollectionScreen::new(EntityKind::Identities);
    let ticket = screen.begin_load();
    screen
        .apply_load(ticket, Ok(vec![Record::new("u1", "2026-01-01T00:00:00Z")]))
        .expect("apply");
    assert!(!screen.request_delete("u1"));
}
