use super::*;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::remote::MemoryStore;

struct FixedSession {
    store: Arc<MemoryStore>,
    signed_in: Arc<AtomicBool>,
    served: bool,
}

impl Session for FixedSession {
    fn acquire(&mut self) -> Option<Handle> {
        if !self.signed_in.load(Ordering::SeqCst) {
            self.served = false;
            return None;
        }
        let fresh = !self.served;
        self.served = true;
        Some(Handle {
            collections: self.store.clone(),
            identities: self.store.clone(),
            fresh,
        })
    }

    fn label(&self) -> String {
        "memory".to_string()
    }
}

fn seeded() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.put(
        "requirements",
        vec![
            Record::new("r1", "2026-01-03T00:00:00Z")
                .with_field("name", "Ada")
                .with_field("status", "pending"),
            Record::new("r2", "2026-01-02T00:00:00Z")
                .with_field("name", "Linus")
                .with_field("status", "pending"),
            Record::new("r3", "2026-01-01T00:00:00Z")
                .with_field("name", "Grace")
                .with_field("status", "approved"),
        ],
    );
    store.put(
        "feedback",
        vec![Record::new("f1", "2026-01-01T00:00:00Z").with_field("name", "Ken")],
    );
    Arc::new(store)
}

fn app_with(store: Arc<MemoryStore>, signed_in: bool) -> (App, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(signed_in));
    let session = FixedSession {
        store,
        signed_in: flag.clone(),
        served: false,
    };
    (
        App::with_session(Box::new(session), EntityKind::Requirements),
        flag,
    )
}

/// Waits for `n` background loads, then applies them in arrival order.
fn settle_n(app: &mut App, n: usize) {
    let mut done = Vec::new();
    for _ in 0..n {
        let msg = app
            .loads_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("load finished");
        done.push(msg);
    }
    for msg in done {
        app.loads_tx.send(msg).expect("requeue");
    }
    app.drain_loads();
}

fn settle(app: &mut App) {
    settle_n(app, 1);
}

fn press(app: &mut App, code: KeyCode) {
    event_loop::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn no_credential_means_no_load() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), false);
    app.poll_session(true);
    assert!(!app.is_ready());
    app.switch_entity(EntityKind::Feedback);
    app.refresh();
    assert_eq!(store.select_calls(), 0);
    assert!(app.screen.records().is_empty());
}

#[test]
fn signing_in_loads_the_current_screen() {
    let store = seeded();
    let (mut app, flag) = app_with(store.clone(), false);
    app.poll_session(true);
    flag.store(true, Ordering::SeqCst);
    app.poll_session(true);
    settle(&mut app);
    assert_eq!(app.screen.records().len(), 3);
    assert_eq!(app.current_id().as_deref(), Some("r1"));

    flag.store(false, Ordering::SeqCst);
    app.poll_session(true);
    assert!(!app.is_ready());
    assert!(app.notice.as_ref().is_some_and(|n| n.error));
}

#[test]
fn bulk_transition_through_the_picker() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    settle(&mut app);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.screen.selection().len(), 2);

    press(&mut app, KeyCode::Char('S'));
    assert!(matches!(app.modal, Some(Modal::Transition { .. })));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    assert!(app.modal.is_none());
    assert_eq!(store.update_calls(), 1);
    let stats = app.screen.stats(None).expect("stats");
    assert_eq!(stats.get("in_review"), 2);
    assert_eq!(stats.get("pending"), 0);
    assert!(app.screen.selection().is_empty());
}

#[test]
fn delete_dialog_requires_the_exact_phrase() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    settle(&mut app);

    press(&mut app, KeyCode::Char('d'));
    assert!(matches!(app.modal, Some(Modal::Delete(DeleteScope::Single))));

    type_text(&mut app, "DELET");
    press(&mut app, KeyCode::Enter);
    assert_eq!(store.delete_calls(), 0);
    assert!(app.modal.is_some());

    type_text(&mut app, "E");
    press(&mut app, KeyCode::Enter);
    assert_eq!(store.delete_calls(), 1);
    assert!(app.modal.is_none());
    let ids: Vec<&str> = app.screen.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r3"]);
}

#[test]
fn escape_cancels_the_delete_dialog() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    settle(&mut app);

    press(&mut app, KeyCode::Char('d'));
    type_text(&mut app, "DELETE");
    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert!(!app.screen.gate(DeleteScope::Single).is_open());

    press(&mut app, KeyCode::Char('d'));
    let pending = app
        .screen
        .gate(DeleteScope::Single)
        .pending()
        .expect("open");
    assert!(pending.input.is_empty());
}

#[test]
fn filter_input_narrows_rows_live() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    settle(&mut app);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.focus, Focus::Filter);
    type_text(&mut app, "gra");
    assert_eq!(app.screen.visible_ids(), vec!["r3"]);
    assert_eq!(app.cursor, 0);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.focus, Focus::Rows);
    assert_eq!(app.screen.visible().len(), 3);
}

#[test]
fn switching_screens_drops_the_old_load() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    app.switch_entity(EntityKind::Feedback);
    settle_n(&mut app, 2);
    assert_eq!(app.screen.kind(), EntityKind::Feedback);
    let ids: Vec<&str> = app.screen.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["f1"]);
}

#[test]
fn refetch_after_delete_clears_the_filter_box() {
    let store = seeded();
    let (mut app, _) = app_with(store.clone(), true);
    app.poll_session(true);
    settle(&mut app);

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "a");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen.visible_ids(), vec!["r1", "r3"]);

    press(&mut app, KeyCode::Char('d'));
    type_text(&mut app, "DELETE");
    press(&mut app, KeyCode::Enter);
    assert_eq!(store.delete_calls(), 1);

    assert!(app.filter.buf.is_empty());
    assert!(app.screen.criteria().is_empty());
    assert_eq!(app.screen.visible_ids(), vec!["r2", "r3"]);
}
