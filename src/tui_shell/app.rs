use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use time::OffsetDateTime;

use crate::config::{ConfigStore, StoredCredential};
use crate::console::{CollectionScreen, DeleteScope, LoadOutcome, LoadState, LoadTicket, Targets};
use crate::error::ConsoleResult;
use crate::model::{EntityKind, Record, RecordId};
use crate::remote::{Access, ClientFactory, CollectionStore, IdentityDirectory};

use super::input::Input;
use super::modal;
use super::table;
use super::{Modal, RenderCtx, fmt_ts_ui, render_view_chrome};

mod event_loop;
mod render;
mod runtime;

pub(super) use self::runtime::run;

/// How often the credential is re-read while idle.
const SESSION_POLL: Duration = Duration::from_secs(2);

type LoadResult = (LoadTicket, ConsoleResult<Vec<Record>>);

/// Store handles for the current credential.
pub(super) struct Handle {
    pub(super) collections: Arc<dyn CollectionStore>,
    pub(super) identities: Arc<dyn CollectionStore>,
    /// Built for a credential the app has not seen yet.
    pub(super) fresh: bool,
}

/// Where the app gets its store handles from.
pub(super) trait Session {
    /// `None` while there is no usable credential.
    fn acquire(&mut self) -> Option<Handle>;
    /// Short description for the header: who is signed in, or why nobody is.
    fn label(&self) -> String;
}

struct RemoteSession {
    factory: Option<(ClientFactory, StoredCredential)>,
    who: Option<String>,
    note: String,
}

impl RemoteSession {
    fn load(config: &ConfigStore) -> Self {
        match config.resolve_base_url() {
            Ok(url) => Self {
                factory: Some((
                    ClientFactory::new(url.clone(), Access::Authenticated),
                    StoredCredential::new(config.clone(), url.clone()),
                )),
                who: None,
                note: url,
            },
            Err(err) => Self {
                factory: None,
                who: None,
                note: format!("{:#}", err),
            },
        }
    }
}

impl Session for RemoteSession {
    fn acquire(&mut self) -> Option<Handle> {
        let (factory, provider) = self.factory.as_mut()?;
        let Some(acquired) = factory.acquire(&*provider) else {
            self.who = None;
            return None;
        };
        if acquired.fresh {
            self.who = acquired.client.whoami().ok().and_then(|w| {
                let handle = w.handle?;
                Some(if w.admin {
                    format!("{} (admin)", handle)
                } else {
                    handle
                })
            });
        }
        let client = acquired.client;
        Some(Handle {
            identities: Arc::new(IdentityDirectory::new((*client).clone())),
            collections: client,
            fresh: acquired.fresh,
        })
    }

    fn label(&self) -> String {
        match (&self.factory, &self.who) {
            (None, _) => self.note.clone(),
            (Some(_), Some(who)) => format!("{}  {}", self.note, who),
            (Some(_), None) => format!("{}  (not signed in: run `studio login`)", self.note),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Rows,
    Filter,
}

#[derive(Clone, Debug)]
pub(super) struct Notice {
    pub(super) error: bool,
    pub(super) text: String,
}

pub(super) struct App {
    session: Box<dyn Session>,
    handle: Option<Handle>,
    polled_at: Option<Instant>,

    pub(super) screen: CollectionScreen,
    pub(super) cursor: usize,
    /// Workflow driving stats and transitions; `None` is the entity's primary one.
    pub(super) workflow_field: Option<&'static str>,
    pub(super) focus: Focus,
    pub(super) filter: Input,
    pub(super) modal: Option<Modal>,
    pub(super) notice: Option<Notice>,
    pub(super) quit: bool,

    loads_tx: Sender<LoadResult>,
    loads_rx: Receiver<LoadResult>,
}

impl App {
    fn load(opts: crate::tui::TuiRunOptions) -> Self {
        let config = ConfigStore::new(opts.config_dir);
        let session = RemoteSession::load(&config);
        Self::with_session(Box::new(session), opts.entity)
    }

    pub(super) fn with_session(session: Box<dyn Session>, entity: EntityKind) -> Self {
        let (loads_tx, loads_rx) = channel();
        Self {
            session,
            handle: None,
            polled_at: None,
            screen: CollectionScreen::new(entity),
            cursor: 0,
            workflow_field: None,
            focus: Focus::Rows,
            filter: Input::default(),
            modal: None,
            notice: None,
            quit: false,
            loads_tx,
            loads_rx,
        }
    }

    pub(super) fn session_label(&self) -> String {
        self.session.label()
    }

    pub(super) fn is_ready(&self) -> bool {
        self.handle.is_some()
    }

    fn store(&self) -> Option<Arc<dyn CollectionStore>> {
        let h = self.handle.as_ref()?;
        Some(if self.screen.kind() == EntityKind::Identities {
            h.identities.clone()
        } else {
            h.collections.clone()
        })
    }

    pub(super) fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            error: false,
            text: text.into(),
        });
    }

    pub(super) fn notify_err(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            error: true,
            text: text.into(),
        });
    }

    // Session and loading.

    /// Re-reads the credential (at most every [`SESSION_POLL`] unless forced). A new
    /// credential reloads the screen; losing it drops the handle and defers loads.
    pub(super) fn poll_session(&mut self, force: bool) {
        if !force && self.polled_at.is_some_and(|t| t.elapsed() < SESSION_POLL) {
            return;
        }
        self.polled_at = Some(Instant::now());

        match self.session.acquire() {
            None => {
                if self.handle.take().is_some() {
                    self.notify_err("credential unavailable; sign in again with `studio login`");
                }
            }
            Some(h) => {
                let reload = h.fresh || self.handle.is_none();
                self.handle = Some(h);
                if reload {
                    self.start_load();
                }
            }
        }
    }

    /// Starts a background load for the current screen. Without a handle nothing is issued.
    pub(super) fn start_load(&mut self) {
        let Some(store) = self.store() else {
            return;
        };
        let ticket = self.screen.begin_load();
        let collection = self.screen.spec().collection;
        let tx = self.loads_tx.clone();
        std::thread::spawn(move || {
            let result = crate::console::fetch(store.as_ref(), collection);
            // The receiver is gone only when the app has exited.
            let _ = tx.send((ticket, result));
        });
    }

    /// Applies finished loads. Results for superseded tickets (including screens that were
    /// switched away from) are dropped by the screen.
    pub(super) fn drain_loads(&mut self) {
        while let Ok((ticket, result)) = self.loads_rx.try_recv() {
            match self.screen.apply_load(ticket, result) {
                Ok(LoadOutcome::Applied(_)) => {
                    self.filter.clear();
                    self.clamp_cursor();
                    // A replaced collection closes any open delete dialog.
                    if let Some(Modal::Delete(scope)) = &self.modal
                        && !self.screen.gate(*scope).is_open()
                    {
                        self.modal = None;
                    }
                }
                Ok(_) => {}
                Err(err) => self.notify_err(err.to_string()),
            }
        }
    }

    pub(super) fn is_loading(&self) -> bool {
        matches!(self.screen.load_state(), LoadState::Loading)
    }

    pub(super) fn refresh(&mut self) {
        self.poll_session(true);
        if !self.is_ready() {
            self.notify_err("not signed in; nothing loaded");
            return;
        }
        self.start_load();
    }

    pub(super) fn switch_entity(&mut self, kind: EntityKind) {
        if kind == self.screen.kind() {
            return;
        }
        self.screen.unmount();
        self.screen = CollectionScreen::new(kind);
        self.cursor = 0;
        self.workflow_field = None;
        self.focus = Focus::Rows;
        self.filter.clear();
        self.modal = None;
        self.notice = None;
        self.start_load();
    }

    pub(super) fn next_entity(&mut self, step: isize) {
        let all = EntityKind::ALL;
        let idx = all
            .iter()
            .position(|k| *k == self.screen.kind())
            .unwrap_or(0) as isize;
        let n = all.len() as isize;
        let next = all[((idx + step).rem_euclid(n)) as usize];
        self.switch_entity(next);
    }

    // Rows.

    pub(super) fn clamp_cursor(&mut self) {
        let n = self.screen.visible().len();
        self.cursor = self.cursor.min(n.saturating_sub(1));
    }

    pub(super) fn move_cursor(&mut self, delta: isize) {
        let n = self.screen.visible().len();
        if n == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, n as isize - 1);
        self.cursor = next as usize;
    }

    pub(super) fn current_id(&self) -> Option<RecordId> {
        self.screen
            .visible()
            .get(self.cursor)
            .map(|r| r.id.clone())
    }

    pub(super) fn current_record(&self) -> Option<Record> {
        self.screen.visible().get(self.cursor).map(|r| (*r).clone())
    }

    pub(super) fn toggle_current(&mut self) {
        if let Some(id) = self.current_id() {
            self.screen.toggle(&id);
        }
    }

    pub(super) fn apply_filter_input(&mut self) {
        let query = self.filter.buf.clone();
        self.screen.set_query(&query);
        self.clamp_cursor();
    }

    /// A refetch after a change resets the screen's query; the input box follows it.
    fn sync_filter_input(&mut self) {
        if self.screen.criteria().query.is_empty() {
            self.filter.clear();
        }
    }

    pub(super) fn cycle_facet(&mut self) {
        self.screen.cycle_facet();
        self.clamp_cursor();
    }

    pub(super) fn cycle_workflow(&mut self) {
        let flows = self.screen.spec().workflows;
        if flows.len() < 2 {
            return;
        }
        let cur = self
            .workflow_field
            .and_then(|f| flows.iter().position(|w| w.field == f))
            .unwrap_or(0);
        let next = &flows[(cur + 1) % flows.len()];
        self.workflow_field = Some(next.field);
        self.notify(format!("workflow: {}", next.label));
    }

    // Status transitions.

    pub(super) fn open_transition(&mut self, bulk: bool) {
        let Some(wf) = self.screen.workflow(self.workflow_field) else {
            self.notify_err(format!("{} has no status workflow", self.screen.spec().title));
            return;
        };
        let (targets, options) = if bulk {
            match Targets::many(self.screen.selected_visible()) {
                Ok(t) => (t, wf.statuses()),
                Err(_) => {
                    self.notify_err("select rows first (space)");
                    return;
                }
            }
        } else {
            let Some(id) = self.current_id() else {
                return;
            };
            let options = self.screen.transitions(&id, Some(wf.field().field));
            (Targets::one(id), options)
        };
        self.modal = Some(Modal::Transition {
            targets,
            field: wf.field().field,
            options,
            selected: 0,
        });
    }

    pub(super) fn apply_transition(&mut self, targets: Targets, field: &'static str, status: &str) {
        let store = self.store();
        let Some(store) = store else {
            self.notify_err("not signed in; change skipped");
            return;
        };
        match self
            .screen
            .set_status(Some(store.as_ref()), Some(field), &targets, status)
        {
            Ok(affected) => {
                self.notify(format!("{} -> {} ({} updated)", field, status, affected.len()));
                self.sync_filter_input();
                if let Some(err) = self.screen.last_error() {
                    let err = err.to_string();
                    self.notify_err(err);
                }
            }
            Err(err) => self.notify_err(err.to_string()),
        }
        self.clamp_cursor();
    }

    // Deletes.

    pub(super) fn request_delete(&mut self, bulk: bool) {
        let opened = if bulk {
            self.screen.request_bulk_delete()
        } else {
            match self.current_id() {
                Some(id) => self.screen.request_delete(&id),
                None => false,
            }
        };
        if !opened {
            if self.screen.spec().read_only {
                self.notify_err(format!("{} is read-only", self.screen.spec().title));
            } else if bulk {
                self.notify_err("select rows first (space)");
            }
            return;
        }
        let scope = if bulk {
            DeleteScope::Bulk
        } else {
            DeleteScope::Single
        };
        self.modal = Some(Modal::Delete(scope));
    }

    /// Runs the delete only when the typed phrase matches; otherwise nothing happens.
    pub(super) fn confirm_delete(&mut self, scope: DeleteScope) {
        let store = self.store();
        match self.screen.confirm_delete(scope, store.as_deref()) {
            None => {
                if store.is_none() {
                    self.notify_err("not signed in; delete skipped");
                }
            }
            Some(Ok(affected)) => {
                self.modal = None;
                self.notify(format!("deleted {}", affected.len()));
                self.sync_filter_input();
                self.clamp_cursor();
            }
            Some(Err(err)) => self.notify_err(err.to_string()),
        }
    }

    pub(super) fn cancel_delete(&mut self, scope: DeleteScope) {
        self.screen.cancel_delete(scope);
        self.modal = None;
    }

    // Viewers.

    pub(super) fn show_detail(&mut self) {
        let Some(rec) = self.current_record() else {
            return;
        };
        let spec = self.screen.spec();
        let mut lines = vec![
            format!("id: {}", rec.id),
            format!("created: {}", fmt_ts_ui(&rec.created_at)),
        ];
        for f in spec.status_fields() {
            lines.push(format!("{}: {}", f.label, f.resolve(&rec)));
        }
        for field in spec.detail_fields {
            if let Some(v) = rec.text(field) {
                lines.push(format!("{}: {}", field, v));
            }
        }
        let title = rec
            .text(spec.headline_field)
            .unwrap_or_else(|| rec.id.clone());
        self.modal = Some(Modal::Viewer {
            title,
            lines,
            scroll: 0,
        });
    }

    pub(super) fn show_help(&mut self) {
        let lines = [
            "tab / shift-tab   switch entity",
            "up / down         move",
            "space             select row",
            "a                 select all visible (again to clear)",
            "/                 filter (esc clears)",
            "f                 cycle facet",
            "s / S             change status of row / selection",
            "w                 switch workflow (websites)",
            "d / D             delete row / selection",
            "enter             details",
            "r                 reload",
            "q                 quit",
        ];
        self.modal = Some(Modal::Viewer {
            title: "Keys".to_string(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
            scroll: 0,
        });
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
