use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{Record, RecordId};
use crate::remote::CollectionStore;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No client yet; nothing has been requested.
    NotLoaded,
    Loading,
    Loaded,
    /// The newest load failed; the previous rows are kept.
    Failed(String),
}

/// Identifies one initiated load. Only the ticket from the most recent `begin` on the same
/// loader instance can apply its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    instance: u64,
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No client handle; no request was issued.
    NotReady,
    Applied(usize),
    /// A newer load was started (or the loader was unmounted); the result was dropped.
    Stale,
}

/// Owns the cached rows of one collection for one screen.
#[derive(Debug)]
pub struct CollectionLoader {
    collection: &'static str,
    instance: u64,
    generation: u64,
    mounted: bool,
    state: LoadState,
    records: Vec<Record>,
}

impl CollectionLoader {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            mounted: true,
            state: LoadState::NotLoaded,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Starts a load; any earlier ticket becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            instance: self.instance,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.instance == self.instance && ticket.generation == self.generation
    }

    /// Applies the result of `ticket`'s load. Results of superseded loads are discarded
    /// whether they succeeded or not. A failed current load keeps the previous rows.
    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: ConsoleResult<Vec<Record>>,
    ) -> ConsoleResult<LoadOutcome> {
        if !self.is_current(ticket) {
            tracing::debug!(
                collection = self.collection,
                generation = ticket.generation,
                "discarding stale load"
            );
            return Ok(LoadOutcome::Stale);
        }
        match result {
            Ok(rows) => {
                let n = rows.len();
                self.records = rows;
                self.state = LoadState::Loaded;
                Ok(LoadOutcome::Applied(n))
            }
            Err(err) => {
                tracing::warn!(collection = self.collection, error = %err, "load failed");
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Loads synchronously through `store`. A missing handle is a no-op, not an error.
    pub fn load(&mut self, store: Option<&dyn CollectionStore>) -> ConsoleResult<LoadOutcome> {
        let Some(store) = store else {
            return Ok(LoadOutcome::NotReady);
        };
        let ticket = self.begin();
        let result = fetch(store, self.collection);
        self.finish(ticket, result)
    }

    /// After unmount every in-flight result is discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Drops rows locally after a confirmed delete.
    pub fn evict(&mut self, ids: &[RecordId]) {
        self.records.retain(|r| !ids.contains(&r.id));
    }

    /// Writes `value` into `field` of the given rows after a confirmed update.
    pub fn patch(&mut self, ids: &[RecordId], field: &str, value: &serde_json::Value) {
        for r in self.records.iter_mut().filter(|r| ids.contains(&r.id)) {
            r.set(field, value.clone());
        }
    }
}

/// One full fetch of `collection`, with the remote error mapped to [`ConsoleError::Fetch`].
/// Safe to run off the UI thread; pair it with a ticket from [`CollectionLoader::begin`].
pub fn fetch(store: &dyn CollectionStore, collection: &str) -> ConsoleResult<Vec<Record>> {
    store
        .select(collection)
        .map_err(|err| ConsoleError::fetch(collection, &err))
}

#[cfg(test)]
#[path = "../tests/console/loader_tests.rs"]
mod tests;
