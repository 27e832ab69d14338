use serde_json::{Map, Value};

use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{EntityKind, EntitySpec, Reconcile, Record, RecordId};
use crate::remote::CollectionStore;

use super::{
    Affected, CollectionLoader, ConfirmationGate, Facet, FilterCriteria, LoadOutcome, LoadState,
    LoadTicket, MutationGateway, SelectionFlags, SelectionSet, StatusCounts, StatusWorkflow,
    Targets, fetch, visible,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteScope {
    Single,
    Bulk,
}

enum Change<'a> {
    Removed,
    Fields(&'a Map<String, Value>),
}

/// State of one entity screen: the cached collection, filter criteria, selection, and the two
/// delete gates, driven by the entity's row in the declarative table.
///
/// Every store argument is optional: with no client handle, loads and mutations are no-ops.
#[derive(Debug)]
pub struct CollectionScreen {
    spec: &'static EntitySpec,
    loader: CollectionLoader,
    criteria: FilterCriteria,
    selection: SelectionSet,
    single_delete: ConfirmationGate,
    bulk_delete: ConfirmationGate,
    last_error: Option<String>,
}

impl CollectionScreen {
    pub fn new(kind: EntityKind) -> Self {
        Self::for_spec(kind.spec())
    }

    pub fn for_spec(spec: &'static EntitySpec) -> Self {
        Self {
            spec,
            loader: CollectionLoader::new(spec.collection),
            criteria: FilterCriteria::default(),
            selection: SelectionSet::new(),
            single_delete: ConfirmationGate::new(),
            bulk_delete: ConfirmationGate::new(),
            last_error: None,
        }
    }

    pub fn spec(&self) -> &'static EntitySpec {
        self.spec
    }

    pub fn kind(&self) -> EntityKind {
        self.spec.kind
    }

    pub fn records(&self) -> &[Record] {
        self.loader.records()
    }

    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // Loading.

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loader.begin()
    }

    /// Applies a load result. A full replacement resets filter criteria, selection and any
    /// open delete dialog so nothing refers to ids from the previous collection.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: ConsoleResult<Vec<Record>>,
    ) -> ConsoleResult<LoadOutcome> {
        let out = self.loader.finish(ticket, result);
        match &out {
            Ok(LoadOutcome::Applied(_)) => self.reset_view(),
            Ok(_) => {}
            Err(err) => self.last_error = Some(err.to_string()),
        }
        out
    }

    fn reset_view(&mut self) {
        self.criteria = FilterCriteria::default();
        self.selection.clear();
        self.single_delete.cancel();
        self.bulk_delete.cancel();
        self.last_error = None;
    }

    /// Full synchronous refetch.
    pub fn refresh(&mut self, store: Option<&dyn CollectionStore>) -> ConsoleResult<LoadOutcome> {
        let Some(store) = store else {
            return Ok(LoadOutcome::NotReady);
        };
        let ticket = self.begin_load();
        let result = fetch(store, self.spec.collection);
        self.apply_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.loader.unmount();
    }

    // Filtering.

    pub fn set_query(&mut self, query: &str) {
        self.criteria.query = query.to_string();
    }

    pub fn set_facet(&mut self, facet: Facet) {
        self.criteria.facet = facet;
    }

    /// `all -> first value -> ... -> last value -> all`.
    pub fn cycle_facet(&mut self) {
        let Some(field) = &self.spec.facet else {
            return;
        };
        let values = field.values();
        let next = match &self.criteria.facet {
            Facet::All => values.first().copied(),
            Facet::Only(cur) => values
                .iter()
                .position(|v| v == cur)
                .and_then(|i| values.get(i + 1).copied()),
        };
        self.criteria.facet = match next {
            Some(v) => Facet::Only(v.to_string()),
            None => Facet::All,
        };
    }

    pub fn visible(&self) -> Vec<&Record> {
        visible(self.loader.records(), &self.criteria, self.spec)
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible().into_iter().map(|r| r.id.clone()).collect()
    }

    // Selection.

    /// Toggles `id` if it is visible. Returns false (and changes nothing) otherwise.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.visible().iter().any(|r| r.id == id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    pub fn select_all_visible(&mut self) {
        let ids = self.visible_ids();
        self.selection.select_all_visible(ids);
    }

    /// Header checkbox: clears when everything visible is selected, selects all otherwise.
    pub fn toggle_all(&mut self) {
        if self.selection_flags().all_selected {
            self.selection.clear();
        } else {
            self.select_all_visible();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_flags(&self) -> SelectionFlags {
        self.selection.flags(&self.visible_ids())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids that are visible right now; bulk actions act on exactly these.
    pub fn selected_visible(&self) -> Vec<RecordId> {
        self.selection.visible_selected(&self.visible_ids())
    }

    // Workflow.

    /// The named workflow, or the entity's primary one.
    pub fn workflow(&self, field: Option<&str>) -> Option<StatusWorkflow<'static>> {
        let spec: &'static EntitySpec = self.spec;
        let f = match field {
            Some(name) => spec.workflow(name)?,
            None => spec.primary_workflow()?,
        };
        Some(StatusWorkflow::new(f))
    }

    /// Counts over the whole collection (not just the visible rows).
    pub fn stats(&self, field: Option<&str>) -> Option<StatusCounts> {
        let wf = self.workflow(field)?;
        Some(wf.counts(self.loader.records()))
    }

    pub fn transitions(&self, id: &str, field: Option<&str>) -> Vec<&'static str> {
        let Some(wf) = self.workflow(field) else {
            return Vec::new();
        };
        self.loader
            .records()
            .iter()
            .find(|r| r.id == id)
            .map(|r| wf.transitions_for(r))
            .unwrap_or_default()
    }

    // Mutations.

    pub fn set_status(
        &mut self,
        store: Option<&dyn CollectionStore>,
        field: Option<&str>,
        targets: &Targets,
        status: &str,
    ) -> ConsoleResult<Affected> {
        let Some(store) = store else {
            tracing::debug!("set status without a client; skipped");
            return Ok(Affected::default());
        };
        let Some(wf) = self.workflow(field) else {
            return Err(ConsoleError::InvalidStatus {
                field: field.unwrap_or("status").to_string(),
                value: status.to_string(),
                expected: "(entity has no status workflow)".to_string(),
            });
        };
        let status_field = wf.field();
        let gateway = MutationGateway::new(store, self.spec);
        let affected = self.remember(gateway.update_status(status_field, targets, status))?;

        let mut fields = Map::new();
        if let Some(v) = status_field.encode(status) {
            fields.insert(status_field.field.to_string(), v);
        }
        self.reconcile(store, Change::Fields(&fields), &affected);
        Ok(affected)
    }

    /// Moves every selected visible row to `status` in one request.
    pub fn bulk_set_status(
        &mut self,
        store: Option<&dyn CollectionStore>,
        field: Option<&str>,
        status: &str,
    ) -> ConsoleResult<Affected> {
        let targets = Targets::many(self.selected_visible())?;
        self.set_status(store, field, &targets, status)
    }

    pub fn update_fields(
        &mut self,
        store: Option<&dyn CollectionStore>,
        targets: &Targets,
        fields: &Map<String, Value>,
    ) -> ConsoleResult<Affected> {
        let Some(store) = store else {
            return Ok(Affected::default());
        };
        let gateway = MutationGateway::new(store, self.spec);
        let affected = self.remember(gateway.update_fields(targets, fields))?;
        self.reconcile(store, Change::Fields(fields), &affected);
        Ok(affected)
    }

    // Delete gates.

    /// Opens the single-row gate for a visible row.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.spec.read_only || !self.visible().iter().any(|r| r.id == id) {
            return false;
        }
        self.single_delete
            .open(self.spec.single_delete_phrase, vec![id.to_string()]);
        true
    }

    /// Opens the bulk gate for the selected visible rows. Nothing to delete, nothing opened.
    pub fn request_bulk_delete(&mut self) -> bool {
        let ids = self.selected_visible();
        if self.spec.read_only || ids.is_empty() {
            return false;
        }
        self.bulk_delete.open(self.spec.bulk_delete_phrase, ids);
        true
    }

    pub fn gate(&self, scope: DeleteScope) -> &ConfirmationGate {
        match scope {
            DeleteScope::Single => &self.single_delete,
            DeleteScope::Bulk => &self.bulk_delete,
        }
    }

    pub fn gate_mut(&mut self, scope: DeleteScope) -> &mut ConfirmationGate {
        match scope {
            DeleteScope::Single => &mut self.single_delete,
            DeleteScope::Bulk => &mut self.bulk_delete,
        }
    }

    /// The open gate, single first.
    pub fn open_gate(&self) -> Option<DeleteScope> {
        if self.single_delete.is_open() {
            Some(DeleteScope::Single)
        } else if self.bulk_delete.is_open() {
            Some(DeleteScope::Bulk)
        } else {
            None
        }
    }

    pub fn cancel_delete(&mut self, scope: DeleteScope) {
        self.gate_mut(scope).cancel();
    }

    /// Confirms the gate for `scope`. `None` when the phrase does not match or there is no
    /// client; in both cases the store is not called and the dialog stays as it was.
    pub fn confirm_delete(
        &mut self,
        scope: DeleteScope,
        store: Option<&dyn CollectionStore>,
    ) -> Option<ConsoleResult<Affected>> {
        let store = store?;
        let spec = self.spec;
        let result = self.gate_mut(scope).confirm(|ids| {
            let targets = Targets::many(ids.iter().cloned())?;
            MutationGateway::new(store, spec).remove(&targets)
        })?;
        match &result {
            Ok(affected) => {
                self.last_error = None;
                self.reconcile(store, Change::Removed, affected);
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
        Some(result)
    }

    fn remember(&mut self, result: ConsoleResult<Affected>) -> ConsoleResult<Affected> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }

    /// Local patch/evict for the affected ids, then a refetch for entities whose screen shows
    /// aggregates. A refetch replaces the collection, so it resets the view like any full load.
    fn reconcile(&mut self, store: &dyn CollectionStore, change: Change<'_>, affected: &Affected) {
        let ids = affected.ids();
        match change {
            Change::Removed => self.loader.evict(ids),
            Change::Fields(fields) => {
                for (k, v) in fields {
                    self.loader.patch(ids, k, v);
                }
            }
        }
        self.selection.evict(ids);

        if self.spec.reconcile != Reconcile::Reload {
            return;
        }
        let ticket = self.loader.begin();
        let result = fetch(store, self.spec.collection);
        match self.loader.finish(ticket, result) {
            Ok(LoadOutcome::Applied(_)) => self.reset_view(),
            Ok(_) => {}
            Err(err) => self.last_error = Some(format!("refresh after change: {}", err)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/console/screen_tests.rs"]
mod tests;
