use serde_json::{Map, Value};

use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{EntitySpec, RecordId, StatusField};
use crate::remote::CollectionStore;

/// One id or a non-empty list of ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Targets(Vec<RecordId>);

impl Targets {
    pub fn one(id: impl Into<RecordId>) -> Self {
        Targets(vec![id.into()])
    }

    /// Fails with [`ConsoleError::EmptyTargets`] for an empty list. Duplicates are dropped.
    pub fn many<I, S>(ids: I) -> ConsoleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<RecordId>,
    {
        let mut out: Vec<RecordId> = Vec::new();
        for id in ids {
            let id = id.into();
            if !out.contains(&id) {
                out.push(id);
            }
        }
        if out.is_empty() {
            return Err(ConsoleError::EmptyTargets);
        }
        Ok(Targets(out))
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<RecordId> for Targets {
    fn from(id: RecordId) -> Self {
        Targets::one(id)
    }
}

impl From<&str> for Targets {
    fn from(id: &str) -> Self {
        Targets::one(id)
    }
}

/// Ids the store reported as changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affected(pub Vec<RecordId>);

impl Affected {
    pub fn ids(&self) -> &[RecordId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Issues exactly one remote call per mutation, scoped to the given ids. Never touches local
/// state: reconciling the collection and selection is the screen's job.
pub struct MutationGateway<'a> {
    store: &'a dyn CollectionStore,
    spec: &'static EntitySpec,
}

impl<'a> MutationGateway<'a> {
    pub fn new(store: &'a dyn CollectionStore, spec: &'static EntitySpec) -> Self {
        Self { store, spec }
    }

    pub fn update_status(
        &self,
        field: &StatusField,
        targets: &Targets,
        new_status: &str,
    ) -> ConsoleResult<Affected> {
        let Some(value) = field.encode(new_status) else {
            return Err(ConsoleError::InvalidStatus {
                field: field.field.to_string(),
                value: new_status.to_string(),
                expected: field.values().join(", "),
            });
        };
        let mut fields = Map::new();
        fields.insert(field.field.to_string(), value);
        self.run_update("update status", targets, &fields)
    }

    /// Patches arbitrary declared fields (record edit).
    pub fn update_fields(
        &self,
        targets: &Targets,
        fields: &Map<String, Value>,
    ) -> ConsoleResult<Affected> {
        self.run_update("update", targets, fields)
    }

    pub fn remove(&self, targets: &Targets) -> ConsoleResult<Affected> {
        self.ensure_writable()?;
        let collection = self.spec.collection;
        match self.store.delete(collection, targets.ids()) {
            Ok(ids) => {
                tracing::info!(collection, count = ids.len(), "removed records");
                Ok(Affected(ids))
            }
            Err(err) => {
                let err = ConsoleError::mutation(collection, "delete", &err);
                tracing::warn!(error = %err, "delete failed");
                Err(err)
            }
        }
    }

    fn run_update(
        &self,
        operation: &'static str,
        targets: &Targets,
        fields: &Map<String, Value>,
    ) -> ConsoleResult<Affected> {
        self.ensure_writable()?;
        if targets.is_empty() {
            return Err(ConsoleError::EmptyTargets);
        }
        let collection = self.spec.collection;
        match self.store.update(collection, targets.ids(), fields) {
            Ok(ids) => {
                tracing::info!(collection, count = ids.len(), operation, "updated records");
                Ok(Affected(ids))
            }
            Err(err) => {
                let err = ConsoleError::mutation(collection, operation, &err);
                tracing::warn!(error = %err, "update failed");
                Err(err)
            }
        }
    }

    fn ensure_writable(&self) -> ConsoleResult<()> {
        if self.spec.read_only {
            return Err(ConsoleError::ReadOnly(self.spec.title.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/console/gateway_tests.rs"]
mod tests;
