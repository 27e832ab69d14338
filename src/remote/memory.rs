//! In-process collection store: offline runs and tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::*;

/// Collections held in memory with the same contract as the HTTP store: `select` is newest
/// first, mutations report the ids that existed. Failure injection and call counters let
/// tests observe exactly what reached the store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Vec<Record>>>,
    fail: AtomicBool,
    seq: AtomicU64,
    selects: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(collection: &str, rows: Vec<Record>) -> Self {
        let store = Self::new();
        store.put(collection, rows);
        store
    }

    pub fn put(&self, collection: &str, rows: Vec<Record>) {
        let mut tables = self.lock();
        tables.insert(collection.to_string(), rows);
    }

    pub fn rows(&self, collection: &str) -> Vec<Record> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    /// While set, every call fails without touching the tables.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn select_calls(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Record>>> {
        // Poisoned tables stay readable.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, label: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("{}: store unavailable", label);
        }
        Ok(())
    }
}

impl CollectionStore for MemoryStore {
    fn select(&self, collection: &str) -> Result<Vec<Record>> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.check(&format!("select {}", collection))?;
        let mut rows = self.rows(collection);
        crate::model::sort_by_recency(&mut rows);
        Ok(rows)
    }

    fn update(
        &self,
        collection: &str,
        ids: &[RecordId],
        fields: &Map<String, Value>,
    ) -> Result<Vec<RecordId>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check(&format!("update {}", collection))?;
        let mut tables = self.lock();
        let Some(rows) = tables.get_mut(collection) else {
            return Ok(Vec::new());
        };
        let mut affected = Vec::new();
        for row in rows.iter_mut().filter(|r| ids.contains(&r.id)) {
            for (k, v) in fields {
                row.set(k, v.clone());
            }
            affected.push(row.id.clone());
        }
        Ok(affected)
    }

    fn delete(&self, collection: &str, ids: &[RecordId]) -> Result<Vec<RecordId>> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check(&format!("delete {}", collection))?;
        let mut tables = self.lock();
        let Some(rows) = tables.get_mut(collection) else {
            return Ok(Vec::new());
        };
        let affected: Vec<RecordId> = rows
            .iter()
            .filter(|r| ids.contains(&r.id))
            .map(|r| r.id.clone())
            .collect();
        rows.retain(|r| !ids.contains(&r.id));
        Ok(affected)
    }

    fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<Record> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check(&format!("insert {}", collection))?;
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut row = Record::new(format!("mem-{}", n), crate::model::now_ts());
        row.fields = fields;
        row.fields.remove("id");
        row.fields.remove("created_at");
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }
}
