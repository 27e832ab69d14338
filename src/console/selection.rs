use std::collections::{BTreeSet, HashSet};

use crate::model::RecordId;

/// Derived checkbox state for a header "select all" control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionFlags {
    pub all_selected: bool,
    pub partially_selected: bool,
}

/// Ids the operator has ticked.
///
/// The set does not purge ids that later fall out of view; flags are always derived against
/// the live visible list passed in by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn select_all_visible<I, S>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<RecordId>,
    {
        self.ids = visible_ids.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    /// Removes the given ids, e.g. after they were deleted or changed.
    pub fn evict(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn is_all_selected(&self, visible_ids: &[RecordId]) -> bool {
        if visible_ids.is_empty() {
            return false;
        }
        let visible: HashSet<&str> = visible_ids.iter().map(String::as_str).collect();
        self.ids.len() == visible.len() && visible.iter().all(|id| self.ids.contains(*id))
    }

    pub fn is_indeterminate(&self, visible_ids: &[RecordId]) -> bool {
        !self.ids.is_empty() && !self.is_all_selected(visible_ids)
    }

    pub fn flags(&self, visible_ids: &[RecordId]) -> SelectionFlags {
        SelectionFlags {
            all_selected: self.is_all_selected(visible_ids),
            partially_selected: self.is_indeterminate(visible_ids),
        }
    }

    /// Selected ids that are currently visible, in visible order.
    pub fn visible_selected(&self, visible_ids: &[RecordId]) -> Vec<RecordId> {
        visible_ids
            .iter()
            .filter(|id| self.ids.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/console/selection_tests.rs"]
mod tests;
