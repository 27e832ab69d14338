use crate::model::{Record, StatusField, StatusKind};

/// Per-status record counts in declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub field: &'static str,
    pub total: usize,
    pub by_status: Vec<(&'static str, usize)>,
}

impl StatusCounts {
    pub fn get(&self, status: &str) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Lifecycle of one status field. Any state may move to any other; the workflow only decides
/// which moves are offered.
#[derive(Clone, Copy, Debug)]
pub struct StatusWorkflow<'a> {
    field: &'a StatusField,
}

impl<'a> StatusWorkflow<'a> {
    pub fn new(field: &'a StatusField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &'a StatusField {
        self.field
    }

    pub fn statuses(&self) -> Vec<&'static str> {
        self.field.values()
    }

    pub fn current(&self, record: &Record) -> &'static str {
        self.field.resolve(record)
    }

    /// Transitions offered from `current`: every other declared status. A flag is a plain
    /// toggle, which is the same rule with two values.
    pub fn transitions_from(&self, current: &str) -> Vec<&'static str> {
        match self.field.kind {
            StatusKind::Flag { on, off } => {
                if current == on {
                    vec![off]
                } else {
                    vec![on]
                }
            }
            StatusKind::Enum { values, .. } => {
                values.iter().copied().filter(|v| *v != current).collect()
            }
        }
    }

    pub fn transitions_for(&self, record: &Record) -> Vec<&'static str> {
        self.transitions_from(self.current(record))
    }

    pub fn counts<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> StatusCounts {
        let mut by_status: Vec<(&'static str, usize)> =
            self.statuses().into_iter().map(|s| (s, 0)).collect();
        let mut total = 0;
        for r in records {
            total += 1;
            let s = self.field.resolve(r);
            if let Some(slot) = by_status.iter_mut().find(|(k, _)| *k == s) {
                slot.1 += 1;
            }
        }
        StatusCounts {
            field: self.field.field,
            total,
            by_status,
        }
    }
}

#[cfg(test)]
#[path = "../tests/console/workflow_tests.rs"]
mod tests;
