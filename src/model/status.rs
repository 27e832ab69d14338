use serde_json::Value;

use super::Record;

/// How a status-like field is stored on a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// A string drawn from a closed list.
    Enum {
        values: &'static [&'static str],
        default: &'static str,
    },
    /// A boolean shown as two labels (`on` when true).
    Flag {
        on: &'static str,
        off: &'static str,
    },
}

/// A closed enumeration attached to one record field: lifecycle status, development stage,
/// read flag, or a plain category used as a facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusField {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: StatusKind,
}

impl StatusField {
    pub const fn enumeration(
        field: &'static str,
        label: &'static str,
        values: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            field,
            label,
            kind: StatusKind::Enum { values, default },
        }
    }

    pub const fn flag(
        field: &'static str,
        label: &'static str,
        on: &'static str,
        off: &'static str,
    ) -> Self {
        Self {
            field,
            label,
            kind: StatusKind::Flag { on, off },
        }
    }

    /// Declared values in display order. Flags list the `off` label first.
    pub fn values(&self) -> Vec<&'static str> {
        match self.kind {
            StatusKind::Enum { values, .. } => values.to_vec(),
            StatusKind::Flag { on, off } => vec![off, on],
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self.kind {
            StatusKind::Enum { default, .. } => default,
            StatusKind::Flag { off, .. } => off,
        }
    }

    pub fn is_valid(&self, status: &str) -> bool {
        self.canonical(status).is_some()
    }

    /// Maps a label onto the declared `'static` value, if it is one.
    pub fn canonical(&self, status: &str) -> Option<&'static str> {
        self.values().into_iter().find(|v| *v == status)
    }

    /// The record's value for this field. Missing or undeclared values resolve to the default
    /// so rendering never depends on the remote store honoring the enumeration.
    pub fn resolve(&self, record: &Record) -> &'static str {
        match self.kind {
            StatusKind::Enum { default, .. } => record
                .get(self.field)
                .and_then(|v| v.as_str())
                .and_then(|s| self.canonical(s))
                .unwrap_or(default),
            StatusKind::Flag { on, off } => match record.get(self.field) {
                Some(Value::Bool(true)) => on,
                _ => off,
            },
        }
    }

    /// JSON value written to the store for `status`, or `None` when it is not declared.
    pub fn encode(&self, status: &str) -> Option<Value> {
        let status = self.canonical(status)?;
        Some(match self.kind {
            StatusKind::Enum { .. } => Value::String(status.to_string()),
            StatusKind::Flag { on, .. } => Value::Bool(status == on),
        })
    }

    pub fn default_json(&self) -> Value {
        match self.kind {
            StatusKind::Enum { default, .. } => Value::String(default.to_string()),
            StatusKind::Flag { .. } => Value::Bool(false),
        }
    }
}
