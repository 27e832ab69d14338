use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::FormatItem;

pub type RecordId = String;

/// One row of a remote collection.
///
/// `id` and `created_at` are present on every entity; everything else is entity specific and
/// kept as raw JSON so the same loader, filter and gateway serve every screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub created_at: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// Text view of a field for searching and display. `id` and `created_at` resolve to the
    /// fixed attributes; nulls, arrays and objects have no text.
    pub fn text(&self, field: &str) -> Option<String> {
        match field {
            "id" => return Some(self.id.clone()),
            "created_at" => return Some(self.created_at.clone()),
            _ => {}
        }
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Stable sort, newest first. RFC 3339 UTC timestamps order lexically.
pub fn sort_by_recency(records: &mut [Record]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn ts_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z",
        )
        .unwrap_or_default()
    })
}

/// RFC 3339 UTC with fixed microsecond precision, so stamps order lexically.
pub fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(ts_format())
        .unwrap_or_else(|_| "<time>".to_string())
}
