//! Public submission forms and admin record creation/editing.

use serde_json::{Map, Value};

use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{EntityKind, FormSpec, Record};
use crate::remote::CollectionStore;

/// Parses `key=value` pairs from the command line.
pub fn parse_pairs(raw: &[String]) -> ConsoleResult<Vec<(String, String)>> {
    raw.iter()
        .map(|s| {
            let Some((k, v)) = s.split_once('=') else {
                return Err(ConsoleError::InvalidSubmission(format!(
                    "expected key=value, got {:?}",
                    s
                )));
            };
            Ok((k.trim().to_string(), v.to_string()))
        })
        .collect()
}

fn form_for(kind: EntityKind) -> ConsoleResult<&'static FormSpec> {
    kind.spec().form.as_ref().ok_or_else(|| {
        ConsoleError::InvalidSubmission(format!("{} does not accept submissions", kind))
    })
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

/// Turns a numeric-looking `rating` into a number; everything else stays text.
fn field_value(field: &str, raw: &str) -> Value {
    if field == "rating"
        && let Ok(n) = raw.trim().parse::<i64>()
    {
        return Value::from(n);
    }
    Value::String(raw.trim().to_string())
}

/// Validates a submission and returns the row fields to insert. Workflow fields cannot be
/// supplied; every one is stamped with its default. Facet-only fields (feedback `category`)
/// accept any declared value.
pub fn build_submission(
    kind: EntityKind,
    pairs: Vec<(String, String)>,
) -> ConsoleResult<Map<String, Value>> {
    let form = form_for(kind)?;
    let spec = kind.spec();
    let mut fields = Map::new();

    for (k, v) in pairs {
        if spec.workflow(&k).is_some() {
            return Err(ConsoleError::InvalidSubmission(format!(
                "{} is set by the review workflow, not the form",
                k
            )));
        }
        let status = spec.status_fields().into_iter().find(|f| f.field == k);
        if let Some(status) = status {
            let Some(value) = status.encode(v.trim()) else {
                return Err(ConsoleError::InvalidStatus {
                    field: k,
                    value: v,
                    expected: status.values().join(", "),
                });
            };
            fields.insert(k, value);
            continue;
        }
        if !form.accepts(&k) {
            return Err(ConsoleError::InvalidSubmission(format!(
                "unknown field {:?} for {}",
                k, kind
            )));
        }
        let value = field_value(&k, &v);
        fields.insert(k, value);
    }

    for req in form.required {
        let present = fields
            .get(*req)
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.trim().is_empty());
        if !present {
            return Err(ConsoleError::InvalidSubmission(format!(
                "{} is required",
                req
            )));
        }
    }

    if let Some(email_field) = form.email_field
        && let Some(email) = fields.get(email_field).and_then(|v| v.as_str())
        && !email.is_empty()
        && !looks_like_email(email)
    {
        return Err(ConsoleError::InvalidSubmission(format!(
            "{} is not an email address",
            email_field
        )));
    }

    for status in spec.status_fields() {
        fields
            .entry(status.field.to_string())
            .or_insert_with(|| status.default_json());
    }

    Ok(fields)
}

/// Validates and inserts one submission.
pub fn submit(
    store: &dyn CollectionStore,
    kind: EntityKind,
    pairs: Vec<(String, String)>,
) -> ConsoleResult<Record> {
    let fields = build_submission(kind, pairs)?;
    let collection = kind.spec().collection;
    match store.insert(collection, fields) {
        Ok(row) => {
            tracing::info!(collection, id = %row.id, "submitted record");
            Ok(row)
        }
        Err(err) => Err(ConsoleError::mutation(collection, "insert", &err)),
    }
}

/// Validates a partial edit: only declared fields, status values from their enumeration.
pub fn build_edit(
    kind: EntityKind,
    pairs: Vec<(String, String)>,
) -> ConsoleResult<Map<String, Value>> {
    let form = form_for(kind)?;
    let spec = kind.spec();
    if pairs.is_empty() {
        return Err(ConsoleError::InvalidSubmission("nothing to change".to_string()));
    }
    let mut fields = Map::new();
    for (k, v) in pairs {
        if let Some(status) = spec.status_fields().into_iter().find(|f| f.field == k) {
            let value = status.encode(v.trim()).ok_or_else(|| ConsoleError::InvalidStatus {
                field: k.clone(),
                value: v.clone(),
                expected: status.values().join(", "),
            })?;
            fields.insert(k, value);
            continue;
        }
        if !form.accepts(&k) {
            return Err(ConsoleError::InvalidSubmission(format!(
                "unknown field {:?} for {}",
                k, kind
            )));
        }
        if form.required.contains(&k.as_str()) && v.trim().is_empty() {
            return Err(ConsoleError::InvalidSubmission(format!("{} cannot be blank", k)));
        }
        let value = field_value(&k, &v);
        fields.insert(k, value);
    }
    Ok(fields)
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
