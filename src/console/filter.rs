use crate::model::{EntitySpec, Record};

/// Facet value; `All` is the "no restriction" sentinel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Facet::All
        } else {
            Facet::Only(s.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Facet::All => "all",
            Facet::Only(v) => v,
        }
    }
}

/// Free-text query plus facet. Transient UI state, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub facet: Facet,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.facet == Facet::All
    }
}

/// Rows of `records` that match `criteria`, in input order.
///
/// A row matches the query when the query is blank or occurs (case-insensitively) in at least
/// one of the entity's search fields. A facet other than `All` additionally requires the
/// row's resolved facet value to equal it exactly.
pub fn visible<'a>(
    records: &'a [Record],
    criteria: &FilterCriteria,
    spec: &EntitySpec,
) -> Vec<&'a Record> {
    let query = criteria.query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| matches_query(r, &query, spec.search_fields))
        .filter(|r| matches_facet(r, &criteria.facet, spec))
        .collect()
}

/// `query` must already be lowercased.
pub fn matches_query(record: &Record, query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    fields.iter().any(|f| {
        record
            .text(f)
            .is_some_and(|t| t.to_lowercase().contains(query))
    })
}

fn matches_facet(record: &Record, facet: &Facet, spec: &EntitySpec) -> bool {
    let Facet::Only(want) = facet else {
        return true;
    };
    match &spec.facet {
        Some(field) => field.resolve(record) == want,
        None => true,
    }
}

#[cfg(test)]
#[path = "../tests/console/filter_tests.rs"]
mod tests;
