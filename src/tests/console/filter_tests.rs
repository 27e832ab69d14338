use super::*;
use crate::model::{FEEDBACK, REQUIREMENTS, Record};

fn req(id: &str, ts: &str, name: &str, status: &str) -> Record {
    Record::new(id, ts)
        .with_field("name", name)
        .with_field("email", format!("{}@example.com", name.to_lowercase()))
        .with_field("status", status)
}

fn sample() -> Vec<Record> {
    vec![
        req("r3", "2026-03-03T00:00:00Z", "Ada", "pending"),
        req("r2", "2026-03-02T00:00:00Z", "Grace", "approved"),
        req("r1", "2026-03-01T00:00:00Z", "Linus", "pending"),
    ]
}

fn ids(rows: &[&Record]) -> Vec<String> {
    rows.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn empty_criteria_returns_everything_in_order() {
    let rows = sample();
    let out = visible(&rows, &FilterCriteria::default(), &REQUIREMENTS);
    assert_eq!(ids(&out), vec!["r3", "r2", "r1"]);
}

#[test]
fn facet_keeps_matching_rows_in_original_order() {
    let rows = sample();
    let criteria = FilterCriteria {
        query: String::new(),
        facet: Facet::Only("pending".to_string()),
    };
    let out = visible(&rows, &criteria, &REQUIREMENTS);
    assert_eq!(ids(&out), vec!["r3", "r1"]);
}

#[test]
fn query_is_case_insensitive_substring_over_configured_fields() {
    let rows = sample();
    let criteria = FilterCriteria {
        query: "GRACE@".to_string(),
        facet: Facet::All,
    };
    assert_eq!(ids(&visible(&rows, &criteria, &REQUIREMENTS)), vec!["r2"]);
}

#[test]
fn query_ignores_fields_outside_the_search_list() {
    let rows =
        vec![req("r1", "2026-03-01T00:00:00Z", "Ada", "pending").with_field("secret", "needle")];
    let criteria = FilterCriteria {
        query: "needle".to_string(),
        facet: Facet::All,
    };
    assert!(visible(&rows, &criteria, &REQUIREMENTS).is_empty());
}

#[test]
fn query_and_facet_combine() {
    let rows = sample();
    let criteria = FilterCriteria {
        query: "a".to_string(),
        facet: Facet::Only("pending".to_string()),
    };
    // Linus matches through the example.com email; Grace is approved.
    assert_eq!(ids(&visible(&rows, &criteria, &REQUIREMENTS)), vec!["r3", "r1"]);
}

#[test]
fn unknown_status_is_filtered_as_the_default() {
    let rows = vec![req("r1", "2026-03-01T00:00:00Z", "Ada", "exploded")];
    let criteria = FilterCriteria {
        query: String::new(),
        facet: Facet::Only("pending".to_string()),
    };
    assert_eq!(ids(&visible(&rows, &criteria, &REQUIREMENTS)), vec!["r1"]);
}

#[test]
fn category_facet_applies_to_feedback() {
    let rows = vec![
        Record::new("f2", "2026-03-02T00:00:00Z").with_field("category", "bug"),
        Record::new("f1", "2026-03-01T00:00:00Z").with_field("category", "praise"),
    ];
    let criteria = FilterCriteria {
        query: String::new(),
        facet: Facet::parse("praise"),
    };
    assert_eq!(ids(&visible(&rows, &criteria, &FEEDBACK)), vec!["f1"]);
}

#[test]
fn visible_is_always_an_ordered_subsequence() {
    let rows = sample();
    for q in ["", "a", "e", "zzz", "@", "LIN"] {
        let criteria = FilterCriteria {
            query: q.to_string(),
            facet: Facet::All,
        };
        let out = visible(&rows, &criteria, &REQUIREMENTS);
        let mut pos = 0;
        for r in &out {
            let idx = rows[pos..]
                .iter()
                .position(|x| x.id == r.id)
                .map(|i| i + pos);
            assert!(idx.is_some(), "query {:?} reordered rows", q);
            pos = idx.unwrap_or(0) + 1;
            assert!(matches_query(r, &q.to_lowercase(), REQUIREMENTS.search_fields));
        }
    }
}

#[test]
fn facet_parse_treats_all_as_sentinel() {
    assert_eq!(Facet::parse("all"), Facet::All);
    assert_eq!(Facet::parse("ALL"), Facet::All);
    assert_eq!(Facet::parse(""), Facet::All);
    assert_eq!(Facet::parse("pending"), Facet::Only("pending".to_string()));
}
