use super::*;

#[derive(Debug, serde::Deserialize)]
pub(super) struct ListQuery {
    #[serde(default)]
    order: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct UpdateRequest {
    ids: Vec<String>,
    fields: Map<String, Value>,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct DeleteRequest {
    ids: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct AffectedResponse {
    affected: Vec<String>,
}

fn reject_reserved(fields: &Map<String, Value>) -> Result<(), Response> {
    if let Some(key) = RESERVED_FIELDS.iter().find(|k| fields.contains_key(**k)) {
        return Err(bad_request(anyhow::anyhow!("{} is assigned by the store", key)));
    }
    Ok(())
}

pub(super) async fn list_rows(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Record>>, Response> {
    let Some(spec) = collection_spec(&name) else {
        return Err(not_found());
    };
    let ascending = match q.order.as_deref() {
        None | Some("created_at.desc") => false,
        Some("created_at.asc") => true,
        Some(other) => {
            return Err(bad_request(anyhow::anyhow!("unsupported order {:?}", other)));
        }
    };

    let tables = state.tables.read().await;
    let mut rows: Vec<Record> = tables
        .get(spec.collection)
        .map(|rows| rows.iter().filter(|r| can_read(&caller, r)).cloned().collect())
        .unwrap_or_default();
    studio::model::sort_by_recency(&mut rows);
    if ascending {
        rows.reverse();
    }
    Ok(Json(rows))
}

pub(super) async fn insert_row(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Record>, Response> {
    let Some(spec) = collection_spec(&name) else {
        return Err(not_found());
    };
    if !can_insert(&caller, spec) {
        return Err(match caller {
            Caller::Anonymous => unauthorized(),
            Caller::User(_) => forbidden(),
        });
    }
    reject_reserved(&fields)?;

    let id = random_hex(16).map_err(internal_error)?;
    let mut row = Record::new(id, studio::model::now_ts());
    row.fields = fields;
    if let Some(subject) = caller.subject() {
        row.set("owner_id", Value::String(subject.user_id.clone()));
    }

    let mut tables = state.tables.write().await;
    let rows = tables.entry(spec.collection.to_string()).or_default();
    let mut next = rows.clone();
    next.insert(0, row.clone());
    persist_table(&state.data_dir, spec.collection, &next).map_err(internal_error)?;
    *rows = next;

    tracing::info!(collection = spec.collection, id = %row.id, "inserted row");
    Ok(Json(row))
}

/// Applies `fields` to every listed row the caller may modify. Rows the caller cannot see
/// or modify are skipped, not reported.
pub(super) async fn update_rows(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<AffectedResponse>, Response> {
    let Some(spec) = collection_spec(&name) else {
        return Err(not_found());
    };
    if matches!(caller, Caller::Anonymous) {
        return Err(unauthorized());
    }
    if payload.fields.is_empty() {
        return Err(bad_request(anyhow::anyhow!("fields cannot be empty")));
    }
    reject_reserved(&payload.fields)?;

    let mut tables = state.tables.write().await;
    let rows = tables.entry(spec.collection.to_string()).or_default();
    let mut next = rows.clone();
    let mut affected = Vec::new();
    for row in next.iter_mut() {
        if !payload.ids.contains(&row.id) || !can_modify(&caller, row) {
            continue;
        }
        for (k, v) in &payload.fields {
            row.set(k, v.clone());
        }
        affected.push(row.id.clone());
    }

    if !affected.is_empty() {
        persist_table(&state.data_dir, spec.collection, &next).map_err(internal_error)?;
        *rows = next;
    }

    tracing::info!(
        collection = spec.collection,
        requested = payload.ids.len(),
        affected = affected.len(),
        "updated rows"
    );
    Ok(Json(AffectedResponse { affected }))
}

pub(super) async fn delete_rows(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(name): Path<String>,
    Json(payload): Json<DeleteRequest>,
) -> Result<Json<AffectedResponse>, Response> {
    let Some(spec) = collection_spec(&name) else {
        return Err(not_found());
    };
    if matches!(caller, Caller::Anonymous) {
        return Err(unauthorized());
    }

    let mut tables = state.tables.write().await;
    let rows = tables.entry(spec.collection.to_string()).or_default();
    let mut affected = Vec::new();
    let next: Vec<Record> = rows
        .iter()
        .filter(|row| {
            let doomed = payload.ids.contains(&row.id) && can_modify(&caller, row);
            if doomed {
                affected.push(row.id.clone());
            }
            !doomed
        })
        .cloned()
        .collect();

    if !affected.is_empty() {
        persist_table(&state.data_dir, spec.collection, &next).map_err(internal_error)?;
        *rows = next;
    }

    tracing::info!(
        collection = spec.collection,
        requested = payload.ids.len(),
        affected = affected.len(),
        "deleted rows"
    );
    Ok(Json(AffectedResponse { affected }))
}
