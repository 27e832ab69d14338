//! Row-level authorization. Clients never decide visibility; every rule lives here.

use studio::model::{EntityKind, EntitySpec};

use super::*;

/// Server-maintained columns that request bodies may not set.
pub(super) const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "owner_id"];

pub(super) fn served_collections() -> impl Iterator<Item = &'static EntitySpec> {
    EntityKind::ALL
        .into_iter()
        .map(EntityKind::spec)
        .filter(|s| !s.read_only)
}

pub(super) fn collection_spec(name: &str) -> Option<&'static EntitySpec> {
    served_collections().find(|s| s.collection == name)
}

fn owner_of(row: &Record) -> Option<&str> {
    row.get("owner_id").and_then(Value::as_str)
}

pub(super) fn can_read(caller: &Caller, row: &Record) -> bool {
    match caller {
        Caller::User(s) if s.admin => true,
        Caller::User(s) => owner_of(row) == Some(s.user_id.as_str()),
        Caller::Anonymous => row.get("published").and_then(Value::as_bool) == Some(true),
    }
}

pub(super) fn can_modify(caller: &Caller, row: &Record) -> bool {
    match caller {
        Caller::User(s) if s.admin => true,
        Caller::User(s) => owner_of(row) == Some(s.user_id.as_str()),
        Caller::Anonymous => false,
    }
}

pub(super) fn can_insert(caller: &Caller, spec: &EntitySpec) -> bool {
    match caller {
        Caller::User(_) => true,
        Caller::Anonymous => spec.form.is_some_and(|f| f.public),
    }
}

/// Resolves the optional bearer token into a `Caller`. No header means anonymous; a header
/// that does not name a live token is rejected.
pub(super) async fn identify_caller(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let caller = match req.headers().get(header::AUTHORIZATION) {
        None => Caller::Anonymous,
        Some(value) => {
            let Ok(value) = value.to_str() else {
                return unauthorized();
            };
            let Some(token) = value.strip_prefix("Bearer ") else {
                return unauthorized();
            };
            match resolve_token(&state, token).await {
                Some(subject) => Caller::User(subject),
                None => return unauthorized(),
            }
        }
    };

    let mut req = req;
    req.extensions_mut().insert(caller);
    next.run(req).await
}

async fn resolve_token(state: &AppState, token: &str) -> Option<Subject> {
    let token_hash = hash_token(token);
    let token_id = {
        let idx = state.token_hash_index.read().await;
        idx.get(&token_hash).cloned()?
    };

    let user_id = {
        let mut tokens = state.tokens.write().await;
        let t = tokens.get_mut(&token_id)?;
        // In-memory only.
        t.last_used_at = Some(studio::model::now_ts());
        t.user_id.clone()
    };

    let users = state.users.read().await;
    let u = users.get(&user_id)?;
    Some(Subject {
        user_id: u.id.clone(),
        handle: u.handle.clone(),
        admin: u.admin,
    })
}
