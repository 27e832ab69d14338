use super::*;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub(super) async fn whoami(Extension(caller): Extension<Caller>) -> Json<serde_json::Value> {
    match caller.subject() {
        Some(s) => Json(serde_json::json!({
            "user_id": s.user_id,
            "handle": s.handle,
            "admin": s.admin,
        })),
        None => Json(serde_json::json!({
            "user_id": null,
            "handle": null,
            "admin": false,
        })),
    }
}

fn require_admin(caller: &Caller) -> Result<(), Response> {
    match caller {
        Caller::Anonymous => Err(unauthorized()),
        Caller::User(s) if !s.admin => Err(forbidden()),
        Caller::User(_) => Ok(()),
    }
}

pub(super) async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<User>>, Response> {
    require_admin(&caller)?;
    let users = state.users.read().await;
    let mut out: Vec<User> = users.values().cloned().collect();
    out.sort_by(|a, b| a.handle.cmp(&b.handle));
    Ok(Json(out))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn user_matches(u: &User, needle: &str) -> bool {
    [
        Some(u.handle.as_str()),
        u.display_name.as_deref(),
        u.email.as_deref(),
        Some(u.id.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|s| s.to_lowercase().contains(needle))
}

pub(super) async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, Response> {
    require_admin(&caller)?;
    let needle = q.q.trim().to_lowercase();
    let users = state.users.read().await;
    let mut out: Vec<User> = users
        .values()
        .filter(|u| user_matches(u, &needle))
        .cloned()
        .collect();
    out.sort_by(|a, b| a.handle.cmp(&b.handle));
    Ok(Json(out))
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct CreateUserRequest {
    handle: String,

    #[serde(default)]
    display_name: Option<String>,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    admin: bool,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct CreateUserResponse {
    user: User,
    token: String,
}

pub(super) async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, Response> {
    require_admin(&caller)?;
    validate_user_handle(&payload.handle).map_err(bad_request)?;

    let created_at = studio::model::now_ts();
    let user_id = random_hex(16).map_err(internal_error)?;
    let user = User {
        id: user_id.clone(),
        handle: payload.handle.clone(),
        display_name: payload.display_name,
        email: payload.email,
        admin: payload.admin,
        created_at: created_at.clone(),
    };
    let secret = generate_token_secret().map_err(internal_error)?;
    let token = issue_token(&user_id, &secret, "created", created_at);

    {
        let mut users = state.users.write().await;
        if users.values().any(|u| u.handle == payload.handle) {
            return Err(conflict("user handle already exists"));
        }
        let mut tokens = state.tokens.write().await;

        let mut next_users = users.clone();
        let mut next_tokens = tokens.clone();
        next_users.insert(user_id.clone(), user.clone());
        next_tokens.insert(token.id.clone(), token.clone());
        persist_identity_to_disk(&state.data_dir, &next_users, &next_tokens)
            .map_err(internal_error)?;
        *users = next_users;
        *tokens = next_tokens;
    }
    {
        let mut idx = state.token_hash_index.write().await;
        idx.insert(token.token_hash.clone(), token.id.clone());
    }

    tracing::info!(handle = %user.handle, admin = user.admin, "created user");
    Ok(Json(CreateUserResponse {
        user,
        token: secret,
    }))
}
