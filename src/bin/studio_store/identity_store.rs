use super::*;

pub(super) fn hash_token(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

fn users_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("users.json")
}

fn tokens_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("tokens.json")
}

pub(super) fn load_identity_from_disk(
    data_dir: &std::path::Path,
) -> Result<(HashMap<String, User>, HashMap<String, AccessToken>)> {
    let users: HashMap<String, User> = if users_path(data_dir).exists() {
        let bytes = std::fs::read(users_path(data_dir)).context("read users.json")?;
        let list: Vec<User> = serde_json::from_slice(&bytes).context("parse users.json")?;
        list.into_iter().map(|u| (u.id.clone(), u)).collect()
    } else {
        HashMap::new()
    };

    let tokens: HashMap<String, AccessToken> = if tokens_path(data_dir).exists() {
        let bytes = std::fs::read(tokens_path(data_dir)).context("read tokens.json")?;
        let list: Vec<AccessToken> = serde_json::from_slice(&bytes).context("parse tokens.json")?;
        list.into_iter().map(|t| (t.id.clone(), t)).collect()
    } else {
        HashMap::new()
    };

    Ok((users, tokens))
}

pub(super) fn persist_identity_to_disk(
    data_dir: &std::path::Path,
    users: &HashMap<String, User>,
    tokens: &HashMap<String, AccessToken>,
) -> Result<()> {
    let mut user_list: Vec<User> = users.values().cloned().collect();
    user_list.sort_by(|a, b| a.handle.cmp(&b.handle));
    let bytes = serde_json::to_vec_pretty(&user_list).context("serialize users")?;
    write_atomic_overwrite(&users_path(data_dir), &bytes).context("write users.json")?;

    let mut token_list: Vec<AccessToken> = tokens.values().cloned().collect();
    token_list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let bytes = serde_json::to_vec_pretty(&token_list).context("serialize tokens")?;
    write_atomic_overwrite(&tokens_path(data_dir), &bytes).context("write tokens.json")?;

    Ok(())
}

/// The development admin for an empty data dir, holding `token_secret`.
pub(super) fn bootstrap_identity(handle: &str, token_secret: &str) -> (User, AccessToken) {
    let created_at = studio::model::now_ts();
    let user_id = {
        let mut h = blake3::Hasher::new();
        h.update(handle.as_bytes());
        h.update(b"\n");
        h.update(created_at.as_bytes());
        h.finalize().to_hex().to_string()
    };
    let user = User {
        id: user_id.clone(),
        handle: handle.to_string(),
        display_name: None,
        email: None,
        admin: true,
        created_at: created_at.clone(),
    };
    let token = issue_token(&user_id, token_secret, "bootstrap", created_at);
    (user, token)
}

pub(super) fn issue_token(
    user_id: &str,
    token_secret: &str,
    label: &str,
    created_at: String,
) -> AccessToken {
    let token_hash = hash_token(token_secret);
    let id = {
        let mut h = blake3::Hasher::new();
        h.update(user_id.as_bytes());
        h.update(b"\n");
        h.update(token_hash.as_bytes());
        h.finalize().to_hex().to_string()
    };
    AccessToken {
        id,
        user_id: user_id.to_string(),
        token_hash,
        label: Some(label.to_string()),
        created_at,
        last_used_at: None,
    }
}

pub(super) fn random_hex(len_bytes: usize) -> Result<String> {
    let mut bytes = vec![0u8; len_bytes];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(len_bytes * 2);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

pub(super) fn generate_token_secret() -> Result<String> {
    // 32 bytes of entropy, hex-encoded.
    random_hex(32)
}

pub(super) fn validate_user_handle(handle: &str) -> Result<()> {
    if handle.is_empty() {
        return Err(anyhow::anyhow!("user handle cannot be empty"));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(anyhow::anyhow!(
            "user handle must be lowercase alnum or '-', '_'"
        ));
    }
    Ok(())
}
