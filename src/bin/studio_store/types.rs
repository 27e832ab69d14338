use super::*;

/// Who is calling, resolved from the bearer token by `identify_caller`.
#[derive(Clone, Debug)]
pub(super) enum Caller {
    Anonymous,
    User(Subject),
}

#[derive(Clone, Debug)]
pub(super) struct Subject {
    pub(super) user_id: String,
    pub(super) handle: String,
    pub(super) admin: bool,
}

impl Caller {
    pub(super) fn subject(&self) -> Option<&Subject> {
        match self {
            Caller::Anonymous => None,
            Caller::User(s) => Some(s),
        }
    }

    pub(super) fn is_admin(&self) -> bool {
        self.subject().is_some_and(|s| s.admin)
    }
}

pub(super) struct AppState {
    pub(super) data_dir: PathBuf,

    pub(super) users: Arc<RwLock<HashMap<String, User>>>,
    pub(super) tokens: Arc<RwLock<HashMap<String, AccessToken>>>,

    /// token_hash -> token id
    pub(super) token_hash_index: Arc<RwLock<HashMap<String, String>>>,

    /// collection -> rows, newest first
    pub(super) tables: Arc<RwLock<HashMap<String, Vec<Record>>>>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct User {
    pub(super) id: String,
    pub(super) handle: String,

    #[serde(default)]
    pub(super) display_name: Option<String>,

    #[serde(default)]
    pub(super) email: Option<String>,

    pub(super) admin: bool,
    pub(super) created_at: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct AccessToken {
    pub(super) id: String,
    pub(super) user_id: String,
    pub(super) token_hash: String,

    #[serde(default)]
    pub(super) label: Option<String>,

    pub(super) created_at: String,

    #[serde(default)]
    pub(super) last_used_at: Option<String>,
}
