//! DTOs for remote store requests/responses.

#[derive(Debug, serde::Serialize)]
pub(super) struct IdsRequest<'a> {
    pub(super) ids: &'a [String],
}

#[derive(Debug, serde::Serialize)]
pub(super) struct UpdateRequest<'a> {
    pub(super) ids: &'a [String],
    pub(super) fields: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct AffectedResponse {
    pub affected: Vec<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WhoAmI {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    pub id: String,
    pub handle: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub admin: bool,

    pub created_at: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateIdentityResponse {
    pub user: Identity,
    pub token: String,
}
