//! Privileged identity endpoints, plus an adapter that exposes them as a read-only collection.

use super::*;

impl ScopedClient {
    pub fn whoami(&self) -> Result<WhoAmI> {
        let resp = self
            .authorize(self.client.get(self.url("/whoami")))
            .send()
            .context("whoami")?;
        let w: WhoAmI = self
            .ensure_ok(resp, "whoami")?
            .json()
            .context("parse whoami")?;
        Ok(w)
    }

    pub fn list_identities(&self) -> Result<Vec<Identity>> {
        let resp = self
            .authorize(self.client.get(self.url("/admin/users")))
            .send()
            .context("list identities")?;
        let out: Vec<Identity> = self
            .ensure_ok(resp, "list identities")?
            .json()
            .context("parse identities")?;
        Ok(out)
    }

    /// Partial, case-insensitive match on handle, display name, email or id (server side).
    pub fn search_identities(&self, query: &str) -> Result<Vec<Identity>> {
        let resp = self
            .authorize(
                self.client
                    .get(self.url("/admin/users/search"))
                    .query(&[("q", query)]),
            )
            .send()
            .context("search identities")?;
        let out: Vec<Identity> = self
            .ensure_ok(resp, "search identities")?
            .json()
            .context("parse identities")?;
        Ok(out)
    }

    pub fn create_identity(
        &self,
        handle: &str,
        display_name: Option<String>,
        email: Option<String>,
        admin: bool,
    ) -> Result<CreateIdentityResponse> {
        let resp = self
            .authorize(self.client.post(self.url("/admin/users")).json(
                &serde_json::json!({
                    "handle": handle,
                    "display_name": display_name,
                    "email": email,
                    "admin": admin,
                }),
            ))
            .send()
            .context("create identity")?;
        let out: CreateIdentityResponse = self
            .ensure_ok(resp, "create identity")?
            .json()
            .context("parse create identity")?;
        Ok(out)
    }
}

impl Identity {
    pub fn to_record(&self) -> Record {
        let mut rec = Record::new(self.id.clone(), self.created_at.clone())
            .with_field("handle", self.handle.clone())
            .with_field("admin", self.admin);
        if let Some(name) = &self.display_name {
            rec.set("display_name", Value::String(name.clone()));
        }
        if let Some(email) = &self.email {
            rec.set("email", Value::String(email.clone()));
        }
        rec
    }
}

/// The admin identity listing seen through the collection interface, so the same loader,
/// filter and selection code drive the identities screen.
#[derive(Clone, Debug)]
pub struct IdentityDirectory {
    client: ScopedClient,
}

impl IdentityDirectory {
    pub fn new(client: ScopedClient) -> Self {
        Self { client }
    }
}

impl CollectionStore for IdentityDirectory {
    fn select(&self, _collection: &str) -> Result<Vec<Record>> {
        let mut rows: Vec<Record> = self
            .client
            .list_identities()?
            .iter()
            .map(Identity::to_record)
            .collect();
        crate::model::sort_by_recency(&mut rows);
        Ok(rows)
    }

    fn update(
        &self,
        _collection: &str,
        _ids: &[RecordId],
        _fields: &Map<String, Value>,
    ) -> Result<Vec<RecordId>> {
        anyhow::bail!("identities are read-only here")
    }

    fn delete(&self, _collection: &str, _ids: &[RecordId]) -> Result<Vec<RecordId>> {
        anyhow::bail!("identities are read-only here")
    }

    fn insert(&self, _collection: &str, _fields: Map<String, Value>) -> Result<Record> {
        anyhow::bail!("identities are created with `studio users create`")
    }
}
