//! Scoped access to the remote collection store.
//!
//! Every request made through a [`ScopedClient`] carries the session credential (when there is
//! one); row visibility is decided by the store, never here.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::model::{Record, RecordId};

mod http_client;

mod types;
pub use self::types::*;
mod collections;
mod factory;
pub use self::factory::*;
mod identity;
pub use self::identity::IdentityDirectory;
mod memory;
pub use self::memory::MemoryStore;

/// Table-like remote collections addressed by name.
///
/// `select` returns the caller-visible rows newest first; `update` and `delete` touch exactly
/// the given ids and report the ids the store actually changed.
pub trait CollectionStore: Send + Sync {
    fn select(&self, collection: &str) -> Result<Vec<Record>>;
    fn update(
        &self,
        collection: &str,
        ids: &[RecordId],
        fields: &Map<String, Value>,
    ) -> Result<Vec<RecordId>>;
    fn delete(&self, collection: &str, ids: &[RecordId]) -> Result<Vec<RecordId>>;
    fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<Record>;
}

#[derive(Clone)]
pub struct ScopedClient {
    base_url: String,
    credential: Option<String>,
    client: reqwest::blocking::Client,
}

impl ScopedClient {
    /// Builds a client for `base_url`. An empty credential is treated as none.
    pub fn new(base_url: &str, credential: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("studio")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: credential.filter(|c| !c.trim().is_empty()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

impl std::fmt::Debug for ScopedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credential.is_some())
            .finish()
    }
}
