//! Per-session client construction, memoized by credential.

use std::sync::Arc;

use super::*;

/// Source of the opaque session credential. `Ok(None)` means "operate anonymously".
pub trait CredentialProvider {
    fn credential(&self) -> Result<Option<String>>;
}

/// A fixed credential, e.g. from `--token` or a test.
#[derive(Clone, Debug, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Whether the screens served by a factory need an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Anonymous,
    Authenticated,
}

#[derive(Clone, Debug)]
pub struct Acquired {
    pub client: Arc<ScopedClient>,
    /// True when the client was (re)built for a new credential; screens reload on it.
    pub fresh: bool,
}

struct Cached {
    credential: Option<String>,
    client: Arc<ScopedClient>,
}

/// Hands out one shared [`ScopedClient`] per credential.
///
/// The handle is rebuilt only when the provider reports a different credential, and dropped
/// when an authenticated factory loses its credential.
pub struct ClientFactory {
    base_url: String,
    access: Access,
    cached: Option<Cached>,
}

impl ClientFactory {
    pub fn new(base_url: impl Into<String>, access: Access) -> Self {
        Self {
            base_url: base_url.into(),
            access,
            cached: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Returns the current handle, or `None` when an authenticated factory has no usable
    /// credential. Callers defer collection loads until this yields a handle.
    pub fn acquire(&mut self, provider: &dyn CredentialProvider) -> Option<Acquired> {
        let credential = match provider.credential() {
            Ok(c) => c.filter(|c| !c.trim().is_empty()),
            Err(err) => {
                tracing::debug!(error = %format!("{:#}", err), "credential provider failed");
                if self.access == Access::Authenticated {
                    self.invalidate();
                    return None;
                }
                None
            }
        };

        if self.access == Access::Authenticated && credential.is_none() {
            tracing::debug!("credential unavailable; deferring client");
            self.invalidate();
            return None;
        }

        if let Some(cached) = &self.cached
            && cached.credential == credential
        {
            return Some(Acquired {
                client: cached.client.clone(),
                fresh: false,
            });
        }

        let client = match ScopedClient::new(&self.base_url, credential.clone()) {
            Ok(c) => Arc::new(c),
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "build scoped client");
                self.invalidate();
                return None;
            }
        };
        tracing::debug!(
            authenticated = client.is_authenticated(),
            "scoped client created"
        );
        self.cached = Some(Cached {
            credential,
            client: client.clone(),
        });
        Some(Acquired {
            client,
            fresh: true,
        })
    }

    /// Drops the memoized handle; the next `acquire` rebuilds it.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
#[path = "../tests/remote/factory_tests.rs"]
mod tests;
