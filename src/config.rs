//! Operator configuration: the store URL in `config.json`, credentials in `state.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::remote::CredentialProvider;

pub const DEFAULT_CONFIG_DIR: &str = ".studio";
pub const ENV_URL: &str = "STUDIO_URL";
pub const ENV_TOKEN: &str = "STUDIO_TOKEN";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub version: u32,
    pub base_url: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConsoleState {
    pub version: u32,

    /// base_url -> bearer credential
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

/// The `.studio` directory.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn read_config(&self) -> Result<Option<ConsoleConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let cfg: ConsoleConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(Some(cfg))
    }

    pub fn write_config(&self, cfg: &ConsoleConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic_overwrite(&self.config_path(), &bytes).context("write config.json")
    }

    pub fn read_state(&self) -> Result<ConsoleState> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(ConsoleState {
                version: 1,
                ..Default::default()
            });
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let st: ConsoleState = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        if st.version != 1 {
            anyhow::bail!("unsupported state version {}", st.version);
        }
        Ok(st)
    }

    fn write_state(&self, st: &ConsoleState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic_overwrite(&self.state_path(), &bytes).context("write state.json")
    }

    pub fn get_credential(&self, base_url: &str) -> Result<Option<String>> {
        Ok(self.read_state()?.credentials.get(base_url).cloned())
    }

    pub fn set_credential(&self, base_url: &str, token: &str) -> Result<()> {
        let mut st = self.read_state()?;
        st.credentials
            .insert(base_url.to_string(), token.to_string());
        self.write_state(&st)
    }

    pub fn clear_credential(&self, base_url: &str) -> Result<()> {
        let mut st = self.read_state()?;
        st.credentials.remove(base_url);
        self.write_state(&st)
    }

    /// `STUDIO_URL` wins over the configured URL.
    pub fn resolve_base_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(ENV_URL)
            && !url.trim().is_empty()
        {
            return Ok(url.trim().trim_end_matches('/').to_string());
        }
        let cfg = self
            .read_config()?
            .context("no store configured (run `studio login --url ...` or set STUDIO_URL)")?;
        Ok(cfg.base_url)
    }
}

/// Reads the credential for one store: `STUDIO_TOKEN` first, then `state.json`. Read on every
/// acquire so a re-login elsewhere is picked up.
#[derive(Clone, Debug)]
pub struct StoredCredential {
    store: ConfigStore,
    base_url: String,
}

impl StoredCredential {
    pub fn new(store: ConfigStore, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }
}

impl CredentialProvider for StoredCredential {
    fn credential(&self) -> Result<Option<String>> {
        if let Ok(token) = std::env::var(ENV_TOKEN)
            && !token.trim().is_empty()
        {
            return Ok(Some(token));
        }
        self.store.get_credential(&self.base_url)
    }
}

pub(crate) fn write_atomic_overwrite(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
