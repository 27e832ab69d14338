use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use studio::config::{ConfigStore, DEFAULT_CONFIG_DIR, StoredCredential};
use studio::error::ConsoleError;
use studio::model::EntityKind;
use studio::remote::{Access, ClientFactory, CollectionStore, IdentityDirectory, ScopedClient};

use crate::Commands;

#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Admin console for the studio collection store", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding config.json and state.json
    #[arg(long = "config-dir", value_name = "PATH", global = true)]
    config_dir: Option<PathBuf>,

    /// Screen the terminal console opens on
    #[arg(long, value_name = "ENTITY")]
    entity: Option<EntityKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = cli
        .config_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

    match cli.command {
        None => {
            // No stderr subscriber here: it would draw over the screen.
            studio::tui::run_with_options(studio::tui::TuiRunOptions {
                config_dir,
                entity: cli.entity.unwrap_or(EntityKind::Requirements),
            })?;
        }
        Some(command) => {
            if cli.entity.is_some() {
                anyhow::bail!("`--entity` is only supported when running the TUI (no subcommand)");
            }
            init_tracing();
            let ctx = CliContext::new(ConfigStore::new(config_dir));
            crate::cli_exec::handle_command(&ctx, command)?
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("STUDIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (tests driving `run` twice) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) struct CliContext {
    pub(crate) config: ConfigStore,
}

impl CliContext {
    fn new(config: ConfigStore) -> Self {
        Self { config }
    }

    pub(crate) fn base_url(&self) -> Result<String> {
        self.config.resolve_base_url()
    }

    fn client(&self, access: Access) -> Result<Arc<ScopedClient>> {
        let base_url = self.base_url()?;
        let mut factory = ClientFactory::new(base_url.clone(), access);
        let provider = StoredCredential::new(self.config.clone(), base_url);
        let acquired = factory
            .acquire(&provider)
            .ok_or(ConsoleError::CredentialUnavailable)
            .context(
                "no token for this store (run `studio login --url ... --token ...` or set STUDIO_TOKEN)",
            )?;
        Ok(acquired.client)
    }

    /// Client carrying the stored credential; fails when there is none.
    pub(crate) fn authenticated(&self) -> Result<Arc<ScopedClient>> {
        self.client(Access::Authenticated)
    }

    /// Client carrying the stored credential when there is one.
    pub(crate) fn session(&self) -> Result<Arc<ScopedClient>> {
        self.client(Access::Anonymous)
    }

    /// Client that never sends a credential (public submissions).
    pub(crate) fn anonymous(&self) -> Result<ScopedClient> {
        ScopedClient::new(&self.base_url()?, None)
    }

    /// Authenticated store for `kind`; identities come from the admin endpoints.
    pub(crate) fn store_for(&self, kind: EntityKind) -> Result<Box<dyn CollectionStore>> {
        let client = self.authenticated()?;
        Ok(if kind == EntityKind::Identities {
            Box::new(IdentityDirectory::new((*client).clone()))
        } else {
            Box::new((*client).clone())
        })
    }
}
