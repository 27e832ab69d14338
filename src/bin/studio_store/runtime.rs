use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use super::*;

#[derive(Parser)]
#[command(name = "studio-store")]
#[command(about = "Studio collection store (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory for identities and tables
    #[arg(long, default_value = "./studio-data")]
    data_dir: PathBuf,

    /// Development admin handle
    #[arg(long, default_value = "dev")]
    dev_user: String,

    /// Development admin bearer token (used only when the data dir has no identities)
    #[arg(long, default_value = "dev")]
    dev_token: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STUDIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let (users, tokens) = load_or_bootstrap_identity(&args)?;
    let token_hash_index: HashMap<String, String> = tokens
        .values()
        .map(|t| (t.token_hash.clone(), t.id.clone()))
        .collect();
    let tables = load_tables_from_disk(&args.data_dir).context("load tables")?;

    let state = Arc::new(AppState {
        data_dir: args.data_dir.clone(),
        users: Arc::new(RwLock::new(users)),
        tokens: Arc::new(RwLock::new(tokens)),
        token_hash_index: Arc::new(RwLock::new(token_hash_index)),
        tables: Arc::new(RwLock::new(tables)),
    });

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(
        addr = %local_addr,
        data_dir = %args.data_dir.display(),
        "studio-store listening"
    );

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn load_or_bootstrap_identity(
    args: &Args,
) -> Result<(HashMap<String, User>, HashMap<String, AccessToken>)> {
    let (mut users, mut tokens) =
        load_identity_from_disk(&args.data_dir).context("load identity")?;

    if users.is_empty() && tokens.is_empty() {
        let (u, t) = bootstrap_identity(&args.dev_user, &args.dev_token);
        users.insert(u.id.clone(), u);
        tokens.insert(t.id.clone(), t);
        persist_identity_to_disk(&args.data_dir, &users, &tokens).context("persist identity")?;
    } else if users.is_empty() || tokens.is_empty() {
        anyhow::bail!(
            "identity store inconsistent (users/tokens missing); remove {} to re-bootstrap",
            args.data_dir.display()
        );
    }

    Ok((users, tokens))
}
