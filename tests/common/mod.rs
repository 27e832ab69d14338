use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    pub token: String,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A store with its own throwaway data dir.
pub struct TempServer {
    pub server: ServerGuard,
    _data_dir: tempfile::TempDir,
}

impl std::ops::Deref for TempServer {
    type Target = ServerGuard;

    fn deref(&self) -> &ServerGuard {
        &self.server
    }
}

pub fn spawn_server() -> Result<TempServer> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let server = spawn_server_in(data_dir.path())?;
    Ok(TempServer {
        server,
        _data_dir: data_dir,
    })
}

/// Starts `studio-store` on `data_dir`; an empty dir bootstraps the `dev` admin.
pub fn spawn_server_in(data_dir: &std::path::Path) -> Result<ServerGuard> {
    let token = "dev".to_string();
    let addr_file = data_dir.join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);

    let child = Command::new(env!("CARGO_BIN_EXE_studio-store"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--dev-user",
            "dev",
            "--dev-token",
            &token,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn studio-store")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        token,
        child,
    })
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Creates a non-admin user through the admin endpoint and returns its bearer token.
#[allow(dead_code)]
pub fn create_user(server: &ServerGuard, handle: &str) -> Result<String> {
    let client = reqwest::blocking::Client::new();
    let created: serde_json::Value = client
        .post(format!("{}/admin/users", server.base_url))
        .header(reqwest::header::AUTHORIZATION, auth_header(&server.token))
        .json(&serde_json::json!({"handle": handle}))
        .send()
        .context("create user")?
        .error_for_status()
        .context("create user status")?
        .json()
        .context("parse create user")?;
    Ok(created
        .get("token")
        .and_then(|v| v.as_str())
        .context("token missing")?
        .to_string())
}
