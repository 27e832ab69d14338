use studio::config::ConsoleConfig;
use studio::remote::ScopedClient;

use super::*;

pub(super) fn handle_login_command(
    ctx: &CliContext,
    url: String,
    token: Option<String>,
) -> Result<()> {
    let base_url = url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        anyhow::bail!("--url cannot be empty");
    }

    let token = token.filter(|t| !t.trim().is_empty());
    if let Some(token) = &token {
        let client = ScopedClient::new(&base_url, Some(token.clone()))?;
        let who = client.whoami().context("verify token")?;
        let Some(handle) = who.handle else {
            anyhow::bail!("the store did not recognize this token");
        };
        ctx.config
            .set_credential(&base_url, token)
            .context("store token in state.json")?;
        println!("Logged in as {}{}", handle, if who.admin { " (admin)" } else { "" });
    } else {
        println!("Configured {} (anonymous)", base_url);
    }

    ctx.config.write_config(&ConsoleConfig {
        version: 1,
        base_url,
    })?;
    Ok(())
}

pub(super) fn handle_logout_command(ctx: &CliContext) -> Result<()> {
    let base_url = ctx.base_url()?;
    ctx.config.clear_credential(&base_url)?;
    println!("Logged out of {}", base_url);
    Ok(())
}

pub(super) fn handle_whoami_command(ctx: &CliContext, json: bool) -> Result<()> {
    let client = ctx.session()?;
    let who = client.whoami()?;
    if json {
        return print_json(&who, "whoami");
    }
    match (&who.handle, &who.user_id) {
        (Some(handle), Some(id)) => {
            println!("user: {}", handle);
            println!("user_id: {}", id);
            println!("admin: {}", who.admin);
        }
        _ => println!("anonymous"),
    }
    Ok(())
}
