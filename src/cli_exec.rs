use anyhow::{Context, Result};

use studio::console::{CollectionScreen, ConfirmationGate, Facet, MutationGateway, Targets};
use studio::error::ConsoleError;
use studio::model::{EntityKind, Record};

use crate::cli_runtime::CliContext;
use crate::{Commands, UsersCommands};

mod records;
mod session;
mod users;

pub(super) fn handle_command(ctx: &CliContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => session::handle_login_command(ctx, args.url, args.token)?,
        Commands::Logout => session::handle_logout_command(ctx)?,
        Commands::Whoami(args) => session::handle_whoami_command(ctx, args.json)?,
        Commands::List(args) => records::handle_list_command(
            ctx,
            args.entity,
            args.query.as_deref(),
            args.facet.as_deref(),
            args.json,
        )?,
        Commands::Stats(args) => {
            records::handle_stats_command(ctx, args.entity, args.field.as_deref(), args.json)?
        }
        Commands::SetStatus(args) => records::handle_set_status_command(
            ctx,
            args.entity,
            args.ids,
            &args.to,
            args.field.as_deref(),
        )?,
        Commands::Delete(args) => {
            records::handle_delete_command(ctx, args.entity, args.ids, &args.confirm)?
        }
        Commands::Submit(args) => {
            records::handle_submit_command(ctx, args.entity, &args.fields, false, args.json)?
        }
        Commands::Create(args) => {
            records::handle_submit_command(ctx, args.entity, &args.fields, true, args.json)?
        }
        Commands::Edit(args) => {
            records::handle_edit_command(ctx, args.entity, args.id, &args.fields)?
        }
        Commands::Users { command } => users::handle_users_command(ctx, command)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, label: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {}", label))?
    );
    Ok(())
}
