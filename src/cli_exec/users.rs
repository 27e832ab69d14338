use studio::remote::Identity;

use super::*;

fn print_identities(users: &[Identity]) {
    if users.is_empty() {
        println!("(no identities)");
        return;
    }
    for u in users {
        let mut line = format!("{} {}", u.id, u.handle);
        if u.admin {
            line.push_str(" admin");
        }
        if let Some(name) = &u.display_name {
            line.push_str(&format!(" ({})", name));
        }
        if let Some(email) = &u.email {
            line.push_str(&format!(" <{}>", email));
        }
        println!("{}", line);
    }
}

pub(super) fn handle_users_command(ctx: &CliContext, command: UsersCommands) -> Result<()> {
    let client = ctx.authenticated()?;
    match command {
        UsersCommands::List(args) => {
            let mut users = client.list_identities()?;
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            if args.json {
                return print_json(&users, "identities");
            }
            print_identities(&users);
        }
        UsersCommands::Search { query, json } => {
            let users = client.search_identities(&query)?;
            if json {
                return print_json(&users, "identities");
            }
            print_identities(&users);
        }
        UsersCommands::Create {
            handle,
            display_name,
            email,
            admin,
            json,
        } => {
            let created = client.create_identity(&handle, display_name, email, admin)?;
            if json {
                return print_json(&created, "identity");
            }
            println!("Created {} ({})", created.user.handle, created.user.id);
            println!("token: {}", created.token);
        }
    }
    Ok(())
}
