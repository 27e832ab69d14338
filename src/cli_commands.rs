use clap::{Args, Subcommand};

use studio::model::EntityKind;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Configure the store URL and store a bearer token for it
    Login(LoginArgs),

    /// Forget the stored token for the configured store
    Logout,

    /// Show the identity the store sees for the current credential
    Whoami(JsonArgs),

    /// List the records of an entity, newest first
    List(ListArgs),

    /// Count records per status
    Stats(StatsArgs),

    /// Move records to another status
    #[command(name = "set-status")]
    SetStatus(SetStatusArgs),

    /// Delete records (requires the confirmation phrase)
    Delete(DeleteArgs),

    /// Send a public submission without signing in
    Submit(FieldsArgs),

    /// Create a record as the signed-in operator
    Create(FieldsArgs),

    /// Change fields of one record
    Edit(EditArgs),

    /// Manage store identities (admin)
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    /// Store base URL (e.g. http://127.0.0.1:8080)
    #[arg(long)]
    pub(crate) url: String,

    /// Bearer token; without it the console operates anonymously
    #[arg(long)]
    pub(crate) token: Option<String>,
}

#[derive(Args)]
pub(crate) struct JsonArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// feedback | requirements | success-stories | contact-messages | websites | identities
    pub(crate) entity: EntityKind,

    /// Case-insensitive substring over the entity's search fields
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,

    /// Facet value ("all" for no restriction)
    #[arg(long)]
    pub(crate) facet: Option<String>,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct StatsArgs {
    pub(crate) entity: EntityKind,

    /// Status field (defaults to the entity's primary one)
    #[arg(long)]
    pub(crate) field: Option<String>,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct SetStatusArgs {
    pub(crate) entity: EntityKind,

    #[arg(required = true)]
    pub(crate) ids: Vec<String>,

    /// Target status
    #[arg(long)]
    pub(crate) to: String,

    /// Status field (defaults to the entity's primary one)
    #[arg(long)]
    pub(crate) field: Option<String>,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    pub(crate) entity: EntityKind,

    #[arg(required = true)]
    pub(crate) ids: Vec<String>,

    /// "DELETE" for one record, "DELETE SELECTED" for several
    #[arg(long)]
    pub(crate) confirm: String,
}

#[derive(Args)]
pub(crate) struct FieldsArgs {
    pub(crate) entity: EntityKind,

    /// Field as key=value (repeatable)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
    pub(crate) fields: Vec<String>,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct EditArgs {
    pub(crate) entity: EntityKind,

    pub(crate) id: String,

    /// Field as key=value (repeatable)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", required = true)]
    pub(crate) fields: Vec<String>,
}

#[derive(Subcommand)]
pub(crate) enum UsersCommands {
    /// List identities
    List(JsonArgs),

    /// Find identities by handle, name, email or id
    Search {
        query: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an identity and print its token
    Create {
        handle: String,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}
