//! cli subcommands for tollgate.
//!
//! - `tollgate migrate` - create or upgrade the grant tables
//! - `tollgate grant` / `tollgate revoke` - write grants for one actor
//! - `tollgate bulk-revoke` - remove a general action from everyone
//! - `tollgate can` / `tollgate list` - query grants

mod check;
mod db;
mod migrate;
mod write;

pub use check::{CanCommand, ListCommand, OutputFormat};
pub use db::{CONFIG_SEARCH_PATHS, DbArgs, load_config_file, parse_database_url};
pub use migrate::MigrateCommand;
pub use write::{BulkRevokeCommand, GrantCommand, RevokeCommand};

use clap::{Parser, Subcommand};

/// tollgate - action-grant authorization
#[derive(Parser, Debug)]
#[command(name = "tollgate")]
#[command(about = "Manage and query action grants", long_about = None)]
#[command(version)]
pub struct Cli {
    /// subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// create or upgrade the grant tables
    Migrate(MigrateCommand),

    /// grant an action to one actor
    Grant(GrantCommand),

    /// revoke an action from one actor
    Revoke(RevokeCommand),

    /// revoke a general action from every actor in a namespace
    BulkRevoke(BulkRevokeCommand),

    /// check whether actors hold an action (exits non-zero when denied)
    Can(CanCommand),

    /// list object ids actors hold an action on
    List(ListCommand),
}
