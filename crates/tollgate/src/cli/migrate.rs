//! the `migrate` subcommand - create or upgrade the grant tables

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tollgate_db::GrantStore;

use super::DbArgs;

/// create or upgrade the grant tables
#[derive(Args, Debug)]
pub struct MigrateCommand {
    #[command(flatten)]
    db: DbArgs,
}

impl MigrateCommand {
    /// run the migrate command
    pub async fn run(self) -> Result<()> {
        // connecting applies pending migrations
        let db = self.db.connect().await?;
        db.ping().await.context("grant store is not reachable")?;
        println!("Grant tables are up to date");
        Ok(())
    }
}
