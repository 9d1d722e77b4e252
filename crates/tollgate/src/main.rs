//! tollgate - action-grant administration

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use tollgate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate(cmd) => cmd.run().await?,
        Command::Grant(cmd) => cmd.run().await?,
        Command::Revoke(cmd) => cmd.run().await?,
        Command::BulkRevoke(cmd) => cmd.run().await?,
        Command::Can(cmd) => {
            // denial is reported through the exit status
            if !cmd.run().await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::List(cmd) => cmd.run().await?,
    }

    Ok(ExitCode::SUCCESS)
}
