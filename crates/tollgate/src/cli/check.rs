//! the `can` and `list` subcommands - query grants

use clap::{Args, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tollgate_grants::Query;
use tollgate_types::{Actions, Actor, ActorSet};

use super::DbArgs;

/// output format for listings
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// one id per line under a header
    #[default]
    Table,
    /// a json array of ids
    Json,
}

/// check whether actors hold an action
#[derive(Args, Debug)]
pub struct CanCommand {
    #[command(flatten)]
    db: DbArgs,

    /// actor to check as (TYPE:ID); repeat to combine several identities
    #[arg(long = "actor", required = true)]
    pub actors: Vec<Actor>,

    /// action id, or comma-separated ids any of which suffices
    #[arg(long)]
    pub action: Actions,

    /// namespace (object type) of the action
    #[arg(long)]
    pub namespace: String,

    /// object id, for an action-on-object
    #[arg(long)]
    pub object: Option<i64>,

    /// segment to check in (default: unscoped)
    #[arg(long)]
    pub segment: Option<i64>,
}

impl CanCommand {
    /// run the can command. returns whether the check passed.
    pub async fn run(self) -> Result<bool> {
        let db = self.db.connect().await?;

        let actors: ActorSet = self.actors.into_iter().collect();
        let mut query = Query::new(&db, actors);
        if let Some(segment) = self.segment {
            query.on_segment(segment);
        }
        let allowed = query
            .can(self.action.clone(), &self.namespace, self.object)
            .await
            .context("permission check failed")?;

        let object = self
            .object
            .map(|id| format!(" {}", id))
            .unwrap_or_default();
        let verdict = if allowed { "allowed" } else { "denied" };
        println!(
            "{}: {} action {} on {}{}",
            verdict,
            query.actors(),
            self.action,
            self.namespace,
            object
        );
        Ok(allowed)
    }
}

/// list object ids actors hold an action on
#[derive(Args, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    db: DbArgs,

    /// actor to list for (TYPE:ID); repeat to combine several identities
    #[arg(long = "actor", required = true)]
    pub actors: Vec<Actor>,

    /// action id
    #[arg(long)]
    pub action: i64,

    /// namespace (object type) of the action
    #[arg(long)]
    pub namespace: String,

    /// segment to list in (default: unscoped)
    #[arg(long)]
    pub segment: Option<i64>,

    /// output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl ListCommand {
    /// run the list command
    pub async fn run(self) -> Result<()> {
        let db = self.db.connect().await?;

        let actors: ActorSet = self.actors.into_iter().collect();
        let mut query = Query::new(&db, actors);
        if let Some(segment) = self.segment {
            query.on_segment(segment);
        }
        let ids = query
            .list(self.action, &self.namespace)
            .await
            .context("failed to list objects")?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
            OutputFormat::Table => {
                if ids.is_empty() {
                    println!("No objects found");
                    return Ok(());
                }
                println!("{:<12}", "OBJECT ID");
                println!("{}", "-".repeat(12));
                for id in ids {
                    println!("{:<12}", id);
                }
            }
        }

        Ok(())
    }
}
