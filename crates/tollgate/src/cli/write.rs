//! the `grant`, `revoke` and `bulk-revoke` subcommands - write grants

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tollgate_grants::{BulkRevoke, Grant, Revoke};
use tollgate_types::Actor;

use super::DbArgs;

/// the grant a write targets
#[derive(Args, Debug, Clone)]
pub struct GrantTarget {
    /// actor holding the grant (TYPE:ID, e.g. User:7)
    #[arg(long)]
    pub actor: Actor,

    /// numeric action id
    #[arg(long)]
    pub action: i64,

    /// namespace (object type) of the action
    #[arg(long)]
    pub namespace: String,

    /// object id, for an action-on-object
    #[arg(long)]
    pub object: Option<i64>,

    /// segment the grant lives in (default: unscoped)
    #[arg(long)]
    pub segment: Option<i64>,
}

impl GrantTarget {
    fn describe(&self) -> String {
        match self.object {
            Some(object) => format!(
                "action {} on {} {} for {}",
                self.action, self.namespace, object, self.actor
            ),
            None => format!("action {} on {} for {}", self.action, self.namespace, self.actor),
        }
    }
}

/// grant an action to one actor
#[derive(Args, Debug)]
pub struct GrantCommand {
    #[command(flatten)]
    db: DbArgs,

    #[command(flatten)]
    target: GrantTarget,
}

impl GrantCommand {
    /// run the grant command
    pub async fn run(self) -> Result<()> {
        let db = self.db.connect().await?;
        let target = self.target;

        let mut grant = Grant::new(&db, target.actor.clone())?;
        if let Some(segment) = target.segment {
            grant.on_segment(segment);
        }
        grant
            .grant(target.action, &target.namespace, target.object)
            .await
            .with_context(|| format!("failed to grant {}", target.describe()))?;

        println!("Granted {}", target.describe());
        Ok(())
    }
}

/// revoke an action from one actor
#[derive(Args, Debug)]
pub struct RevokeCommand {
    #[command(flatten)]
    db: DbArgs,

    #[command(flatten)]
    target: GrantTarget,
}

impl RevokeCommand {
    /// run the revoke command
    pub async fn run(self) -> Result<()> {
        let db = self.db.connect().await?;
        let target = self.target;

        let mut revoke = Revoke::new(&db, target.actor.clone())?;
        if let Some(segment) = target.segment {
            revoke.on_segment(segment);
        }
        let removed = revoke
            .revoke(target.action, &target.namespace, target.object)
            .await
            .with_context(|| format!("failed to revoke {}", target.describe()))?;

        if removed == 0 {
            println!("Nothing to revoke: {} was not granted", target.describe());
        } else {
            println!("Revoked {}", target.describe());
        }
        Ok(())
    }
}

/// revoke a general action from every actor in a namespace
#[derive(Args, Debug)]
pub struct BulkRevokeCommand {
    #[command(flatten)]
    db: DbArgs,

    /// numeric action id
    #[arg(long)]
    action: i64,

    /// namespace (object type) of the action
    #[arg(long)]
    namespace: String,

    /// only revoke within this segment (default: every segment)
    #[arg(long)]
    segment: Option<i64>,
}

impl BulkRevokeCommand {
    /// run the bulk-revoke command
    pub async fn run(self) -> Result<()> {
        let db = self.db.connect().await?;

        let mut bulk = BulkRevoke::new(&db);
        if let Some(segment) = self.segment {
            bulk.on_segment(segment);
        }
        let removed = bulk
            .revoke(self.action, &self.namespace)
            .await
            .context("bulk revoke failed")?;

        println!(
            "Revoked action {} on {} from {} grant(s)",
            self.action, self.namespace, removed
        );
        Ok(())
    }
}
