//! database layer for tollgate.
//!
//! this crate provides persistent storage for:
//! - general grants (an action within a namespace)
//! - object grants (an action on one object in a namespace)
//!
//! uniqueness of grants is enforced by unique indexes, never by application
//! locking: a duplicate insert surfaces as [`Error::AlreadyExists`].

#![warn(missing_docs)]

mod entity;
mod error;
mod filter;
mod migration;
pub mod scope;
pub mod tuple;

pub use error::Error;
pub use filter::GrantFilter;
pub use scope::{EntityScope, ModelScope, StaticScope};

use std::future::Future;

use sea_orm::{
    ConnectionTrait, Database as SeaOrmDatabase, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm_migration::MigratorTrait;

use tollgate_types::{ActorFilter, Config, GeneralGrant, ObjectGrant};

use entity::{general_grant, object_grant};

/// result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// storage operations the decision engine and write path need.
///
/// this trait abstracts over different database backends (sqlite, postgresql).
/// grants are never updated in place: they are inserted, read and deleted.
pub trait GrantStore: Send + Sync {
    // ─── Health Check ─────────────────────────────────────────────────────────

    /// ping the database to verify connectivity.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    // ─── General Grants ──────────────────────────────────────────────────────

    /// insert a general grant.
    ///
    /// returns [`Error::AlreadyExists`] if an identical grant is already stored.
    fn insert_general_grant(
        &self,
        grant: &GeneralGrant,
    ) -> impl Future<Output = Result<()>> + Send;

    /// whether any general grant matches the filter.
    fn general_grant_exists(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// delete every matching general grant. returns the number removed.
    fn delete_general_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// count matching general grants.
    fn count_general_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send;

    // ─── Object Grants ───────────────────────────────────────────────────────

    /// insert an object grant.
    ///
    /// returns [`Error::AlreadyExists`] if an identical grant is already stored.
    fn insert_object_grant(&self, grant: &ObjectGrant)
    -> impl Future<Output = Result<()>> + Send;

    /// whether any object grant matches the filter.
    fn object_grant_exists(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// delete every matching object grant. returns the number removed.
    fn delete_object_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// count matching object grants.
    fn count_object_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// distinct object ids of matching object grants, ascending.
    fn list_object_ids(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<Vec<i64>>> + Send;
}

impl<T: GrantStore> GrantStore for &T {
    fn ping(&self) -> impl Future<Output = Result<()>> + Send {
        (**self).ping()
    }

    fn insert_general_grant(
        &self,
        grant: &GeneralGrant,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).insert_general_grant(grant)
    }

    fn general_grant_exists(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<bool>> + Send {
        (**self).general_grant_exists(filter)
    }

    fn delete_general_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send {
        (**self).delete_general_grants(filter)
    }

    fn count_general_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send {
        (**self).count_general_grants(filter)
    }

    fn insert_object_grant(
        &self,
        grant: &ObjectGrant,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).insert_object_grant(grant)
    }

    fn object_grant_exists(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<bool>> + Send {
        (**self).object_grant_exists(filter)
    }

    fn delete_object_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send {
        (**self).delete_object_grants(filter)
    }

    fn count_object_grants(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<u64>> + Send {
        (**self).count_object_grants(filter)
    }

    fn list_object_ids(
        &self,
        filter: &GrantFilter,
    ) -> impl Future<Output = Result<Vec<i64>>> + Send {
        (**self).list_object_ids(filter)
    }
}

/// the main database implementation using sea-orm.
#[derive(Clone)]
pub struct TollgateDb {
    conn: DatabaseConnection,
    actor_filter: ActorFilter,
}

impl TollgateDb {
    /// create a new database connection from config and run migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let url = Self::build_connection_url(&config.database)?;
        let conn: DatabaseConnection = SeaOrmDatabase::connect(&url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self {
            conn,
            actor_filter: config.query.actor_filter,
        };

        // enable WAL mode for sqlite if configured
        if config.database.db_type == "sqlite" && config.database.sqlite.write_ahead_log {
            db.enable_wal_mode().await?;
        }

        db.migrate().await?;
        Ok(db)
    }

    /// enable write-ahead logging mode for sqlite.
    async fn enable_wal_mode(&self) -> Result<()> {
        self.conn
            .execute_unprepared("PRAGMA journal_mode=WAL")
            .await
            .map_err(|e| Error::Connection(format!("failed to enable WAL mode: {}", e)))?;
        tracing::info!("sqlite WAL mode enabled");
        Ok(())
    }

    /// build a sea-orm compatible connection url from config.
    fn build_connection_url(config: &tollgate_types::DatabaseConfig) -> Result<String> {
        match config.db_type.as_str() {
            "sqlite" => {
                let path = if config.connection_string.starts_with("sqlite:") {
                    config.connection_string.clone()
                } else {
                    format!("sqlite:{}", config.connection_string)
                };
                // add ?mode=rwc to create file if it doesn't exist
                if path.contains('?') {
                    Ok(path)
                } else {
                    Ok(format!("{}?mode=rwc", path))
                }
            }
            "postgres" | "postgresql" => Ok(config.connection_string.clone()),
            other => Err(Error::InvalidData(format!(
                "unsupported database type: {}",
                other
            ))),
        }
    }

    /// create an in-memory sqlite database for testing.
    pub async fn new_in_memory() -> Result<Self> {
        Self::new_in_memory_with(ActorFilter::default()).await
    }

    /// create an in-memory sqlite database using the given actor filter strategy.
    pub async fn new_in_memory_with(actor_filter: ActorFilter) -> Result<Self> {
        let conn: DatabaseConnection = SeaOrmDatabase::connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self { conn, actor_filter };
        db.migrate().await?;
        Ok(db)
    }

    /// run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        migration::Migrator::up(&self.conn, None)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        tracing::debug!("grant tables migrated");
        Ok(())
    }

    /// the underlying connection, for building [`EntityScope`]s over host tables.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// the actor filter strategy in use.
    pub fn actor_filter(&self) -> ActorFilter {
        self.actor_filter
    }
}

impl GrantStore for TollgateDb {
    // health check

    async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(())
    }

    // general grants

    async fn insert_general_grant(&self, grant: &GeneralGrant) -> Result<()> {
        let model: general_grant::ActiveModel = grant.into();
        general_grant::Entity::insert(model)
            .exec_without_returning(&self.conn)
            .await?;
        Ok(())
    }

    async fn general_grant_exists(&self, filter: &GrantFilter) -> Result<bool> {
        let cond = filter.condition::<general_grant::Entity>(self.actor_filter)?;
        let found = general_grant::Entity::find()
            .filter(cond)
            .one(&self.conn)
            .await?;
        Ok(found.is_some())
    }

    async fn delete_general_grants(&self, filter: &GrantFilter) -> Result<u64> {
        let cond = filter.condition::<general_grant::Entity>(self.actor_filter)?;
        let result = general_grant::Entity::delete_many()
            .filter(cond)
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_general_grants(&self, filter: &GrantFilter) -> Result<u64> {
        let cond = filter.condition::<general_grant::Entity>(self.actor_filter)?;
        let count = general_grant::Entity::find()
            .filter(cond)
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    // object grants

    async fn insert_object_grant(&self, grant: &ObjectGrant) -> Result<()> {
        let model: object_grant::ActiveModel = grant.into();
        object_grant::Entity::insert(model)
            .exec_without_returning(&self.conn)
            .await?;
        Ok(())
    }

    async fn object_grant_exists(&self, filter: &GrantFilter) -> Result<bool> {
        let cond = filter.condition::<object_grant::Entity>(self.actor_filter)?;
        let found = object_grant::Entity::find()
            .filter(cond)
            .one(&self.conn)
            .await?;
        Ok(found.is_some())
    }

    async fn delete_object_grants(&self, filter: &GrantFilter) -> Result<u64> {
        let cond = filter.condition::<object_grant::Entity>(self.actor_filter)?;
        let result = object_grant::Entity::delete_many()
            .filter(cond)
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_object_grants(&self, filter: &GrantFilter) -> Result<u64> {
        let cond = filter.condition::<object_grant::Entity>(self.actor_filter)?;
        let count = object_grant::Entity::find()
            .filter(cond)
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    async fn list_object_ids(&self, filter: &GrantFilter) -> Result<Vec<i64>> {
        let cond = filter.condition::<object_grant::Entity>(self.actor_filter)?;
        let ids = object_grant::Entity::find()
            .select_only()
            .column(object_grant::Column::ObjectId)
            .distinct()
            .filter(cond)
            .order_by_asc(object_grant::Column::ObjectId)
            .into_tuple::<i64>()
            .all(&self.conn)
            .await?;
        Ok(ids)
    }
}
