//! configuration types for tollgate

use serde::{Deserialize, Serialize};

/// main configuration for tollgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// database configuration.
    pub database: DatabaseConfig,

    /// query tuning.
    pub query: QueryConfig,
}

/// database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// database type: "sqlite" or "postgres".
    pub db_type: String,

    /// database connection string or file path.
    pub connection_string: String,

    /// sqlite-specific options.
    pub sqlite: SqliteConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: "sqlite".to_string(),
            connection_string: "/var/lib/tollgate/grants.sqlite".to_string(),
            sqlite: SqliteConfig::default(),
        }
    }
}

/// sqlite-specific options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// enable write-ahead logging.
    pub write_ahead_log: bool,
}

/// query tuning options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// how actor sets are turned into sql predicates.
    pub actor_filter: ActorFilter,
}

/// strategy for filtering rows by an actor set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorFilter {
    /// `(actor_type = ? AND actor_id IN (...)) OR ...`, one term per type.
    /// works on every backend.
    #[default]
    OrChain,

    /// `(actor_type, actor_id) IN ((?, ?), ...)`. needs row-value support
    /// (postgres, sqlite >= 3.15).
    RowValues,
}
