//! shared database, config and logging arguments.

use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::eyre::{Context, Result, bail};
use tollgate_db::TollgateDb;
use tollgate_types::{Config, DatabaseConfig};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

/// default config file search paths (in order of priority).
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "/etc/tollgate/config.toml",
    "~/.config/tollgate/config.toml",
    "./config.toml",
];

/// arguments every command takes to reach the grant store
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// path to config file
    #[arg(short, long, env = "TOLLGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// database url (sqlite:///path or postgres://...)
    #[arg(long, env = "TOLLGATE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// log level
    #[arg(long, env = "TOLLGATE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl DbArgs {
    /// resolve configuration.
    ///
    /// priority order: defaults -> config file -> cli flags
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match load_config_file(self.config.as_deref())? {
            Some(file_config) => {
                debug!("loaded configuration from file");
                file_config
            }
            None => {
                debug!("no config file found, using defaults");
                Config::default()
            }
        };

        if let Some(db_url) = &self.database_url {
            config.database = parse_database_url(db_url)?;
        }

        Ok(config)
    }

    /// install the global log subscriber (defaults to info).
    pub fn init_logging(&self) -> Result<()> {
        let log_level = match self.log_level.as_deref().map(str::to_lowercase).as_deref() {
            Some("trace") => Level::TRACE,
            Some("debug") => Level::DEBUG,
            Some("warn") => Level::WARN,
            Some("error") => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }

    /// set up logging, then open (and migrate) the grant store.
    pub async fn connect(&self) -> Result<TollgateDb> {
        self.init_logging()?;
        let config = self.load_config()?;
        info!(
            db_type = %config.database.db_type,
            actor_filter = ?config.query.actor_filter,
            "opening grant store"
        );
        TollgateDb::new(&config)
            .await
            .context("failed to open grant store")
    }
}

/// find and load config file, returning none if no config file is found.
pub fn load_config_file(config_path: Option<&Path>) -> Result<Option<Config>> {
    // if explicit path provided, it must exist
    if let Some(path) = config_path {
        return read_config(path).map(Some);
    }

    // search default paths
    for path_str in CONFIG_SEARCH_PATHS {
        let path = expand_tilde::expand_tilde(path_str)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| PathBuf::from(path_str));
        if path.exists() {
            debug!("found config file at {:?}", path);
            return read_config(&path).map(Some);
        }
    }

    Ok(None)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config file: {:?}", path))
}

/// parse a database url into a database config.
pub fn parse_database_url(db_url: &str) -> Result<DatabaseConfig> {
    let parsed =
        url::Url::parse(db_url).with_context(|| format!("invalid database URL: {}", db_url))?;

    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(DatabaseConfig {
            db_type: "postgres".to_string(),
            connection_string: db_url.to_string(),
            ..Default::default()
        }),
        "sqlite" => {
            // extract path from sqlite:// url
            let path = parsed.path();
            Ok(DatabaseConfig {
                db_type: "sqlite".to_string(),
                connection_string: path.to_string(),
                ..Default::default()
            })
        }
        scheme => bail!(
            "unsupported database scheme '{}', expected 'sqlite' or 'postgres'",
            scheme
        ),
    }
}
