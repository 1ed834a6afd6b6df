use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{ConfigStore, DatabaseSettings};

/// File name of the embedded database, placed in the user's home directory.
pub const DEFAULT_DATABASE_FILE: &str = ".bakthat.sqlite";

/// Keys that must all be set when `database_type = "mysql"`.
pub const MYSQL_REQUIRED_KEYS: [&str; 5] = [
    "database_host",
    "database_name",
    "database_user",
    "database_pass",
    "database_port",
];

const MAX_CONNECTIONS: u32 = 5;

/// Path of the embedded database used when no networked engine is configured.
pub fn default_database_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_default()
        .join(DEFAULT_DATABASE_FILE)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatabaseConfigError {
    #[error("mysql database requires all of {missing:?} in the [default] section")]
    IncompleteMySql { missing: Vec<&'static str> },
    #[error("database_port `{0}` is not a valid port number")]
    InvalidPort(String),
    #[error("unreadable [default] section: {0}")]
    InvalidSection(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    MySql,
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Sqlite => write!(f, "sqlite"),
            DatabaseKind::MySql => write!(f, "mysql"),
        }
    }
}

/// Connection settings of a networked MySQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseTarget {
    Sqlite { path: PathBuf },
    MySql(MySqlSettings),
}

/// Database handle selected from configuration.
///
/// Holds the connection descriptor only; [`Database::connect`] opens the pool
/// and the caller owns its lifecycle from there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Database {
    target: DatabaseTarget,
}

impl Database {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            target: DatabaseTarget::Sqlite { path: path.into() },
        }
    }

    pub fn mysql(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            target: DatabaseTarget::MySql(MySqlSettings {
                host: host.into(),
                port,
                name: name.into(),
                user: user.into(),
                password: password.into(),
            }),
        }
    }

    pub fn kind(&self) -> DatabaseKind {
        match self.target {
            DatabaseTarget::Sqlite { .. } => DatabaseKind::Sqlite,
            DatabaseTarget::MySql(_) => DatabaseKind::MySql,
        }
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }

    /// Open a connection pool for this target. SQLite files are created on demand.
    pub async fn connect(&self) -> anyhow::Result<DatabasePool> {
        match &self.target {
            DatabaseTarget::Sqlite { path } => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect_with(options)
                    .await
                    .with_context(|| {
                        format!("failed to open sqlite database `{}`", path.display())
                    })?;
                info!(path = %path.display(), "SQLite connection established.");
                Ok(DatabasePool::Sqlite(pool))
            }
            DatabaseTarget::MySql(settings) => {
                let options = MySqlConnectOptions::new()
                    .host(&settings.host)
                    .port(settings.port)
                    .username(&settings.user)
                    .password(&settings.password)
                    .database(&settings.name);
                let pool = MySqlPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect_with(options)
                    .await
                    .with_context(|| {
                        format!(
                            "failed to connect to mysql database `{}` on {}:{}",
                            settings.name, settings.host, settings.port
                        )
                    })?;
                info!(
                    host = %settings.host,
                    port = settings.port,
                    database = %settings.name,
                    "MySQL connection established."
                );
                Ok(DatabasePool::MySql(pool))
            }
        }
    }
}

/// Open pool for either engine.
#[derive(Clone, Debug)]
pub enum DatabasePool {
    Sqlite(SqlitePool),
    MySql(MySqlPool),
}

impl DatabasePool {
    pub fn kind(&self) -> DatabaseKind {
        match self {
            DatabasePool::Sqlite(_) => DatabaseKind::Sqlite,
            DatabasePool::MySql(_) => DatabaseKind::MySql,
        }
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match self {
            DatabasePool::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::MySql(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }

        Ok(())
    }

    pub async fn close(&self) {
        match self {
            DatabasePool::Sqlite(pool) => pool.close().await,
            DatabasePool::MySql(pool) => pool.close().await,
        }
    }
}

/// Select the database handle described by the `[default]` section of `config`.
///
/// Without a `database_type` the embedded engine at [`default_database_path`]
/// is used. `mysql` requires every key in [`MYSQL_REQUIRED_KEYS`]; any other
/// value selects the embedded engine.
pub fn get_database(config: &ConfigStore) -> Result<Database, DatabaseConfigError> {
    get_database_with_path(config, default_database_path())
}

/// [`get_database`] with an explicit embedded database path.
pub fn get_database_with_path(
    config: &ConfigStore,
    sqlite_path: impl AsRef<Path>,
) -> Result<Database, DatabaseConfigError> {
    let settings: DatabaseSettings = config.get().map_err(|err| {
        error!(?err, "Failed to read database settings.");
        DatabaseConfigError::InvalidSection(format!("{err:#}"))
    })?;
    let sqlite_path = sqlite_path.as_ref();

    let Some(database_type) = settings.database_type.as_deref() else {
        info!(path = %sqlite_path.display(), "Defaulting to using SQLite.");
        return Ok(Database::sqlite(sqlite_path));
    };

    match database_type {
        "mysql" => mysql_from_settings(&settings),
        "sqlite" => Ok(Database::sqlite(sqlite_path)),
        other => {
            warn!(
                database_type = other,
                path = %sqlite_path.display(),
                "Unknown database_type; using SQLite."
            );
            Ok(Database::sqlite(sqlite_path))
        }
    }
}

fn mysql_from_settings(settings: &DatabaseSettings) -> Result<Database, DatabaseConfigError> {
    let (Some(host), Some(name), Some(user), Some(password), Some(port)) = (
        &settings.database_host,
        &settings.database_name,
        &settings.database_user,
        &settings.database_pass,
        &settings.database_port,
    ) else {
        let values = [
            &settings.database_host,
            &settings.database_name,
            &settings.database_user,
            &settings.database_pass,
            &settings.database_port,
        ];
        let missing: Vec<&'static str> = MYSQL_REQUIRED_KEYS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();

        error!(
            ?missing,
            "You must specify all config options if using mysql database."
        );
        return Err(DatabaseConfigError::IncompleteMySql { missing });
    };

    let port = port.parse::<u16>().map_err(|_| {
        error!(database_port = %port, "database_port is not a valid port number.");
        DatabaseConfigError::InvalidPort(port.clone())
    })?;

    Ok(Database::mysql(name, host, port, user, password))
}
