pub mod config;
pub mod database;

pub use config::{ConfigStore, Configurable, DatabaseSettings};
pub use database::{
    Database, DatabaseConfigError, DatabaseKind, DatabasePool, DatabaseTarget,
    default_database_path, get_database, get_database_with_path,
};
