use std::env;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bakthat_database::config::DEFAULT_SECTION;
use bakthat_database::{ConfigStore, DatabaseTarget, get_database};
use bakthat_utils::formatting::{describe_interval, format_interval};
use bakthat_utils::interval_string_to_seconds;
use bakthat_utils::time::unix_secs_before;

const DEFAULT_CONFIG_FILE: &str = ".bakthat.toml";

#[derive(Parser)]
#[command(name = "bakthat")]
#[command(version)]
#[command(about = "Backup helper utilities")]
struct Args {
    /// Configuration file (TOML, database keys under `[default]`)
    #[arg(long, env = "BAKTHAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an interval expression such as `1M3W4h2s` to seconds
    Interval { expression: String },
    /// Show the configured database backend
    Database {
        /// Open the database and run a health check
        #[arg(long)]
        connect: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        within_info_level && !metadata.target().starts_with("sqlx::query")
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    // Load the .env file before clap reads BAKTHAT_CONFIG
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match args.command {
        Command::Interval { expression } => {
            let seconds = interval_string_to_seconds(&expression)?;
            println!("{seconds}");
            println!("canonical: {}", format_interval(seconds));
            println!("reads as: {}", describe_interval(seconds));
            println!("cutoff: {}", unix_secs_before(seconds));
        }
        Command::Database { connect } => {
            let config = load_config(args.config)?;
            if let Some(path) = config.path() {
                println!("config {}", path.display());
            }
            if !config.has_section(DEFAULT_SECTION) {
                info!("No [default] table in configuration.");
            }

            let db = get_database(&config)?;

            match db.target() {
                DatabaseTarget::Sqlite { path } => {
                    println!("sqlite {}", path.display());
                }
                DatabaseTarget::MySql(settings) => {
                    println!(
                        "mysql {}@{}:{}/{}",
                        settings.user, settings.host, settings.port, settings.name
                    );
                }
            }

            if connect {
                let pool = db.connect().await?;
                pool.ping().await.context("database health check failed")?;
                info!(kind = %pool.kind(), "Database health check passed.");
                pool.close().await;
            }
        }
    }

    Ok(())
}

fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<ConfigStore> {
    if let Some(path) = explicit {
        return ConfigStore::from_file(path);
    }

    let Some(home) = env::var_os("HOME") else {
        warn!("HOME is not set; using an empty configuration.");
        return Ok(ConfigStore::empty());
    };

    let path = PathBuf::from(home).join(DEFAULT_CONFIG_FILE);
    if path.exists() {
        ConfigStore::from_file(path)
    } else {
        info!(path = %path.display(), "No configuration file found; using defaults.");
        Ok(ConfigStore::empty())
    }
}
