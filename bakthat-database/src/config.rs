use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

/// Name of the section holding the database settings.
pub const DEFAULT_SECTION: &str = "default";

/// A typed view of one configuration section.
pub trait Configurable: DeserializeOwned + Default {
    /// TOML table the type is read from.
    const PREFIX: &'static str;
}

/// Read-only TOML configuration document.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    data: toml::Table,
    path: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore {
    pub fn empty() -> Self {
        Self {
            data: toml::Table::new(),
            path: None,
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let data: toml::Table = toml::from_str(content).context("failed to parse TOML config")?;
        Ok(Self { data, path: None })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration.");

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file `{}`", path.display()))?;
        let data: toml::Table = toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML in `{}`", path.display()))?;

        Ok(Self {
            data,
            path: Some(path.to_path_buf()),
        })
    }

    /// File the store was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.data.get(name).is_some_and(toml::Value::is_table)
    }

    /// Deserialize the section named by `C::PREFIX`, or `C::default()` when it is absent.
    pub fn get<C: Configurable>(&self) -> anyhow::Result<C> {
        debug!(section = C::PREFIX, "Loading config section.");

        match self.data.get(C::PREFIX) {
            Some(value) => value
                .clone()
                .try_into()
                .with_context(|| format!("failed to deserialize config section `{}`", C::PREFIX)),
            None => Ok(C::default()),
        }
    }
}

/// Scalar as a string, untouched. Blank strings, tables and arrays read as absent.
fn scalar_to_string(value: &toml::Value) -> Option<String> {
    let raw = match value {
        toml::Value::String(value) => value.clone(),
        toml::Value::Integer(value) => value.to_string(),
        toml::Value::Float(value) => value.to_string(),
        toml::Value::Boolean(value) => value.to_string(),
        toml::Value::Datetime(value) => value.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => return None,
    };

    Some(raw).filter(|value| !value.trim().is_empty())
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Database keys of the `[default]` section.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_type: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_host: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_name: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_user: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_pass: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub database_port: Option<String>,
}

impl Configurable for DatabaseSettings {
    const PREFIX: &'static str = DEFAULT_SECTION;
}
