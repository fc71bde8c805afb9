use std::{env, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};

pub const DATA_DIR_ENV: &str = "CLOSELY_DATA_DIR";
pub const STORAGE_ENV: &str = "CLOSELY_STORAGE";
pub const DEBUG_ENV: &str = "CLOSELY_DEBUG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    Sqlite,
    Json,
    Memory,
    /// No durable storage; every load is empty and writes are dropped.
    None,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Sqlite => "sqlite",
            StorageKind::Json => "json",
            StorageKind::Memory => "memory",
            StorageKind::None => "none",
        }
    }
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "json" => Ok(StorageKind::Json),
            "memory" => Ok(StorageKind::Memory),
            "none" => Ok(StorageKind::None),
            other => Err(anyhow!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageKind::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let storage = match lookup(STORAGE_ENV) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => StorageKind::default(),
        };

        let debug = lookup(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            data_dir,
            storage,
            debug,
        })
    }
}

fn default_data_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".closely"),
        _ => PathBuf::from(".closely"),
    }
}
