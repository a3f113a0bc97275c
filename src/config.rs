//! # Seed Configuration
//!
//! Settings read from the environment (after `.env` has been loaded):
//!
//! - `DATABASE_URL`: Postgres connection string, required for a real seed run
//! - `SEED_DATA_PATH`: optional JSON file replacing the built-in seed data
//! - `SEED_MAX_CONNECTIONS`: pool size, defaults to 5

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub database_url: Option<String>,
    pub data_path: Option<PathBuf>,
    pub max_connections: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            data_path: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl SeedConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_connections = match non_empty("SEED_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("SEED_MAX_CONNECTIONS must be a number, got '{}'", raw))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(anyhow!("SEED_MAX_CONNECTIONS must be at least 1"));
        }

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            data_path: non_empty("SEED_DATA_PATH").map(PathBuf::from),
            max_connections,
        })
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))
    }
}
