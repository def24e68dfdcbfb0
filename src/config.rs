//! Configuration-scoped paths: where the API token and the snapshot cache
//! live on disk.
//!
//! The default location is `~/.config/taskmirror/`. The `TM_CONFIG_DIR`
//! environment variable overrides it, which is how integration tests keep
//! themselves out of the user's real config directory.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TM_CONFIG_DIR";

/// Environment variable overriding the remote endpoint (self-hosted
/// instances, stub servers in tests).
pub const API_URL_ENV: &str = "TM_API_URL";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    api_url: Option<String>,
}

impl Config {
    /// Resolve the config directory (`TM_CONFIG_DIR` > `~/.config/taskmirror`)
    /// and the optional endpoint override (`TM_API_URL`).
    pub fn resolve() -> Result<Self> {
        let api_url = std::env::var(API_URL_ENV).ok();
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(Self {
                dir: dir.into(),
                api_url,
            });
        }
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))?;
        Ok(Self {
            dir: base.join("taskmirror"),
            api_url,
        })
    }

    /// Use an explicit directory (dependency injection for tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            api_url: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remote endpoint override, when one is configured.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Path of the serialized snapshot.
    pub fn cache_path(&self) -> PathBuf {
        self.dir.join("cache.json")
    }

    /// Path of the API token file.
    pub fn token_path(&self) -> PathBuf {
        self.dir.join("api_key")
    }

    /// Read the API token. The token is an opaque string; surrounding
    /// whitespace (trailing newline, typically) is stripped, nothing else.
    pub fn read_token(&self) -> Result<String> {
        let path = self.token_path();
        let raw =
            std::fs::read_to_string(&path).map_err(|_| Error::MissingToken(path.clone()))?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(Error::MissingToken(path));
        }
        Ok(token.to_string())
    }
}
