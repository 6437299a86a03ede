//! Configuration for runwire.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $RUNWIRE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/runwire/config.toml
//!   3. ~/.config/runwire/config.toml

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunwireConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the run service, without a trailing slash.
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// User API key. Used as the basic-auth user when listing teams.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Team name to run under. None = the personal team.
    pub default_team: Option<String>,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://api.readme.build/api/v1";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot create config {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot render default config: {0}")]
    Render(#[from] toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RunwireConfig {
    /// Load config from the default location: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path())
    }

    /// Load config from an explicit file. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config: RunwireConfig = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                RunwireConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Default config file path, resolved from the process environment.
    pub fn file_path() -> PathBuf {
        resolve_path(|key| std::env::var(key).ok())
    }

    /// Write a default config to `path` unless a file is already there.
    ///
    /// Returns `true` when a new file was written. An existing file is never
    /// touched, even if it fails to parse.
    pub fn write_default_to(path: &Path) -> Result<bool, ConfigError> {
        let create_err = |source: std::io::Error| ConfigError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_err)?;
        }
        let text = toml::to_string_pretty(&RunwireConfig::default())?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(create_err(e)),
        };
        file.write_all(text.as_bytes()).map_err(create_err)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(true)
    }

    /// Apply RUNWIRE_* overrides, looked up through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("RUNWIRE_API__BASE_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = var("RUNWIRE_AUTH__API_KEY") {
            self.auth.api_key = Some(v);
        }
        if let Some(v) = var("RUNWIRE_RUN__TEAM") {
            self.run.default_team = Some(v);
        }
    }
}

/// `$RUNWIRE_CONFIG`, else `<config home>/runwire/config.toml` where the
/// config home is `$XDG_CONFIG_HOME` or `$HOME/.config`. Empty values count
/// as unset.
fn resolve_path(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    let var = |key: &str| var(key).filter(|v| !v.is_empty());
    if let Some(explicit) = var("RUNWIRE_CONFIG") {
        return PathBuf::from(explicit);
    }
    let config_home = var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| Path::new(&home).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    config_home.join("runwire").join("config.toml")
}
