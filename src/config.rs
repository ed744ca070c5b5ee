//! Command-line arguments and the on-disk configuration file.

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

/// Directory name used under the platform config and data dirs.
pub const APP_DIR: &str = "campus-sphere";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "CAMPUS_SPHERE_API_KEY";

/// Command-line arguments.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "campus-sphere")]
#[command(about = "Join your college network from the terminal")]
pub struct Cli {
    /// Use a local in-memory identity provider instead of the network
    #[arg(long)]
    pub offline: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON.
    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The platform has no config directory and no `--config` was given.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// The platform has no data directory.
    #[error("could not determine data directory")]
    NoDataDir,
}

/// Contents of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Web API key of the identity provider project.
    pub api_key: Option<String>,
    /// `tracing` filter directive, e.g. `campus_sphere=debug`.
    pub log_filter: Option<String>,
}

impl ConfigFile {
    /// Loads `path`, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key for the identity provider; `None` forces offline mode.
    pub api_key: Option<String>,
    /// Log filter from the config file. `RUST_LOG` still wins at init.
    pub log_filter: Option<String>,
    /// Directory holding the session cache and the log file.
    pub data_dir: PathBuf,
    /// Whether `--offline` was passed.
    pub offline: bool,
}

impl Config {
    /// Resolves configuration from the CLI, the config file, the
    /// environment and the platform directories.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(APP_DIR)
                .join("config.json"),
        };
        let file = ConfigFile::load(&config_path)?;
        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join(APP_DIR);
        let env_key = std::env::var(API_KEY_ENV).ok();
        Ok(Self::from_sources(file, env_key, data_dir, cli.offline))
    }

    /// Combines already-loaded sources. The environment key beats the file.
    pub fn from_sources(
        file: ConfigFile,
        env_key: Option<String>,
        data_dir: PathBuf,
        offline: bool,
    ) -> Self {
        let api_key = non_blank(env_key).or_else(|| non_blank(file.api_key));
        Self {
            api_key,
            log_filter: non_blank(file.log_filter),
            data_dir,
            offline,
        }
    }

    /// Returns `true` if the network provider should be used.
    pub fn use_network(&self) -> bool {
        !self.offline && self.api_key.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
