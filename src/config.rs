//! Snapshot location configuration.
//!
//! Precedence, lowest to highest: YAML config file, `SCENARIO_REF_SNAPSHOT_<ENV>`
//! environment variables, explicit overrides from the command line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::environment::Environment;
use crate::snapshot::FileSnapshotSource;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "scenario-ref.yaml";

/// Prefix of the per-environment snapshot path variables
pub const SNAPSHOT_ENV_PREFIX: &str = "SCENARIO_REF_SNAPSHOT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environments: BTreeMap<Environment, EnvironmentConfig>,
}

impl Settings {
    /// Load `path`, resolving relative snapshot paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings: Settings =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for env_config in settings.environments.values_mut() {
            if let Some(snapshot) = env_config.snapshot.take() {
                env_config.snapshot = Some(if snapshot.is_relative() {
                    base.join(snapshot)
                } else {
                    snapshot
                });
            }
        }
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    /// Load the explicit config file, or the default one if it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("no config file, using environment variables only");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `SCENARIO_REF_SNAPSHOT_<ENV>` values produced by `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for env in Environment::ALL {
            let key = format!("{}{}", SNAPSHOT_ENV_PREFIX, env.label());
            if let Some(value) = lookup(&key).filter(|v| !v.trim().is_empty()) {
                self.set_snapshot(env, PathBuf::from(value.trim()));
            }
        }
    }

    pub fn set_snapshot(&mut self, env: Environment, path: PathBuf) {
        self.environments.entry(env).or_default().snapshot = Some(path);
    }

    pub fn snapshot_path(&self, env: Environment) -> Option<&Path> {
        self.environments
            .get(&env)
            .and_then(|c| c.snapshot.as_deref())
    }

    pub fn snapshot_source(&self) -> FileSnapshotSource {
        let paths = Environment::ALL
            .into_iter()
            .filter_map(|env| self.snapshot_path(env).map(|p| (env, p.to_path_buf())))
            .collect();
        FileSnapshotSource::new(paths)
    }
}
