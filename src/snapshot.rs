//! Scenario snapshots and the retrieval boundary.
//!
//! A snapshot is the full list of scenarios (collections) of one environment,
//! each with its blocks (items). Snapshots come from a [`SnapshotSource`] and
//! are held by the [`EnvironmentStore`] for the lifetime of the process.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::environment::Environment;

/// Error types for snapshot retrieval and decoding
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Cannot read snapshot '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Data source rejected the request (code: {}): {message}", .code.as_deref().unwrap_or("N/A"))]
    Api {
        code: Option<String>,
        message: String,
    },
    #[error("Response has no 'data' field")]
    MissingData,
    #[error("Unrecognized response shape: 'data' is neither a list nor an object with 'items'")]
    UnrecognizedShape,
    #[error("No snapshot source configured for environment '{0}'")]
    NotConfigured(Environment),
}

/// A block within a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A scenario: a named, ordered group of blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Decode a data source response envelope into its collections.
///
/// Accepts `{"data": [...]}` and `{"data": {"items": [...]}}`. A
/// `{"status": "fail", "data": {"code", "message"}}` envelope becomes
/// [`SnapshotError::Api`].
pub fn decode_envelope(json: &str) -> Result<Vec<Collection>, SnapshotError> {
    let envelope: Value = serde_json::from_str(json)?;

    if envelope.get("status").and_then(Value::as_str) == Some("fail") {
        let error = envelope.get("data");
        let code = error.and_then(|d| d.get("code")).map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        let message = error
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(SnapshotError::Api { code, message });
    }

    let data = envelope.get("data").ok_or(SnapshotError::MissingData)?;
    let collections = match data {
        Value::Array(_) => data,
        Value::Object(map) => match map.get("items") {
            Some(items @ Value::Array(_)) => items,
            _ => return Err(SnapshotError::UnrecognizedShape),
        },
        _ => return Err(SnapshotError::UnrecognizedShape),
    };

    Ok(Vec::<Collection>::deserialize(collections)?)
}

/// Retrieval collaborator: produces one environment's snapshot.
pub trait SnapshotSource {
    fn fetch_snapshot(&self, env: Environment) -> Result<Vec<Collection>, SnapshotError>;
}

/// Reads one JSON response envelope file per environment.
#[derive(Debug, Default, Clone)]
pub struct FileSnapshotSource {
    paths: BTreeMap<Environment, PathBuf>,
}

impl FileSnapshotSource {
    pub fn new(paths: BTreeMap<Environment, PathBuf>) -> Self {
        Self { paths }
    }

    pub fn with_path(mut self, env: Environment, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(env, path.into());
        self
    }

    pub fn path(&self, env: Environment) -> Option<&Path> {
        self.paths.get(&env).map(PathBuf::as_path)
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn fetch_snapshot(&self, env: Environment) -> Result<Vec<Collection>, SnapshotError> {
        let path = self.path(env).ok_or(SnapshotError::NotConfigured(env))?;
        tracing::debug!(%env, path = %path.display(), "reading snapshot file");
        let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        decode_envelope(&json)
    }
}

/// In-memory snapshots, at most one per environment.
///
/// An environment without an entry is "not loaded", which is distinct from a
/// loaded snapshot that happens to contain no collections.
#[derive(Debug, Default)]
pub struct EnvironmentStore {
    snapshots: BTreeMap<Environment, Vec<Collection>>,
}

impl EnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `env` unless it is already loaded. Returns whether a snapshot is
    /// present afterwards; a failed fetch leaves the environment absent.
    pub fn ensure_loaded(&mut self, env: Environment, source: &dyn SnapshotSource) -> bool {
        if self.snapshots.contains_key(&env) {
            return true;
        }
        self.reload(env, source)
    }

    /// Fetch `env` again, replacing any previous snapshot. On failure the
    /// previous snapshot is dropped.
    pub fn reload(&mut self, env: Environment, source: &dyn SnapshotSource) -> bool {
        match source.fetch_snapshot(env) {
            Ok(collections) => {
                tracing::info!(%env, collections = collections.len(), "loaded snapshot");
                self.snapshots.insert(env, collections);
                true
            }
            Err(e) => {
                tracing::warn!(%env, error = %e, "snapshot unavailable");
                self.snapshots.remove(&env);
                false
            }
        }
    }

    pub fn ensure_all_loaded(&mut self, source: &dyn SnapshotSource) {
        for env in Environment::ALL {
            self.ensure_loaded(env, source);
        }
    }

    pub fn insert(&mut self, env: Environment, collections: Vec<Collection>) {
        self.snapshots.insert(env, collections);
    }

    pub fn snapshot(&self, env: Environment) -> Option<&[Collection]> {
        self.snapshots.get(&env).map(Vec::as_slice)
    }

    pub fn is_loaded(&self, env: Environment) -> bool {
        self.snapshots.contains_key(&env)
    }

    /// Loaded snapshots in declared environment order.
    pub fn loaded(&self) -> impl Iterator<Item = (Environment, &[Collection])> + '_ {
        Environment::ALL
            .into_iter()
            .filter_map(move |env| self.snapshot(env).map(|s| (env, s)))
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
