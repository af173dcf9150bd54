//! Scenario-level comparison between environments.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::environment::Environment;
use crate::snapshot::{Collection, EnvironmentStore};

/// A scenario as it appears in one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPresence {
    pub collection_id: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionComparison {
    pub collection_name: String,
    /// Every environment is present; `None` when absent or not loaded
    pub environments: BTreeMap<Environment, Option<CollectionPresence>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub loaded: Vec<Environment>,
    pub unique_collections: usize,
    /// Sorted by collection name
    pub collections: Vec<CollectionComparison>,
}

/// Every scenario of one environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionListing {
    pub environment: Environment,
    pub total_collections: usize,
    pub collections: Vec<Collection>,
}

pub fn list_collections(env: Environment, collections: &[Collection]) -> CollectionListing {
    CollectionListing {
        environment: env,
        total_collections: collections.len(),
        collections: collections.to_vec(),
    }
}

/// Compare scenario names across every loaded environment.
///
/// When a snapshot holds several scenarios with the same name, the first one
/// represents it.
pub fn compare_environments(store: &EnvironmentStore) -> ComparisonResult {
    let names: BTreeSet<&str> = store
        .loaded()
        .flat_map(|(_, collections)| collections.iter().map(|c| c.name.as_str()))
        .collect();

    let collections = names
        .into_iter()
        .map(|name| CollectionComparison {
            collection_name: name.to_string(),
            environments: Environment::ALL
                .into_iter()
                .map(|env| {
                    let presence = store
                        .snapshot(env)
                        .and_then(|cs| cs.iter().find(|c| c.name == name))
                        .map(|c| CollectionPresence {
                            collection_id: c.id.clone(),
                            item_count: c.items.len(),
                        });
                    (env, presence)
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    ComparisonResult {
        loaded: store.loaded().map(|(env, _)| env).collect(),
        unique_collections: collections.len(),
        collections,
    }
}
