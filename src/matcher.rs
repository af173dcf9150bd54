//! Cross-environment correlation of a single block.
//!
//! Block identifiers are environment-local database keys: promoting a
//! scenario to another environment recreates its blocks under new ids but
//! the same names. The source environment is resolved by identifier; every
//! other environment is correlated by `(scenario name, block name)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset_index::IndexSet;
use crate::environment::Environment;

/// How a [`MatchedItem`] was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// The environment the identifier was resolved in
    Source,
    /// Found by name and carries the queried identifier
    SameIdentifier,
    /// Found by name under a different identifier
    NameOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedItem {
    pub collection_id: String,
    pub collection_name: String,
    pub item_id: String,
    pub item_name: String,
    pub correlation: Correlation,
}

/// The same logical block across every environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub identifier: String,
    /// Environment the identifier was resolved in, if any
    pub source: Option<Environment>,
    pub collection_name: Option<String>,
    pub item_name: Option<String>,
    /// One entry per environment, `None` when absent or not loaded
    pub environments: BTreeMap<Environment, Option<MatchedItem>>,
}

impl MatchResult {
    fn not_found(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            source: None,
            collection_name: None,
            item_name: None,
            environments: Environment::ALL.into_iter().map(|env| (env, None)).collect(),
        }
    }

    pub fn found_count(&self) -> usize {
        self.environments.values().filter(|m| m.is_some()).count()
    }

    pub fn get(&self, env: Environment) -> Option<&MatchedItem> {
        self.environments.get(&env).and_then(Option::as_ref)
    }
}

/// Locate the block `identifier` (as known in `source`) in every environment.
///
/// If `source` is not loaded or does not know the identifier, every
/// environment is reported absent.
pub fn match_across_environments(
    identifier: &str,
    source: Environment,
    indexes: &IndexSet<'_>,
) -> MatchResult {
    let Some(origin) = indexes.get(source).and_then(|index| index.by_identifier(identifier)) else {
        tracing::debug!(identifier, %source, "identifier not resolvable in source environment");
        return MatchResult::not_found(identifier);
    };

    let mut environments = BTreeMap::new();
    for env in Environment::ALL {
        let entry = if env == source {
            Some(MatchedItem {
                collection_id: origin.collection_id.clone(),
                collection_name: origin.collection_name.clone(),
                item_id: origin.item_id.clone(),
                item_name: origin.item_name.clone(),
                correlation: Correlation::Source,
            })
        } else {
            indexes
                .get(env)
                .and_then(|index| {
                    index.by_collection_and_item_name(&origin.collection_name, &origin.item_name)
                })
                .map(|ids| {
                    let correlation = if ids.item_id == identifier {
                        Correlation::SameIdentifier
                    } else {
                        Correlation::NameOnly
                    };
                    MatchedItem {
                        collection_id: ids.collection_id,
                        collection_name: origin.collection_name.clone(),
                        item_id: ids.item_id,
                        item_name: origin.item_name.clone(),
                        correlation,
                    }
                })
        };
        environments.insert(env, entry);
    }

    MatchResult {
        identifier: identifier.to_string(),
        source: Some(source),
        collection_name: Some(origin.collection_name),
        item_name: Some(origin.item_name),
        environments,
    }
}
