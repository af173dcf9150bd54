//! Free-text block search across every loaded environment.
//!
//! A term that is a known block identifier anywhere switches to
//! cross-environment matching; otherwise block names are searched by
//! case-insensitive substring. Identifier mode wins even when the term would
//! also match names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset_index::{IndexSet, ResolvedItem};
use crate::environment::Environment;
use crate::matcher::{match_across_environments, MatchResult};

/// Ids of a grouped block in one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentIds {
    pub collection_id: String,
    pub item_id: String,
}

/// One logical block (scenario name + block name) compared across environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub collection_name: String,
    pub item_name: String,
    /// Every environment is present; `None` when the block was not found there
    pub environments: BTreeMap<Environment, Option<EnvironmentIds>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSearchResult {
    pub term: String,
    pub total_hits: usize,
    /// Raw hits per loaded environment, in snapshot order
    pub hits: BTreeMap<Environment, Vec<ResolvedItem>>,
    /// Hits grouped by `(collection_name, item_name)`, sorted by that key
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchOutcome {
    Identifier(MatchResult),
    Name(NameSearchResult),
}

/// First loaded environment (declared order) that knows `identifier`.
pub fn find_identifier_source(identifier: &str, indexes: &IndexSet<'_>) -> Option<Environment> {
    if identifier.is_empty() {
        return None;
    }
    indexes
        .iter()
        .find(|(_, index)| index.by_identifier(identifier).is_some())
        .map(|(env, _)| env)
}

/// Case-insensitive substring search of block names in each environment,
/// grouped across environments.
pub fn search_by_name(term: &str, indexes: &IndexSet<'_>) -> NameSearchResult {
    let hits: BTreeMap<Environment, Vec<ResolvedItem>> = indexes
        .iter()
        .map(|(env, index)| (env, index.search_item_names(term)))
        .collect();

    let mut groups: BTreeMap<(String, String), BTreeMap<Environment, Option<EnvironmentIds>>> =
        BTreeMap::new();
    for (env, env_hits) in &hits {
        for hit in env_hits {
            let row = groups
                .entry((hit.collection_name.clone(), hit.item_name.clone()))
                .or_insert_with(|| Environment::ALL.into_iter().map(|e| (e, None)).collect());
            let slot = row.entry(*env).or_insert(None);
            // first hit per environment wins
            if slot.is_none() {
                *slot = Some(EnvironmentIds {
                    collection_id: hit.collection_id.clone(),
                    item_id: hit.item_id.clone(),
                });
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|((collection_name, item_name), environments)| ComparisonRow {
            collection_name,
            item_name,
            environments,
        })
        .collect();

    NameSearchResult {
        term: term.to_string(),
        total_hits: hits.values().map(Vec::len).sum(),
        hits,
        rows,
    }
}

/// Identifier mode if the term resolves anywhere, name mode otherwise.
pub fn search(term: &str, indexes: &IndexSet<'_>) -> SearchOutcome {
    match find_identifier_source(term, indexes) {
        Some(source) => {
            tracing::debug!(term, %source, "term is a block identifier");
            SearchOutcome::Identifier(match_across_environments(term, source, indexes))
        }
        None => SearchOutcome::Name(search_by_name(term, indexes)),
    }
}
