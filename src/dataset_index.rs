use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::environment::Environment;
use crate::snapshot::{Collection, EnvironmentStore};

/// Where an identifier resolves to within one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub collection_id: String,
    pub collection_name: String,
    pub item_id: String,
    pub item_name: String,
}

/// Identifiers found by a `(collection name, item name)` lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItemIds {
    pub collection_id: String,
    pub item_id: String,
}

/// Read-only lookup view over one environment's snapshot.
///
/// Built fresh for every snapshot; it borrows the collections and is stale
/// once the snapshot is replaced.
pub struct DatasetIndex<'a> {
    collections: &'a [Collection],
    /// item id -> (collection position, item position); first occurrence wins
    by_id: HashMap<&'a str, (usize, usize)>,
}

impl<'a> DatasetIndex<'a> {
    pub fn build(collections: &'a [Collection]) -> Self {
        let mut by_id = HashMap::new();
        for (ci, collection) in collections.iter().enumerate() {
            for (ii, item) in collection.items.iter().enumerate() {
                by_id.entry(item.id.as_str()).or_insert((ci, ii));
            }
        }
        Self { collections, by_id }
    }

    pub fn collections(&self) -> &'a [Collection] {
        self.collections
    }

    pub fn by_identifier(&self, id: &str) -> Option<ResolvedItem> {
        let &(ci, ii) = self.by_id.get(id)?;
        let collection = &self.collections[ci];
        let item = &collection.items[ii];
        Some(ResolvedItem {
            collection_id: collection.id.clone(),
            collection_name: collection.name.clone(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
        })
    }

    /// First collection named `collection_name`, then its first item named
    /// `item_name`. Later collections sharing the name are not consulted.
    pub fn by_collection_and_item_name(
        &self,
        collection_name: &str,
        item_name: &str,
    ) -> Option<NamedItemIds> {
        let collection = self.collections.iter().find(|c| c.name == collection_name)?;
        let item = collection.items.iter().find(|i| i.name == item_name)?;
        Some(NamedItemIds {
            collection_id: collection.id.clone(),
            item_id: item.id.clone(),
        })
    }

    /// Items whose name contains `term`, ignoring case, in snapshot order.
    /// An empty term matches nothing.
    pub fn search_item_names(&self, term: &str) -> Vec<ResolvedItem> {
        if term.is_empty() {
            return Vec::new();
        }
        let needle = term.to_lowercase();

        self.collections
            .iter()
            .flat_map(|collection| {
                collection
                    .items
                    .iter()
                    .filter(|item| item.name.to_lowercase().contains(&needle))
                    .map(move |item| ResolvedItem {
                        collection_id: collection.id.clone(),
                        collection_name: collection.name.clone(),
                        item_id: item.id.clone(),
                        item_name: item.name.clone(),
                    })
            })
            .collect()
    }
}

/// One [`DatasetIndex`] per loaded environment.
pub struct IndexSet<'a> {
    indexes: Vec<(Environment, DatasetIndex<'a>)>,
}

impl<'a> IndexSet<'a> {
    pub fn from_store(store: &'a EnvironmentStore) -> Self {
        Self {
            indexes: store
                .loaded()
                .map(|(env, collections)| (env, DatasetIndex::build(collections)))
                .collect(),
        }
    }

    pub fn get(&self, env: Environment) -> Option<&DatasetIndex<'a>> {
        self.indexes
            .iter()
            .find(|(e, _)| *e == env)
            .map(|(_, index)| index)
    }

    /// Loaded environments in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (Environment, &DatasetIndex<'a>)> + '_ {
        self.indexes.iter().map(|(env, index)| (*env, index))
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
