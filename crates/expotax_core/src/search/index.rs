//! Recomputed-on-write hierarchy index.
//!
//! # Responsibility
//! - Maintain `by_parent` option lists for every node.
//! - Maintain one lower-cased search record per node that concatenates the
//!   node's own name with every ancestor name, so searching part of a
//!   línea's name also surfaces its sublíneas and áreas.
//!
//! # Invariants
//! - Record order per level equals the store's insertion order.
//! - An empty query returns the unfiltered level listing unchanged.

use crate::model::node::{Level, NodeKey};
use crate::store::taxonomy_store::{StoreResult, TaxonomyStore};
use std::collections::HashMap;

/// Flattened, searchable projection of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub level: Level,
    pub code: String,
    pub name: String,
    pub parent_code: Option<String>,
    /// Lower-cased haystack: own name plus every ancestor name.
    haystack: String,
}

impl SearchRecord {
    /// Returns this record's identity pair.
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.level, self.code.clone())
    }
}

/// Derived indices over one [`TaxonomyStore`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    by_parent: HashMap<NodeKey, Vec<String>>,
    records: Vec<Vec<SearchRecord>>,
}

impl HierarchyIndex {
    /// Builds the index from one store snapshot.
    pub fn build(store: &TaxonomyStore) -> StoreResult<Self> {
        let mut index = Self::default();
        index.rebuild(store)?;
        Ok(index)
    }

    /// Recomputes every derived structure from the store.
    ///
    /// Called after each store mutation; the whole tree is reference data
    /// at form-picker scale, so a full rebuild stays cheap.
    pub fn rebuild(&mut self, store: &TaxonomyStore) -> StoreResult<()> {
        let mut by_parent: HashMap<NodeKey, Vec<String>> = HashMap::new();
        let mut records: Vec<Vec<SearchRecord>> = vec![Vec::new(); store.depth()];

        for level in 0..store.depth() {
            let level = level as Level;
            for node in store.nodes_at(level) {
                if let Some(parent_key) = node.parent_key() {
                    by_parent
                        .entry(parent_key)
                        .or_default()
                        .push(node.code.clone());
                }

                let chain = store.ancestry_of(level, &node.code)?;
                let haystack = chain
                    .iter()
                    .map(|ancestor| ancestor.name.to_lowercase())
                    .collect::<Vec<_>>()
                    .join(" ");
                records[usize::from(level)].push(SearchRecord {
                    level,
                    code: node.code.clone(),
                    name: node.name.clone(),
                    parent_code: node.parent_code.clone(),
                    haystack,
                });
            }
        }

        self.by_parent = by_parent;
        self.records = records;
        Ok(())
    }

    /// Returns child codes under one parent, insertion order preserved.
    pub fn children(&self, level: Level, code: &str) -> &[String] {
        self.by_parent
            .get(&NodeKey::new(level, code))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns every code at one level, insertion order preserved.
    pub fn level_codes(&self, level: Level) -> Vec<String> {
        self.records
            .get(usize::from(level))
            .map(|records| records.iter().map(|record| record.code.clone()).collect())
            .unwrap_or_default()
    }

    /// Searches one level by case-insensitive substring.
    ///
    /// The haystack includes ancestor names, so a query matching a línea
    /// also returns its sublíneas and áreas at their own levels. An empty
    /// or blank query returns the full level listing in store order.
    pub fn search(&self, level: Level, query: &str) -> Vec<&SearchRecord> {
        let Some(records) = self.records.get(usize::from(level)) else {
            return Vec::new();
        };

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records.iter().collect();
        }
        records
            .iter()
            .filter(|record| record.haystack.contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::HierarchyIndex;
    use crate::model::node::Node;
    use crate::store::taxonomy_store::TaxonomyStore;

    fn indexed_store() -> (TaxonomyStore, HierarchyIndex) {
        let mut store = TaxonomyStore::new(3);
        store.upsert(Node::root("L1", "IA")).expect("línea");
        store
            .upsert(Node::child(1, "S1", "Deep Learning", "L1"))
            .expect("sublínea");
        store
            .upsert(Node::child(2, "A1", "Redes Neuronales", "S1"))
            .expect("área");
        let index = HierarchyIndex::build(&store).expect("index should build");
        (store, index)
    }

    #[test]
    fn children_lookup_follows_parent_links() {
        let (_, index) = indexed_store();
        assert_eq!(index.children(0, "L1"), ["S1"]);
        assert_eq!(index.children(1, "S1"), ["A1"]);
        assert!(index.children(1, "S9").is_empty());
    }

    #[test]
    fn search_matches_ancestor_names() {
        let (_, index) = indexed_store();

        let by_own_name = index.search(2, "redes");
        assert_eq!(by_own_name.len(), 1);
        assert_eq!(by_own_name[0].code, "A1");

        // "IA" is the root línea name; the área is reachable through it.
        let by_ancestor = index.search(2, "ia");
        assert!(by_ancestor.iter().any(|record| record.code == "A1"));
    }

    #[test]
    fn blank_query_is_identity() {
        let (store, index) = indexed_store();
        let all = index.search(0, "   ");
        assert_eq!(all.len(), store.len(0));
        assert_eq!(all[0].code, "L1");
    }
}
