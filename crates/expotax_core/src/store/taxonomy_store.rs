//! Taxonomy store: node CRUD and cascade delete.
//!
//! # Responsibility
//! - Hold the N-level parent/child reference tree in memory.
//! - Validate parent links on upsert and cascade removals down the tree.
//!
//! # Invariants
//! - Every non-root node's `parent_code` resolves to an existing node at
//!   exactly `level - 1`.
//! - Insertion order within one level is preserved and drives all listing
//!   and child-lookup order.
//! - Cascade delete collects the whole subtree before removing anything,
//!   then removes deepest-first, so no reader observes a dangling parent.

use crate::model::node::{Level, Node, NodeKey};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from taxonomy store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Node level is outside the tree depth configured at construction.
    LevelOutOfRange { level: Level, depth: usize },
    /// Non-root node was upserted without a parent code.
    MissingParent(NodeKey),
    /// Root-level node was upserted carrying a parent code.
    UnexpectedParent(NodeKey),
    /// Parent code does not resolve to an existing node one level up.
    InvalidParent { key: NodeKey, parent_code: String },
    /// Target node does not exist.
    NotFound(NodeKey),
    /// Ancestry traversal hit a dangling link. Indicates a prior invariant
    /// violation and is not routinely handled.
    BrokenChain { key: NodeKey, missing: NodeKey },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevelOutOfRange { level, depth } => {
                write!(f, "level {level} is outside tree depth {depth}")
            }
            Self::MissingParent(key) => {
                write!(f, "non-root node requires a parent code: {key}")
            }
            Self::UnexpectedParent(key) => {
                write!(f, "root node must not carry a parent code: {key}")
            }
            Self::InvalidParent { key, parent_code } => write!(
                f,
                "parent `{parent_code}` not found one level above {key}"
            ),
            Self::NotFound(key) => write!(f, "node not found: {key}"),
            Self::BrokenChain { key, missing } => {
                write!(f, "broken ancestor chain for {key}: missing {missing}")
            }
        }
    }
}

impl Error for StoreError {}

/// In-memory authoritative store for one N-level taxonomy tree.
#[derive(Debug, Clone)]
pub struct TaxonomyStore {
    levels: Vec<Vec<Node>>,
}

impl TaxonomyStore {
    /// Creates an empty store with a fixed tree depth.
    ///
    /// Depth is the number of levels, so a línea/sublínea/área tree uses
    /// `TaxonomyStore::new(3)`.
    pub fn new(depth: usize) -> Self {
        Self {
            levels: vec![Vec::new(); depth],
        }
    }

    /// Returns the configured number of levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Returns nodes at one level in insertion order.
    pub fn nodes_at(&self, level: Level) -> &[Node] {
        self.levels
            .get(usize::from(level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the node count at one level.
    pub fn len(&self, level: Level) -> usize {
        self.nodes_at(level).len()
    }

    /// Returns whether the whole tree is empty.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Returns one node by identity pair.
    pub fn get(&self, level: Level, code: &str) -> Option<&Node> {
        self.nodes_at(level).iter().find(|node| node.code == code)
    }

    /// Returns nodes at `level + 1` owned by `code`, insertion order
    /// preserved.
    pub fn children_of(&self, level: Level, code: &str) -> Vec<&Node> {
        let Some(child_level) = level.checked_add(1) else {
            return Vec::new();
        };
        self.nodes_at(child_level)
            .iter()
            .filter(|node| node.parent_code.as_deref() == Some(code))
            .collect()
    }

    /// Inserts or replaces one node by `(level, code)`.
    ///
    /// Replacement keeps the node's position within its level, so listing
    /// order stays stable across renames.
    pub fn upsert(&mut self, node: Node) -> StoreResult<()> {
        let level_index = usize::from(node.level);
        if level_index >= self.levels.len() {
            return Err(StoreError::LevelOutOfRange {
                level: node.level,
                depth: self.levels.len(),
            });
        }

        match (&node.parent_code, node.level) {
            (Some(_), 0) => return Err(StoreError::UnexpectedParent(node.key())),
            (None, level) if level > 0 => {
                return Err(StoreError::MissingParent(node.key()));
            }
            (Some(parent_code), level) => {
                if self.get(level - 1, parent_code).is_none() {
                    return Err(StoreError::InvalidParent {
                        key: node.key(),
                        parent_code: parent_code.clone(),
                    });
                }
            }
            (None, _) => {}
        }

        let slot = &mut self.levels[level_index];
        match slot.iter_mut().find(|existing| existing.code == node.code) {
            Some(existing) => *existing = node,
            None => slot.push(node),
        }
        Ok(())
    }

    /// Removes one node and every transitive descendant.
    ///
    /// Descendants are collected breadth-first before any removal happens,
    /// then removed deepest-first. Returns every removed `(level, code)`
    /// pair so callers can reconcile dependent selector state.
    pub fn remove(&mut self, level: Level, code: &str) -> StoreResult<Vec<NodeKey>> {
        let root_key = NodeKey::new(level, code);
        if self.get(level, code).is_none() {
            return Err(StoreError::NotFound(root_key));
        }

        let mut doomed = vec![root_key];
        let mut frontier = 0;
        while frontier < doomed.len() {
            let parent = doomed[frontier].clone();
            for child in self.children_of(parent.level, &parent.code) {
                doomed.push(child.key());
            }
            frontier += 1;
        }

        let mut removed = doomed;
        removed.sort_by(|a, b| b.level.cmp(&a.level));
        for key in &removed {
            self.levels[usize::from(key.level)].retain(|node| node.code != key.code);
        }
        Ok(removed)
    }

    /// Returns the full ancestor chain root→node, ending with the node
    /// itself.
    ///
    /// A dangling ancestor link yields `BrokenChain`; given the upsert
    /// invariant this indicates a bug, not a routine condition.
    pub fn ancestry_of(&self, level: Level, code: &str) -> StoreResult<Vec<&Node>> {
        let key = NodeKey::new(level, code);
        let node = self
            .get(level, code)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        let mut chain = vec![node];
        let mut cursor = node;
        while let Some(parent_key) = cursor.parent_key() {
            let parent = self
                .get(parent_key.level, &parent_key.code)
                .ok_or_else(|| StoreError::BrokenChain {
                    key: key.clone(),
                    missing: parent_key.clone(),
                })?;
            chain.push(parent);
            cursor = parent;
        }
        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaxonomyStore};
    use crate::model::node::Node;

    fn three_level_store() -> TaxonomyStore {
        let mut store = TaxonomyStore::new(3);
        store.upsert(Node::root("L1", "IA")).expect("línea");
        store
            .upsert(Node::child(1, "S1", "Deep Learning", "L1"))
            .expect("sublínea");
        store
            .upsert(Node::child(2, "A1", "Redes Neuronales", "S1"))
            .expect("área");
        store
    }

    #[test]
    fn upsert_rejects_missing_parent_reference() {
        let mut store = TaxonomyStore::new(3);
        let err = store
            .upsert(Node::child(1, "S1", "Deep Learning", "L9"))
            .expect_err("orphan parent reference should fail");
        assert!(matches!(err, StoreError::InvalidParent { .. }));
    }

    #[test]
    fn upsert_rejects_parent_on_root_level() {
        let mut store = TaxonomyStore::new(3);
        let mut node = Node::root("L1", "IA");
        node.parent_code = Some("X".to_string());
        let err = store.upsert(node).expect_err("root with parent should fail");
        assert!(matches!(err, StoreError::UnexpectedParent(_)));
    }

    #[test]
    fn upsert_rejects_level_beyond_depth() {
        let mut store = TaxonomyStore::new(2);
        let err = store
            .upsert(Node::child(2, "A1", "Área", "S1"))
            .expect_err("level 2 in depth-2 tree should fail");
        assert!(matches!(err, StoreError::LevelOutOfRange { level: 2, depth: 2 }));
    }

    #[test]
    fn replacement_keeps_level_position() {
        let mut store = TaxonomyStore::new(1);
        store.upsert(Node::root("L1", "IA")).expect("first");
        store.upsert(Node::root("L2", "Robótica")).expect("second");
        store
            .upsert(Node::root("L1", "Inteligencia Artificial"))
            .expect("rename in place");

        let codes: Vec<&str> = store.nodes_at(0).iter().map(|n| n.code.as_str()).collect();
        assert_eq!(codes, vec!["L1", "L2"]);
        assert_eq!(store.get(0, "L1").expect("L1").name, "Inteligencia Artificial");
    }

    #[test]
    fn remove_returns_not_found_for_missing_node() {
        let mut store = three_level_store();
        let err = store.remove(1, "S9").expect_err("missing node should fail");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn ancestry_length_equals_level_plus_one() {
        let store = three_level_store();
        let chain = store.ancestry_of(2, "A1").expect("full chain");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].code, "L1");
        assert_eq!(chain[2].code, "A1");
    }
}
