//! Taxonomy synchronization service.
//!
//! # Responsibility
//! - Mirror local mutations to the remote collaborator and reconcile the
//!   store after each round trip.
//! - Rebuild derived indices after every successful mutation.
//!
//! # Invariants
//! - Two-phase discipline: the store is never mutated speculatively ahead
//!   of remote confirmation. A rejected call leaves local state untouched.
//! - Cascade delete issues exactly one remote call, for the cascade root;
//!   the backend owns cascading on its side.

use crate::model::node::{Level, Node, NodeKey};
use crate::remote::api::{NodeDraft, RemoteError, RemoteTaxonomy};
use crate::search::index::{HierarchyIndex, SearchRecord};
use crate::store::taxonomy_store::{StoreError, TaxonomyStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from taxonomy service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Name is blank after trimming.
    InvalidName,
    /// Target node does not exist locally.
    NodeNotFound(NodeKey),
    /// Referenced parent does not exist locally.
    ParentNotFound(NodeKey),
    /// Operation at this level requires a parent code.
    ParentRequired(Level),
    /// Root-level operation must not carry a parent code.
    ParentNotAllowed(Level),
    /// The remote collaborator refused or failed the call.
    Remote(RemoteError),
    /// Store-level failure outside the mapped semantic cases.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::NodeNotFound(key) => write!(f, "node not found: {key}"),
            Self::ParentNotFound(key) => write!(f, "parent not found: {key}"),
            Self::ParentRequired(level) => {
                write!(f, "level {level} requires a parent code")
            }
            Self::ParentNotAllowed(level) => {
                write!(f, "level {level} must not carry a parent code")
            }
            Self::Remote(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for ServiceError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::NodeNotFound(key),
            StoreError::InvalidParent { key, parent_code } => {
                let parent_level = key.level.saturating_sub(1);
                Self::ParentNotFound(NodeKey::new(parent_level, parent_code))
            }
            other => Self::Store(other),
        }
    }
}

/// Synchronization facade binding one store to one remote collaborator.
pub struct TaxonomyService<R: RemoteTaxonomy> {
    remote: R,
    store: TaxonomyStore,
    index: HierarchyIndex,
}

impl<R: RemoteTaxonomy> TaxonomyService<R> {
    /// Creates an empty service over a tree of `depth` levels.
    pub fn new(remote: R, depth: usize) -> Self {
        Self {
            remote,
            store: TaxonomyStore::new(depth),
            index: HierarchyIndex::default(),
        }
    }

    /// Returns the authoritative store (read-only).
    pub fn store(&self) -> &TaxonomyStore {
        &self.store
    }

    /// Returns the derived index (read-only).
    pub fn index(&self) -> &HierarchyIndex {
        &self.index
    }

    /// Searches one level through the derived index.
    pub fn search(&self, level: Level, query: &str) -> Vec<&SearchRecord> {
        self.index.search(level, query)
    }

    /// Seeds the store from the remote collection of every level.
    ///
    /// Levels load root-first so parent validation holds throughout; the
    /// current store is replaced only after the whole fetch succeeds.
    pub fn hydrate(&mut self) -> ServiceResult<()> {
        let depth = self.store.depth();
        let mut fresh = TaxonomyStore::new(depth);
        for level in 0..depth {
            let level = level as Level;
            for remote_node in self.remote.list(level)? {
                fresh.upsert(remote_node.into_node(level))?;
            }
        }

        self.store = fresh;
        self.index.rebuild(&self.store)?;
        info!(
            "event=taxonomy_hydrate module=service status=ok levels={} nodes={}",
            depth,
            (0..depth).map(|level| self.store.len(level as Level)).sum::<usize>()
        );
        Ok(())
    }

    /// Creates one node: remote first, then local upsert.
    ///
    /// The parent is validated locally before the round trip so a rejected
    /// draft never reaches the backend.
    pub fn create(
        &mut self,
        level: Level,
        name: impl Into<String>,
        parent_code: Option<&str>,
    ) -> ServiceResult<Node> {
        let name = normalize_name(name.into())?;
        self.check_parent(level, parent_code)?;

        let draft = NodeDraft::new(name, parent_code.map(str::to_string));
        let created = match self.remote.create(level, &draft) {
            Ok(created) => created,
            Err(err) => {
                warn!("event=taxonomy_create module=service status=rejected level={level} reason={err}");
                return Err(err.into());
            }
        };

        let node = created.into_node(level);
        self.store.upsert(node.clone())?;
        self.index.rebuild(&self.store)?;
        info!(
            "event=taxonomy_create module=service status=ok level={} code={}",
            level, node.code
        );
        Ok(node)
    }

    /// Renames one node in place, keeping its parent.
    pub fn rename(
        &mut self,
        level: Level,
        code: &str,
        name: impl Into<String>,
    ) -> ServiceResult<Node> {
        let name = normalize_name(name.into())?;
        let current = self.require_node(level, code)?;

        let draft = NodeDraft::new(name, current.parent_code.clone());
        let updated = self.remote.update(level, code, &draft)?;

        let node = updated.into_node(level);
        self.store.upsert(node.clone())?;
        self.index.rebuild(&self.store)?;
        info!(
            "event=taxonomy_rename module=service status=ok level={} code={}",
            level, node.code
        );
        Ok(node)
    }

    /// Moves one non-root node under a different parent at `level - 1`.
    ///
    /// Descendants follow implicitly since they reference the node's code,
    /// which never changes.
    pub fn reparent(
        &mut self,
        level: Level,
        code: &str,
        new_parent_code: &str,
    ) -> ServiceResult<Node> {
        if level == 0 {
            return Err(ServiceError::ParentNotAllowed(0));
        }
        let current = self.require_node(level, code)?;
        self.check_parent(level, Some(new_parent_code))?;

        let draft = NodeDraft::new(current.name, Some(new_parent_code.to_string()));
        let updated = self.remote.update(level, code, &draft)?;

        let node = updated.into_node(level);
        self.store.upsert(node.clone())?;
        self.index.rebuild(&self.store)?;
        info!(
            "event=taxonomy_reparent module=service status=ok level={} code={} parent={}",
            level, node.code, new_parent_code
        );
        Ok(node)
    }

    /// Deletes one node and its whole subtree.
    ///
    /// Phase 1 is the remote delete of the cascade root; only after it
    /// succeeds does phase 2 run the local cascade-remove. Returns every
    /// removed key so live selectors can reconcile.
    pub fn delete(&mut self, level: Level, code: &str) -> ServiceResult<Vec<NodeKey>> {
        self.require_node(level, code)?;

        if let Err(err) = self.remote.delete(level, code) {
            warn!("event=taxonomy_delete module=service status=rejected level={level} code={code} reason={err}");
            return Err(err.into());
        }

        let removed = self.store.remove(level, code)?;
        self.index.rebuild(&self.store)?;
        info!(
            "event=taxonomy_delete module=service status=ok level={} code={} removed={}",
            level,
            code,
            removed.len()
        );
        Ok(removed)
    }

    fn require_node(&self, level: Level, code: &str) -> ServiceResult<Node> {
        self.store
            .get(level, code)
            .cloned()
            .ok_or_else(|| ServiceError::NodeNotFound(NodeKey::new(level, code)))
    }

    fn check_parent(&self, level: Level, parent_code: Option<&str>) -> ServiceResult<()> {
        match (level, parent_code) {
            (0, None) => Ok(()),
            (0, Some(_)) => Err(ServiceError::ParentNotAllowed(0)),
            (level, None) => Err(ServiceError::ParentRequired(level)),
            (level, Some(parent_code)) => {
                let parent_level = level - 1;
                if self.store.get(parent_level, parent_code).is_none() {
                    return Err(ServiceError::ParentNotFound(NodeKey::new(
                        parent_level,
                        parent_code,
                    )));
                }
                Ok(())
            }
        }
    }
}

fn normalize_name(value: String) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
