//! In-memory remote collaborator.
//!
//! # Responsibility
//! - Stand in for the REST backend in tests, demos and offline runs.
//! - Mint codes on create the way the real backend does.
//!
//! # Invariants
//! - Delete cascades inside this fake's own storage, matching the assumed
//!   server-side cascade semantics.
//! - A queued rejection fires on the next matching operation only, then
//!   clears.

use crate::model::node::Level;
use crate::remote::api::{NodeDraft, RemoteError, RemoteNode, RemoteOp, RemoteResult, RemoteTaxonomy};
use std::cell::RefCell;
use uuid::Uuid;

/// In-memory `RemoteTaxonomy` implementation with uuid-minted codes.
///
/// Interior mutability keeps the trait's `&self` surface; the engine is
/// single-threaded by design, so no locking is involved.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    levels: RefCell<Vec<Vec<RemoteNode>>>,
    queued_rejection: RefCell<Option<(RemoteOp, String)>>,
}

impl InMemoryRemote {
    /// Creates an empty fake backend with a fixed level count.
    pub fn new(depth: usize) -> Self {
        Self {
            levels: RefCell::new(vec![Vec::new(); depth]),
            queued_rejection: RefCell::new(None),
        }
    }

    /// Queues one rejection for the next call of the given operation.
    pub fn reject_next(&self, op: RemoteOp, message: impl Into<String>) {
        *self.queued_rejection.borrow_mut() = Some((op, message.into()));
    }

    /// Returns the node count at one level, for test assertions.
    pub fn len(&self, level: Level) -> usize {
        self.levels
            .borrow()
            .get(usize::from(level))
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Returns whether the fake backend holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.levels.borrow().iter().all(Vec::is_empty)
    }

    fn take_rejection(&self, op: RemoteOp, level: Level) -> RemoteResult<()> {
        let mut queued = self.queued_rejection.borrow_mut();
        if queued.as_ref().is_some_and(|(queued_op, _)| *queued_op == op) {
            let (_, message) = queued.take().expect("checked above");
            return Err(RemoteError::Rejected { op, level, message });
        }
        Ok(())
    }

    fn ensure_level(&self, op: RemoteOp, level: Level) -> RemoteResult<()> {
        if usize::from(level) >= self.levels.borrow().len() {
            return Err(RemoteError::Transport {
                op,
                message: format!("no collection configured for level {level}"),
            });
        }
        Ok(())
    }
}

impl RemoteTaxonomy for InMemoryRemote {
    fn create(&self, level: Level, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        self.ensure_level(RemoteOp::Create, level)?;
        self.take_rejection(RemoteOp::Create, level)?;

        let node = RemoteNode {
            code: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            parent_code: draft.parent_code.clone(),
            created_at: None,
        };
        self.levels.borrow_mut()[usize::from(level)].push(node.clone());
        Ok(node)
    }

    fn update(&self, level: Level, code: &str, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        self.ensure_level(RemoteOp::Update, level)?;
        self.take_rejection(RemoteOp::Update, level)?;

        let mut levels = self.levels.borrow_mut();
        let slot = &mut levels[usize::from(level)];
        let Some(node) = slot.iter_mut().find(|node| node.code == code) else {
            return Err(RemoteError::Rejected {
                op: RemoteOp::Update,
                level,
                message: format!("unknown code `{code}`"),
            });
        };
        node.name = draft.name.clone();
        if draft.parent_code.is_some() {
            node.parent_code = draft.parent_code.clone();
        }
        Ok(node.clone())
    }

    fn delete(&self, level: Level, code: &str) -> RemoteResult<()> {
        self.ensure_level(RemoteOp::Delete, level)?;
        self.take_rejection(RemoteOp::Delete, level)?;

        let mut levels = self.levels.borrow_mut();
        let found = levels[usize::from(level)]
            .iter()
            .any(|node| node.code == code);
        if !found {
            return Err(RemoteError::Rejected {
                op: RemoteOp::Delete,
                level,
                message: format!("unknown code `{code}`"),
            });
        }

        // Server-side cascade mirror: drop the node, then sweep orphaned
        // descendants level by level.
        let mut doomed = vec![code.to_string()];
        levels[usize::from(level)].retain(|node| node.code != code);
        for child_level in usize::from(level) + 1..levels.len() {
            let next_doomed: Vec<String> = levels[child_level]
                .iter()
                .filter(|node| {
                    node.parent_code
                        .as_ref()
                        .is_some_and(|parent| doomed.contains(parent))
                })
                .map(|node| node.code.clone())
                .collect();
            levels[child_level].retain(|node| !next_doomed.contains(&node.code));
            doomed = next_doomed;
        }
        Ok(())
    }

    fn list(&self, level: Level) -> RemoteResult<Vec<RemoteNode>> {
        self.ensure_level(RemoteOp::List, level)?;
        self.take_rejection(RemoteOp::List, level)?;
        Ok(self.levels.borrow()[usize::from(level)].clone())
    }
}
