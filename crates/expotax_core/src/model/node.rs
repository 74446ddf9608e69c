//! Taxonomy node model.
//!
//! # Responsibility
//! - Define the canonical record for every tree level (line, sub-line,
//!   thematic area, or any other reference hierarchy bound to the engine).
//!
//! # Invariants
//! - `code` is assigned by the remote collaborator on creation and is
//!   immutable afterwards.
//! - `code` is unique within its level only; two levels may coincidentally
//!   share a code.
//! - `parent_code` is `None` exactly when `level == 0`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Tree depth position. Level `0` is the root reference level.
pub type Level = u8;

/// Identity pair for one node: level plus level-scoped code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub level: Level,
    pub code: String,
}

impl NodeKey {
    pub fn new(level: Level, code: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
        }
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "level {} code `{}`", self.level, self.code)
    }
}

/// Canonical record for one taxonomy node.
///
/// Field names serialize camelCase to match the remote collaborator's
/// payload shape (`parentCode`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Depth position, fixed at creation.
    pub level: Level,
    /// Remote-assigned identity, unique within `level`.
    pub code: String,
    /// Human-readable label, mutable.
    pub name: String,
    /// Owning node at `level - 1`. `None` only at the root level.
    pub parent_code: Option<String>,
    /// Remote creation timestamp, display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Node {
    /// Creates a root-level node (no parent).
    pub fn root(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            level: 0,
            code: code.into(),
            name: name.into(),
            parent_code: None,
            created_at: None,
        }
    }

    /// Creates a node under one parent code at `level - 1`.
    pub fn child(
        level: Level,
        code: impl Into<String>,
        name: impl Into<String>,
        parent_code: impl Into<String>,
    ) -> Self {
        Self {
            level,
            code: code.into(),
            name: name.into(),
            parent_code: Some(parent_code.into()),
            created_at: None,
        }
    }

    /// Returns this node's identity pair.
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.level, self.code.clone())
    }

    /// Returns the parent identity pair, when one exists.
    pub fn parent_key(&self) -> Option<NodeKey> {
        let parent_code = self.parent_code.as_ref()?;
        let parent_level = self.level.checked_sub(1)?;
        Some(NodeKey::new(parent_level, parent_code.clone()))
    }
}
