//! Remote taxonomy contract and wire types.
//!
//! # Responsibility
//! - Mirror the backend's per-level CRUD shape: `POST /{level}`,
//!   `PUT /{level}/{code}`, `DELETE /{level}/{code}`, `GET /{level}`.
//! - Keep payload field naming (`parentCode`, `createdAt`) at this boundary
//!   only.
//!
//! # Invariants
//! - `code` is assigned by the remote side on create; drafts never carry one.
//! - The backend owns cascade semantics for its own storage; `delete` is
//!   issued for the cascade root only.

use crate::model::node::{Level, Node};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by remote collaborator calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote operation tag carried by error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    Create,
    Update,
    Delete,
    List,
}

impl Display for RemoteOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        };
        write!(f, "{name}")
    }
}

/// Errors from remote collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The collaborator refused the operation; its message is preserved
    /// verbatim for the UI layer.
    Rejected {
        op: RemoteOp,
        level: Level,
        message: String,
    },
    /// The call never produced a collaborator verdict (I/O, decode,
    /// configuration).
    Transport { op: RemoteOp, message: String },
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { op, level, message } => {
                write!(f, "remote rejected {op} at level {level}: {message}")
            }
            Self::Transport { op, message } => {
                write!(f, "remote {op} transport failure: {message}")
            }
        }
    }
}

impl Error for RemoteError {}

/// Mutation payload sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

impl NodeDraft {
    pub fn new(name: impl Into<String>, parent_code: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent_code,
        }
    }
}

/// Node payload returned by the collaborator. Level is implied by the
/// endpoint, so the wire shape does not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteNode {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub parent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl RemoteNode {
    /// Tags the wire payload with the level its endpoint implies.
    pub fn into_node(self, level: Level) -> Node {
        Node {
            level,
            code: self.code,
            name: self.name,
            parent_code: self.parent_code,
            created_at: self.created_at,
        }
    }
}

/// Per-level CRUD contract exposed by the remote collaborator.
///
/// Calls block until the backend answers; the engine treats a pending call
/// as blocking further mutations to the same node.
pub trait RemoteTaxonomy {
    /// `POST /{level}` — creates one node, returns it with its assigned code.
    fn create(&self, level: Level, draft: &NodeDraft) -> RemoteResult<RemoteNode>;
    /// `PUT /{level}/{code}` — updates name and, optionally, parent.
    fn update(&self, level: Level, code: &str, draft: &NodeDraft) -> RemoteResult<RemoteNode>;
    /// `DELETE /{level}/{code}` — deletes the node; the backend cascades on
    /// its side.
    fn delete(&self, level: Level, code: &str) -> RemoteResult<()>;
    /// `GET /{level}` — lists every node at one level.
    fn list(&self, level: Level) -> RemoteResult<Vec<RemoteNode>>;
}

impl<T: RemoteTaxonomy + ?Sized> RemoteTaxonomy for &T {
    fn create(&self, level: Level, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        (**self).create(level, draft)
    }

    fn update(&self, level: Level, code: &str, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        (**self).update(level, code, draft)
    }

    fn delete(&self, level: Level, code: &str) -> RemoteResult<()> {
        (**self).delete(level, code)
    }

    fn list(&self, level: Level) -> RemoteResult<Vec<RemoteNode>> {
        (**self).list(level)
    }
}
