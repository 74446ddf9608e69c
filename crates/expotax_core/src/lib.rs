//! Hierarchical taxonomy engine for dependent multi-level selection.
//!
//! One parameterized implementation of the pattern behind research
//! línea/sublínea/área management, materia→grupo→docente auto-assignment
//! and departamento→ciudad pickers: an authoritative N-level reference
//! tree with cascade delete, derived search indices, cascading selectors
//! and a remote synchronization seam.

pub mod logging;
pub mod model;
pub mod remote;
pub mod search;
pub mod selector;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::node::{Level, Node, NodeKey};
pub use remote::api::{
    NodeDraft, RemoteError, RemoteNode, RemoteOp, RemoteResult, RemoteTaxonomy,
};
pub use remote::http::HttpRemoteTaxonomy;
pub use remote::memory::InMemoryRemote;
pub use search::index::{HierarchyIndex, SearchRecord};
pub use selector::cascade::{CascadingSelector, DeriveFn, SelectorError, SelectorResult};
pub use service::taxonomy_service::{ServiceError, ServiceResult, TaxonomyService};
pub use store::taxonomy_store::{StoreError, StoreResult, TaxonomyStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
