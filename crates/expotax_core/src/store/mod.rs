//! Authoritative in-memory taxonomy state.
//!
//! # Responsibility
//! - Own every node of the reference tree exclusively.
//! - Enforce parent-link integrity on every write.
//!
//! # Invariants
//! - No mutation path exists outside [`taxonomy_store::TaxonomyStore`].
//! - Removal is always a full-subtree cascade, never a single node with
//!   surviving children.

pub mod taxonomy_store;
