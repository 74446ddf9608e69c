//! Domain model for the level-tagged taxonomy tree.
//!
//! # Responsibility
//! - Define the canonical node record shared by store, index and remote layers.
//! - Keep one shape for every level of the hierarchy.
//!
//! # Invariants
//! - A node is identified by its `(level, code)` pair, never by code alone.
//! - `parent_code` always references the level directly above.

pub mod node;
