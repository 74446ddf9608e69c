//! Use-case services over the taxonomy engine.
//!
//! # Responsibility
//! - Orchestrate remote round trips and local store mutations into one
//!   coherent entry point per operation.
//! - Keep UI layers decoupled from store/index bookkeeping.

pub mod taxonomy_service;
