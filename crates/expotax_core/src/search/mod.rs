//! Derived hierarchy indices and joined-level search.
//!
//! # Responsibility
//! - Expose children-by-parent lookups for dependent pickers.
//! - Provide substring search that also matches ancestor names.
//!
//! # Invariants
//! - The index is derived state, rebuilt after every store mutation; it
//!   never outlives the store snapshot it was built from.

pub mod index;
