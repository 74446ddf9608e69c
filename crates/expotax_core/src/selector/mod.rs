//! Dependent multi-step selection chains.
//!
//! # Responsibility
//! - Drive one picker per level of a hierarchy chain.
//! - Enforce the cascade-invalidate rule: an upstream change always resets
//!   every downstream selection, never the reverse.

pub mod cascade;
