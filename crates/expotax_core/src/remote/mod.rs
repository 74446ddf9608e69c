//! Remote collaborator seam.
//!
//! # Responsibility
//! - Define the request/response contract the engine consumes per level
//!   (`create`, `update`, `delete`, `list`).
//! - Ship one HTTP-backed and one in-memory implementation.
//!
//! # Invariants
//! - The engine never mutates local state ahead of remote confirmation;
//!   implementations only report success after the backend committed.
//! - Rejection messages surface verbatim to the caller.

pub mod api;
pub mod http;
pub mod memory;
