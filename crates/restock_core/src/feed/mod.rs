//! View-state layer mirroring the persistent catalog.
//!
//! # Responsibility
//! - Keep a sorted in-memory snapshot of the store.
//! - Orchestrate add/delete/import mutations and observer notification.
//!
//! # Invariants
//! - Observers hear `will_change` before any mutation is applied and
//!   `did_change` after the snapshot has been refreshed.

pub mod product_feed;
