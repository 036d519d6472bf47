//! Quill Handoff Coordinator
//!
//! Versioned "please continue this work" packages between actors,
//! optionally carrying an execution-trace snapshot as evidence.
//!
//! # Core Concepts
//!
//! - [`HandoffPackage`]: immutable, versioned delegation request
//! - [`HandoffCoordinator`]: builds/parses packages and tracks pending
//!   ones in a private, per-instance registry
//! - [`HandoffError`]: parse-boundary failures; missing or incompatible
//!   versions are rejected, never silently accepted
//!
//! # Example
//!
//! ```rust
//! use quill_handoff::{HandoffCoordinator, HandoffPriority, HandoffRequest};
//!
//! let mut coordinator = HandoffCoordinator::new();
//! let package = coordinator.prepare_handoff(
//!     HandoffRequest::new("planner", "writer", "Draft the proposal.")
//!         .with_priority(HandoffPriority::Immediate)
//!         .with_expiration_minutes(30),
//! );
//! let id = coordinator.register(package);
//! assert_eq!(coordinator.pending_for_agent("writer").len(), 1);
//! assert!(coordinator.get(id).is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod coordinator;
mod markdown;
mod package;
mod wire;

// Re-exports
pub use coordinator::HandoffCoordinator;
pub use package::{
    HandoffId, HandoffInstructions, HandoffPackage, HandoffPriority, HandoffRequest,
    HandoffStatus, SCHEMA_VERSION,
};
pub use wire::{to_json, HandoffError};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static GLOBAL_COORDINATOR: Lazy<Mutex<HandoffCoordinator>> =
    Lazy::new(|| Mutex::new(HandoffCoordinator::new()));

/// Process-wide convenience coordinator
///
/// The core logic never assumes this is the only instance: independent
/// coordinators constructed with [`HandoffCoordinator::new`] are fully
/// isolated from it and from each other.
#[must_use]
pub fn global() -> &'static Mutex<HandoffCoordinator> {
    &GLOBAL_COORDINATOR
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
