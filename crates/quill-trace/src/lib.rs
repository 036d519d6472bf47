//! Quill Execution Trace
//!
//! Append-only, per-invocation audit trail for strategy executions.
//!
//! # Core Concepts
//!
//! - [`ExecutionTrace`]: ordered record of one execution's decisions,
//!   metrics, warnings, and errors
//! - [`TraceData`]: immutable structured snapshot, loss-free over serde
//! - [`sanitize`]: coercion of arbitrary caller-supplied context into
//!   guaranteed-serializable form; sanitization never fails
//!
//! # Example
//!
//! ```rust
//! use quill_trace::ExecutionTrace;
//! use serde_json::json;
//!
//! let mut trace = ExecutionTrace::new("architecture-spec", "1.0.0");
//! trace.record_decision("template", "selected C4 layout", Some(json!({ "candidates": 3 })));
//! trace.increment_metric("sections_rendered");
//! trace.complete();
//!
//! let snapshot = trace.to_data();
//! assert_eq!(snapshot.summary.total_decisions, 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod export;
mod trace;

pub mod sanitize;

// Re-exports
pub use export::{TraceData, TraceSummary};
pub use trace::{Decision, DecisionId, ErrorEntry, ExecutionId, ExecutionTrace, WarningEntry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
