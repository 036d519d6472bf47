//! Strategy contract
//!
//! The smallest capability a document-generation behavior must supply:
//! a synchronous `validate` and an async `execute`. The executor depends
//! only on this trait, never on a concrete behavior's internals.

use crate::validation::ValidationResult;
use serde::Serialize;

/// One output-generation behavior: a validate/execute pair
///
/// `Input` and `Output` are serializable so the executor can record input
/// key lists and output shapes in the trace without touching payload
/// values.
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    /// Input consumed by this strategy
    type Input: Serialize + Send + Sync;
    /// Output produced on success
    type Output: Serialize + Send;

    /// Strategy name, used as the trace owner
    fn name(&self) -> &str;

    /// Strategy version, used as the trace owner version
    fn version(&self) -> &str {
        "0.1.0"
    }

    /// Check the input before any work happens
    ///
    /// Must not perform I/O or mutate anything: the executor may discard
    /// the result list under fail-fast without re-running it.
    fn validate(&self, input: &Self::Input) -> ValidationResult;

    /// Produce the output; may suspend on I/O
    ///
    /// Only called after `validate` passed. Errors are caught by the
    /// executor and converted into a structured failure result.
    async fn execute(&self, input: &Self::Input) -> anyhow::Result<Self::Output>;
}
