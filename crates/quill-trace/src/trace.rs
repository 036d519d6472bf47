//! Append-only execution traces
//!
//! One [`ExecutionTrace`] records everything a single strategy run decided,
//! measured, and tripped over:
//! - Decisions with free-form sanitized context
//! - Named numeric metrics (last write wins, increments supported)
//! - Warnings (non-blocking) and errors (accumulating)
//!
//! Entries are append-only and ordered by the wall-clock time of the
//! recording call. Exports are defensive copies; mutating an exported
//! snapshot never affects the live trace.

use crate::export::{TraceData, TraceSummary};
use crate::sanitize;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ulid::Ulid;

/// Unique execution identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub Ulid);

impl ExecutionId {
    /// Generate new execution ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique decision identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Ulid);

impl DecisionId {
    /// Generate new decision ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single recorded decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Decision ID
    pub id: DecisionId,
    /// When the decision was recorded
    pub timestamp: DateTime<Utc>,
    /// Free-form category used for filtering
    pub category: String,
    /// What was decided
    pub description: String,
    /// Sanitized caller-supplied context
    pub context: Map<String, Value>,
}

/// A recorded error
///
/// `stack` carries the joined `source()` chain when the entry was derived
/// from an error value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    /// When the error was recorded
    pub timestamp: DateTime<Utc>,
    /// Error category (typically the error's type name)
    pub category: String,
    /// Error message
    pub message: String,
    /// Cause chain, if one was available
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack: Option<String>,
    /// Sanitized caller-supplied context
    pub context: Map<String, Value>,
}

/// A recorded warning, non-blocking and summarized separately from errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningEntry {
    /// When the warning was recorded
    pub timestamp: DateTime<Utc>,
    /// Warning message
    pub message: String,
    /// Sanitized caller-supplied context
    pub context: Map<String, Value>,
}

/// Append-only, per-invocation execution trace
///
/// Created at the start of one strategy run and owned exclusively by it.
/// Never reused across runs.
#[derive(Debug, Clone)]
pub struct ExecutionTrace {
    execution_id: ExecutionId,
    strategy_name: String,
    strategy_version: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    decisions: Vec<Decision>,
    metrics: IndexMap<String, f64>,
    warnings: Vec<WarningEntry>,
    errors: Vec<ErrorEntry>,
}

impl ExecutionTrace {
    /// Create a trace starting now
    #[inline]
    #[must_use]
    pub fn new(strategy_name: impl Into<String>, strategy_version: impl Into<String>) -> Self {
        Self::with_start_time(strategy_name, strategy_version, Utc::now())
    }

    /// Create a trace with an explicit start time
    #[must_use]
    pub fn with_start_time(
        strategy_name: impl Into<String>,
        strategy_version: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            execution_id: ExecutionId::new(),
            strategy_name: strategy_name.into(),
            strategy_version: strategy_version.into(),
            started_at,
            completed_at: None,
            decisions: Vec::new(),
            metrics: IndexMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Execution ID
    #[inline]
    #[must_use]
    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    /// Owning strategy name
    #[inline]
    #[must_use]
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Owning strategy version
    #[inline]
    #[must_use]
    pub fn strategy_version(&self) -> &str {
        &self.strategy_version
    }

    /// Start timestamp
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Completion timestamp, `None` until [`complete`](Self::complete)
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Recorded decisions, in insertion order
    #[inline]
    #[must_use]
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Recorded metrics, in insertion order
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &IndexMap<String, f64> {
        &self.metrics
    }

    /// Recorded errors, in insertion order
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    /// Recorded warnings, in insertion order
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[WarningEntry] {
        &self.warnings
    }

    /// Append a decision entry and return the stored entry
    pub fn record_decision(
        &mut self,
        category: impl Into<String>,
        description: impl Into<String>,
        context: Option<Value>,
    ) -> &Decision {
        let decision = Decision {
            id: DecisionId::new(),
            timestamp: Utc::now(),
            category: category.into(),
            description: description.into(),
            context: sanitize::sanitize_context(context),
        };
        self.decisions.push(decision);
        &self.decisions[self.decisions.len() - 1]
    }

    /// Set a metric, overwriting any prior value for that name
    pub fn record_metric(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.insert(name.into(), value);
    }

    /// Add 1 to a metric, initializing it to 1 if absent
    pub fn increment_metric(&mut self, name: &str) {
        self.increment_metric_by(name, 1.0);
    }

    /// Add `amount` to a metric, initializing from 0 if absent
    ///
    /// Negative amounts decrement.
    pub fn increment_metric_by(&mut self, name: &str, amount: f64) {
        *self.metrics.entry(name.to_string()).or_insert(0.0) += amount;
    }

    /// Append an error entry and return the stored entry
    ///
    /// Errors accumulate; earlier entries are never overwritten.
    pub fn record_error(
        &mut self,
        category: impl Into<String>,
        message: impl Into<String>,
        stack: Option<String>,
        context: Option<Value>,
    ) -> &ErrorEntry {
        let entry = ErrorEntry {
            timestamp: Utc::now(),
            category: category.into(),
            message: message.into(),
            stack,
            context: sanitize::sanitize_context(context),
        };
        tracing::debug!(category = %entry.category, message = %entry.message, "trace error recorded");
        self.errors.push(entry);
        &self.errors[self.errors.len() - 1]
    }

    /// Append an error entry derived from an error value
    ///
    /// The category is the error's type name (last path segment), the stack
    /// is the joined `source()` chain.
    pub fn record_error_source<E>(&mut self, error: &E, context: Option<Value>) -> &ErrorEntry
    where
        E: std::error::Error + ?Sized,
    {
        let category = short_type_name::<E>();
        let stack = source_chain(error);
        self.record_error(category, error.to_string(), stack, context)
    }

    /// Append a warning entry and return the stored entry
    pub fn record_warning(
        &mut self,
        message: impl Into<String>,
        context: Option<Value>,
    ) -> &WarningEntry {
        let entry = WarningEntry {
            timestamp: Utc::now(),
            message: message.into(),
            context: sanitize::sanitize_context(context),
        };
        self.warnings.push(entry);
        &self.warnings[self.warnings.len() - 1]
    }

    /// Mark the trace complete and record `total_duration_ms`
    ///
    /// Idempotent: the first call pins the completion timestamp; later
    /// calls are no-ops, keeping [`duration_ms`](Self::duration_ms) stable.
    pub fn complete(&mut self) {
        if self.completed_at.is_some() {
            return;
        }
        let now = Utc::now();
        self.completed_at = Some(now);
        let elapsed = (now - self.started_at).num_milliseconds().max(0);
        self.record_metric("total_duration_ms", elapsed as f64);
        tracing::debug!(execution_id = %self.execution_id, duration_ms = elapsed, "trace completed");
    }

    /// Elapsed milliseconds: `(completed ?? now) - started`
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds().max(0) as u64
    }

    /// Exact, case-sensitive filter over recorded decisions
    #[must_use]
    pub fn decisions_by_category(&self, category: &str) -> Vec<&Decision> {
        self.decisions
            .iter()
            .filter(|decision| decision.category == category)
            .collect()
    }

    /// Entry counts by kind
    #[must_use]
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            total_decisions: self.decisions.len(),
            total_errors: self.errors.len(),
            total_warnings: self.warnings.len(),
        }
    }

    /// Export an immutable structured snapshot
    ///
    /// All collections are owned copies; mutating the snapshot never
    /// affects the live trace.
    #[must_use]
    pub fn to_data(&self) -> TraceData {
        TraceData {
            execution_id: self.execution_id,
            strategy_name: self.strategy_name.clone(),
            strategy_version: self.strategy_version.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            decisions: self.decisions.clone(),
            metrics: self.metrics.clone(),
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
            summary: self.summary(),
        }
    }

    /// Render the human-readable report for this trace
    #[must_use]
    pub fn to_markdown(&self) -> String {
        self.to_data().to_markdown()
    }
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

fn source_chain<E>(error: &E) -> Option<String>
where
    E: std::error::Error + ?Sized,
{
    let mut frames = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        frames.push(cause.to_string());
        source = cause.source();
    }
    if frames.is_empty() {
        None
    } else {
        Some(frames.join("\ncaused by: "))
    }
}
