//! Handoff package types
//!
//! A [`HandoffPackage`] is a versioned "please continue this work" request
//! from one actor to another, optionally carrying a trace snapshot as
//! evidence. Packages are built once by a coordinator and mutated only
//! through status updates.

use chrono::{DateTime, Utc};
use quill_trace::TraceData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use ulid::Ulid;

/// Schema version stamped on every package this crate produces
pub const SCHEMA_VERSION: &str = "1.0";

/// Unique handoff identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandoffId(pub Ulid);

impl HandoffId {
    /// Generate new handoff ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for HandoffId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandoffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a handoff package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    /// Waiting for the target actor to pick it up
    Pending,
    /// Target actor has accepted the work
    Accepted,
    /// Work is underway
    InProgress,
    /// Work finished
    Completed,
    /// Target actor declined
    Rejected,
}

impl HandoffStatus {
    /// Wire string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transitions are expected
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a handoff package
///
/// Listing order ranks priority descending; `Immediate` work surfaces
/// ahead of `Normal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HandoffPriority {
    /// Background work
    Low,
    /// Default tier
    #[default]
    Normal,
    /// Elevated
    High,
    /// Jump the queue
    Immediate,
}

impl HandoffPriority {
    /// Wire string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Immediate => "immediate",
        }
    }
}

impl fmt::Display for HandoffPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the target actor is being asked to do
///
/// A bare instruction string normalizes into `{ task }`. The deadline is
/// typed so it re-hydrates into a live timestamp on parse; any other
/// instruction keys ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffInstructions {
    /// The task being delegated
    pub task: String,
    /// Constraints the target must honor
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub constraints: Vec<String>,
    /// When the work is due
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Any further instruction fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HandoffInstructions {
    /// Create instructions with just a task
    #[must_use]
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            constraints: Vec::new(),
            deadline: None,
            extra: Map::new(),
        }
    }

    /// Add a constraint
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Set a deadline
    #[inline]
    #[must_use]
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach an extra instruction field
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl From<&str> for HandoffInstructions {
    fn from(task: &str) -> Self {
        Self::new(task)
    }
}

impl From<String> for HandoffInstructions {
    fn from(task: String) -> Self {
        Self::new(task)
    }
}

/// A versioned work-delegation package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffPackage {
    /// Package ID
    pub id: HandoffId,
    /// Schema version of the wire form
    pub version: String,
    /// Actor delegating the work
    pub source: String,
    /// Actor being asked to continue it
    pub target: String,
    /// Lifecycle status
    pub status: HandoffStatus,
    /// Queue priority
    pub priority: HandoffPriority,
    /// When the package was built
    pub created_at: DateTime<Utc>,
    /// When the package lapses, if an expiry was requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form context for the target actor
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub context: Map<String, Value>,
    /// What is being asked
    pub instructions: HandoffInstructions,
    /// Trace snapshot carried as evidence
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trace: Option<TraceData>,
}

impl HandoffPackage {
    /// Whether the package has lapsed as of `now`
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Input to [`prepare_handoff`](crate::HandoffCoordinator::prepare_handoff)
#[derive(Debug, Clone)]
pub struct HandoffRequest {
    /// Actor delegating the work
    pub source: String,
    /// Actor being asked to continue it
    pub target: String,
    /// Free-form context for the target actor
    pub context: Map<String, Value>,
    /// What is being asked
    pub instructions: HandoffInstructions,
    /// Queue priority
    pub priority: HandoffPriority,
    /// Minutes until the package lapses
    pub expiration_minutes: Option<i64>,
    /// Trace snapshot to embed as evidence
    pub trace: Option<TraceData>,
}

impl HandoffRequest {
    /// Create a request; a bare instruction string becomes `{ task }`
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        instructions: impl Into<HandoffInstructions>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            context: Map::new(),
            instructions: instructions.into(),
            priority: HandoffPriority::default(),
            expiration_minutes: None,
            trace: None,
        }
    }

    /// Attach a context entry
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Set the queue priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: HandoffPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Request an expiry, in minutes from creation
    #[inline]
    #[must_use]
    pub fn with_expiration_minutes(mut self, minutes: i64) -> Self {
        self.expiration_minutes = Some(minutes);
        self
    }

    /// Embed a trace snapshot as evidence
    #[inline]
    #[must_use]
    pub fn with_trace(mut self, trace: TraceData) -> Self {
        self.trace = Some(trace);
        self
    }
}
