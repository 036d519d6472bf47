//! Execution lifecycle phases
//!
//! One run moves through:
//!
//! ```text
//! Init → Validating ──┬─→ Executing ──┬─→ Succeeded
//!                     │               ├─→ ExecutionFailed
//!                     │               └─→ TimedOut
//!                     └─→ ValidationFailed
//! ```
//!
//! Terminal phases never re-enter `Validating` or `Executing`.

use serde::{Deserialize, Serialize};

/// Phase of one executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    /// Run created, nothing recorded yet
    Init,
    /// `validate` in progress
    Validating,
    /// `execute` racing the timeout
    Executing,
    /// Terminal: output produced
    Succeeded,
    /// Terminal: validation rejected the input
    ValidationFailed,
    /// Terminal: `execute` returned an error
    ExecutionFailed,
    /// Terminal: the timer won the race
    TimedOut,
}

impl ExecutionPhase {
    /// Whether this phase ends the run
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::ValidationFailed | Self::ExecutionFailed | Self::TimedOut
        )
    }

    /// Phases reachable from this one
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [ExecutionPhase] {
        match self {
            Self::Init => &[Self::Validating],
            Self::Validating => &[Self::Executing, Self::ValidationFailed],
            Self::Executing => &[Self::Succeeded, Self::ExecutionFailed, Self::TimedOut],
            Self::Succeeded | Self::ValidationFailed | Self::ExecutionFailed | Self::TimedOut => {
                &[]
            }
        }
    }

    /// Whether `self → to` is a legal transition
    #[inline]
    #[must_use]
    pub fn can_transition(self, to: ExecutionPhase) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Succeeded => "succeeded",
            Self::ValidationFailed => "validation_failed",
            Self::ExecutionFailed => "execution_failed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(label)
    }
}
