//! Guarded strategy execution
//!
//! [`StrategyExecutor::run`] wraps a strategy's validate/execute pair with
//! tracing, fail-fast control, and a timeout race. Every invocation gets a
//! fresh trace; every path (success, invalid input, execution error,
//! timeout) returns a structured [`StrategyResult`]. Nothing escapes the
//! executor boundary as a panic or error.

use crate::config::ExecutorConfig;
use crate::phase::ExecutionPhase;
use crate::strategy::Strategy;
use crate::validation::{codes, ValidationError};
use quill_trace::{ExecutionTrace, TraceData};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Uniform outcome of one executor run
///
/// Both variants carry the trace snapshot accumulated so far and the total
/// duration; execution context is never discarded, even on failure.
#[derive(Debug)]
pub enum StrategyResult<T> {
    /// The strategy produced an output
    Success {
        /// Strategy output
        data: T,
        /// Trace snapshot for this run
        trace: TraceData,
        /// Total run duration in milliseconds
        duration_ms: u64,
    },
    /// Validation rejected the input, `execute` failed, or the timer won
    Failure {
        /// What went wrong, in detection order
        errors: Vec<ValidationError>,
        /// Trace snapshot accumulated up to the failure
        trace: TraceData,
        /// Total run duration in milliseconds
        duration_ms: u64,
    },
}

impl<T> StrategyResult<T> {
    /// Whether the run succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the run failed
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Output reference, if any
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Consume the result, yielding the output if any
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Failure errors; empty on success
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors, .. } => errors,
        }
    }

    /// Trace snapshot for this run
    #[must_use]
    pub fn trace(&self) -> &TraceData {
        match self {
            Self::Success { trace, .. } | Self::Failure { trace, .. } => trace,
        }
    }

    /// Total run duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Success { duration_ms, .. } | Self::Failure { duration_ms, .. } => *duration_ms,
        }
    }
}

/// Template-method lifecycle around one [`Strategy`]
///
/// `run` is the single public entry point; concrete behaviors customize
/// only through the trait, never by overriding the lifecycle.
#[derive(Debug)]
pub struct StrategyExecutor<S> {
    strategy: S,
    config: ExecutorConfig,
}

impl<S: Strategy> StrategyExecutor<S> {
    /// Create an executor with default configuration
    #[inline]
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, ExecutorConfig::default())
    }

    /// Create an executor with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(strategy: S, config: ExecutorConfig) -> Self {
        Self { strategy, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Wrapped strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run the full lifecycle against one input
    ///
    /// Creates a fresh trace, records a start entry with the input's
    /// shallow key list (never payload values), validates, and only if
    /// valid races `execute` against the configured timeout. Never
    /// panics and never returns `Err`: every failure path yields a
    /// structured [`StrategyResult::Failure`].
    pub async fn run(&self, input: &S::Input) -> StrategyResult<S::Output> {
        let started = Instant::now();
        let mut trace = ExecutionTrace::new(self.strategy.name(), self.strategy.version());
        let mut phase = ExecutionPhase::Init;

        if self.config.trace_enabled {
            trace.record_decision(
                "start",
                format!(
                    "running strategy {} v{}",
                    self.strategy.name(),
                    self.strategy.version()
                ),
                Some(json!({
                    "strategy": self.strategy.name(),
                    "version": self.strategy.version(),
                    "config": {
                        "traceEnabled": self.config.trace_enabled,
                        "failFast": self.config.fail_fast,
                        "timeoutMs": self.config.timeout.as_millis() as u64,
                        "verbose": self.config.verbose,
                    },
                    "inputKeys": shallow_shape(input),
                })),
            );
        }

        phase = self.advance(phase, ExecutionPhase::Validating);
        let (mut errors, warnings) = self.strategy.validate(input).into_parts();

        if self.config.fail_fast && errors.len() > 1 {
            errors.truncate(1);
        }

        if self.config.trace_enabled {
            for warning in &warnings {
                trace.record_warning(
                    warning.message.clone(),
                    Some(json!({ "code": warning.code, "field": warning.field })),
                );
            }
            for error in &errors {
                trace.record_error(
                    "validation",
                    error.message.clone(),
                    None,
                    Some(json!({ "code": error.code, "field": error.field })),
                );
            }
        }

        if !errors.is_empty() {
            self.advance(phase, ExecutionPhase::ValidationFailed);
            tracing::warn!(
                strategy = self.strategy.name(),
                error_count = errors.len(),
                "validation rejected input"
            );
            return self.fail(trace, errors, started);
        }

        phase = self.advance(phase, ExecutionPhase::Executing);
        let execute_started = Instant::now();

        match tokio::time::timeout(self.config.timeout, self.strategy.execute(input)).await {
            Ok(Ok(output)) => {
                let elapsed = execute_started.elapsed().as_millis() as u64;
                if self.config.trace_enabled {
                    trace.record_decision(
                        "success",
                        "execution completed",
                        Some(json!({
                            "outputShape": shallow_shape(&output),
                            "elapsedMs": elapsed,
                        })),
                    );
                }
                self.advance(phase, ExecutionPhase::Succeeded);
                trace.complete();
                StrategyResult::Success {
                    data: output,
                    trace: trace.to_data(),
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
            Ok(Err(err)) => {
                if self.config.trace_enabled {
                    trace.record_error(
                        "execute",
                        err.to_string(),
                        cause_chain(&err),
                        Some(json!({ "phase": "execute" })),
                    );
                }
                self.advance(phase, ExecutionPhase::ExecutionFailed);
                tracing::error!(
                    strategy = self.strategy.name(),
                    error = %err,
                    "execution failed"
                );
                let error = ValidationError::new(codes::EXECUTION_ERROR, err.to_string())
                    .with_context("phase", json!("execute"));
                self.fail(trace, vec![error], started)
            }
            Err(_elapsed) => {
                let timeout_ms = self.config.timeout.as_millis() as u64;
                if self.config.trace_enabled {
                    trace.record_error(
                        "timeout",
                        format!("execution exceeded {timeout_ms}ms"),
                        None,
                        Some(json!({ "phase": "execute", "timeoutMs": timeout_ms })),
                    );
                }
                self.advance(phase, ExecutionPhase::TimedOut);
                tracing::warn!(
                    strategy = self.strategy.name(),
                    timeout_ms,
                    "execution timed out"
                );
                let error =
                    ValidationError::new(codes::EXECUTION_TIMEOUT, format!("execution exceeded {timeout_ms}ms"))
                        .with_context("timeoutMs", json!(timeout_ms));
                self.fail(trace, vec![error], started)
            }
        }
    }

    fn fail(
        &self,
        mut trace: ExecutionTrace,
        errors: Vec<ValidationError>,
        started: Instant,
    ) -> StrategyResult<S::Output> {
        trace.complete();
        StrategyResult::Failure {
            errors,
            trace: trace.to_data(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn advance(&self, from: ExecutionPhase, to: ExecutionPhase) -> ExecutionPhase {
        debug_assert!(from.can_transition(to), "illegal phase transition {from} to {to}");
        if self.config.verbose {
            tracing::info!(strategy = self.strategy.name(), phase = %to, "lifecycle phase");
        } else {
            tracing::debug!(strategy = self.strategy.name(), phase = %to, "lifecycle phase");
        }
        to
    }
}

/// Shallow shape of a serializable value: object key list, array length,
/// or a scalar type label. Never payload values.
fn shallow_shape<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => {
            Value::Array(fields.keys().cloned().map(Value::String).collect())
        }
        Ok(Value::Array(items)) => Value::String(format!("array[{}]", items.len())),
        Ok(Value::String(_)) => Value::String("string".to_string()),
        Ok(Value::Number(_)) => Value::String("number".to_string()),
        Ok(Value::Bool(_)) => Value::String("boolean".to_string()),
        Ok(Value::Null) => Value::String("null".to_string()),
        Err(_) => Value::String("opaque".to_string()),
    }
}

fn cause_chain(error: &anyhow::Error) -> Option<String> {
    let causes: Vec<String> = error.chain().skip(1).map(|cause| cause.to_string()).collect();
    if causes.is_empty() {
        None
    } else {
        Some(causes.join("\ncaused by: "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shallow_shape_lists_object_keys() {
        let shape = shallow_shape(&json!({ "title": "x", "sections": [] }));
        assert_eq!(shape, json!(["sections", "title"]));
    }

    #[test]
    fn shallow_shape_labels_scalars_and_arrays() {
        assert_eq!(shallow_shape(&json!([1, 2, 3])), json!("array[3]"));
        assert_eq!(shallow_shape(&json!("text")), json!("string"));
        assert_eq!(shallow_shape(&json!(7)), json!("number"));
    }

    #[test]
    fn cause_chain_skips_top_level_message() {
        let err = anyhow::anyhow!("root cause").context("mid").context("top");
        let chain = cause_chain(&err).expect("has causes");
        assert!(chain.contains("mid"));
        assert!(chain.contains("root cause"));
        assert!(!chain.starts_with("top"));
    }

    #[test]
    fn cause_chain_is_none_for_bare_errors() {
        let err = anyhow::anyhow!("standalone");
        assert!(cause_chain(&err).is_none());
    }
}
