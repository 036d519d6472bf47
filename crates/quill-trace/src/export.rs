//! Trace exports
//!
//! [`TraceData`] is the structured, immutable snapshot of a trace: the form
//! that travels inside strategy results and handoff packages. The markdown
//! rendering is the human-readable report of the same snapshot.

use crate::trace::{Decision, ErrorEntry, ExecutionId, WarningEntry};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Entry counts by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    /// Number of recorded decisions
    pub total_decisions: usize,
    /// Number of recorded errors
    pub total_errors: usize,
    /// Number of recorded warnings
    pub total_warnings: usize,
}

/// Immutable structured snapshot of one execution trace
///
/// Serialization round-trips losslessly: decisions, metrics, errors, and
/// timestamps all survive a serialize/deserialize cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceData {
    /// Execution ID
    pub execution_id: ExecutionId,
    /// Owning strategy name
    pub strategy_name: String,
    /// Owning strategy version
    pub strategy_version: String,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Completion timestamp; absent, not a sentinel, until completion
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Recorded decisions
    pub decisions: Vec<Decision>,
    /// Recorded metrics
    pub metrics: IndexMap<String, f64>,
    /// Recorded errors
    pub errors: Vec<ErrorEntry>,
    /// Recorded warnings
    #[serde(default)]
    pub warnings: Vec<WarningEntry>,
    /// Entry counts
    #[serde(default)]
    pub summary: TraceSummary,
}

impl TraceData {
    /// Elapsed milliseconds, measured against now when incomplete
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds().max(0) as u64
    }

    /// Render the human-readable report
    ///
    /// Sections appear only when they have content: the metrics table is
    /// omitted when no metrics exist, each decision's context block is
    /// omitted when empty, and error stack/context blocks are conditional.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "# Execution Trace: {} v{}",
            self.strategy_name, self.strategy_version
        );
        out.push('\n');
        let _ = writeln!(out, "- **Execution ID**: {}", self.execution_id);
        let _ = writeln!(out, "- **Started**: {}", self.started_at.to_rfc3339());
        if let Some(completed) = self.completed_at {
            let _ = writeln!(out, "- **Completed**: {}", completed.to_rfc3339());
        }
        let _ = writeln!(out, "- **Duration**: {}ms", self.duration_ms());

        if !self.metrics.is_empty() {
            out.push_str("\n## Metrics\n\n");
            out.push_str("| Metric | Value |\n");
            out.push_str("|--------|-------|\n");
            for (name, value) in &self.metrics {
                let _ = writeln!(out, "| {name} | {} |", format_metric(*value));
            }
        }

        if !self.decisions.is_empty() {
            out.push_str("\n## Decisions\n");
            for decision in &self.decisions {
                let _ = writeln!(out, "\n### {}", decision.category);
                out.push('\n');
                let _ = writeln!(out, "- **Timestamp**: {}", decision.timestamp.to_rfc3339());
                let _ = writeln!(out, "- **Description**: {}", decision.description);
                push_context_block(&mut out, &decision.context);
            }
        }

        if !self.warnings.is_empty() {
            out.push_str("\n## Warnings\n\n");
            for warning in &self.warnings {
                let _ = writeln!(out, "- {}", warning.message);
            }
        }

        if !self.errors.is_empty() {
            out.push_str("\n## Errors\n");
            for error in &self.errors {
                let _ = writeln!(out, "\n### {}", error.category);
                out.push('\n');
                let _ = writeln!(out, "- **Timestamp**: {}", error.timestamp.to_rfc3339());
                let _ = writeln!(out, "- **Message**: {}", error.message);
                if let Some(stack) = &error.stack {
                    out.push_str("\n```text\n");
                    out.push_str(stack);
                    out.push_str("\n```\n");
                }
                push_context_block(&mut out, &error.context);
            }
        }

        out
    }
}

fn push_context_block(out: &mut String, context: &Map<String, Value>) {
    if context.is_empty() {
        return;
    }
    let rendered = serde_json::to_string_pretty(context)
        .unwrap_or_else(|_| String::from("{}"));
    out.push_str("\n```json\n");
    out.push_str(&rendered);
    out.push_str("\n```\n");
}

fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::ExecutionTrace;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn completed_trace() -> TraceData {
        let mut trace = ExecutionTrace::new("decision-record", "0.3.0");
        trace.record_decision(
            "format",
            "chose MADR layout",
            Some(json!({ "alternatives": ["nygard", "madr"] })),
        );
        trace.record_metric("sections", 5.0);
        trace.complete();
        trace.to_data()
    }

    #[test]
    fn roundtrip_is_lossless() {
        let data = completed_trace();
        let serialized = serde_json::to_string(&data).expect("serialize");
        let parsed: TraceData = serde_json::from_str(&serialized).expect("deserialize");

        assert_eq!(parsed, data);
        assert_eq!(parsed.started_at, data.started_at);
        assert_eq!(parsed.completed_at, data.completed_at);
    }

    #[test]
    fn completed_at_is_absent_until_completion() {
        let trace = ExecutionTrace::new("decision-record", "0.3.0");
        let serialized = serde_json::to_value(trace.to_data()).expect("serialize");
        assert!(serialized.get("completedAt").is_none());
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let serialized = serde_json::to_value(completed_trace()).expect("serialize");
        assert!(serialized.get("executionId").is_some());
        assert!(serialized.get("strategyName").is_some());
        assert!(serialized.get("startedAt").is_some());
        assert!(serialized.get("completedAt").is_some());
    }

    #[test]
    fn markdown_starts_with_heading_and_renders_sections() {
        let report = completed_trace().to_markdown();

        assert!(report.starts_with("# Execution Trace: decision-record v0.3.0"));
        assert!(report.contains("## Metrics"));
        assert!(report.contains("| sections | 5 |"));
        assert!(report.contains("### format"));
        assert!(report.contains("chose MADR layout"));
        assert!(report.contains("```json"));
    }

    #[test]
    fn markdown_omits_empty_sections() {
        let trace = ExecutionTrace::new("decision-record", "0.3.0");
        let report = trace.to_markdown();

        assert!(!report.contains("## Metrics"));
        assert!(!report.contains("## Decisions"));
        assert!(!report.contains("## Errors"));
        assert!(!report.contains("## Warnings"));
        assert!(!report.contains("**Completed**"));
    }

    #[test]
    fn markdown_omits_empty_context_block() {
        let mut trace = ExecutionTrace::new("decision-record", "0.3.0");
        trace.record_decision("format", "no context supplied", None);
        let report = trace.to_markdown();

        assert!(report.contains("### format"));
        assert!(!report.contains("```json"));
    }

    #[test]
    fn markdown_error_stack_and_context_are_conditional() {
        let mut trace = ExecutionTrace::new("decision-record", "0.3.0");
        trace.record_error("render", "plain failure", None, None);
        trace.record_error(
            "render",
            "failure with stack",
            Some("caused by: io".to_string()),
            Some(json!({ "phase": "render" })),
        );
        let report = trace.to_markdown();

        assert!(report.contains("plain failure"));
        assert_eq!(report.matches("```text").count(), 1);
        assert_eq!(report.matches("```json").count(), 1);
    }
}
