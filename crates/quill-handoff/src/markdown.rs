//! Human-readable handoff briefs

use crate::package::HandoffPackage;
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Render a package as a markdown brief for the target actor
#[must_use]
pub(crate) fn render(package: &HandoffPackage) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Handoff Request");
    out.push('\n');
    let _ = writeln!(out, "- **ID**: {}", package.id);
    let _ = writeln!(out, "- **From**: {}", package.source);
    let _ = writeln!(out, "- **To**: {}", package.target);
    let _ = writeln!(out, "- **Status**: {}", package.status);
    let _ = writeln!(out, "- **Priority**: {}", package.priority);
    let _ = writeln!(out, "- **Created**: {}", package.created_at.to_rfc3339());
    if let Some(expires) = package.expires_at {
        let _ = writeln!(out, "- **Expires**: {}", expires.to_rfc3339());
    }

    out.push_str("\n## Instructions\n\n");
    let _ = writeln!(out, "{}", package.instructions.task);
    if !package.instructions.constraints.is_empty() {
        out.push_str("\n**Constraints:**\n\n");
        for constraint in &package.instructions.constraints {
            let _ = writeln!(out, "- {constraint}");
        }
    }
    if let Some(deadline) = package.instructions.deadline {
        let _ = writeln!(out, "\n**Deadline**: {}", deadline.to_rfc3339());
    }

    if !package.context.is_empty() {
        out.push_str("\n## Context\n");
        push_string_list(&mut out, &package.context, "artifacts", "Artifacts");
        push_string_list(&mut out, &package.context, "decisions", "Decisions");

        let remaining: Map<String, Value> = package
            .context
            .iter()
            .filter(|(key, _)| key.as_str() != "artifacts" && key.as_str() != "decisions")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !remaining.is_empty() {
            let rendered =
                serde_json::to_string_pretty(&remaining).unwrap_or_else(|_| String::from("{}"));
            out.push_str("\n```json\n");
            out.push_str(&rendered);
            out.push_str("\n```\n");
        }
    }

    if let Some(trace) = &package.trace {
        out.push_str("\n## Execution Trace Summary\n\n");
        let _ = writeln!(
            out,
            "- **Execution**: {} v{} ({})",
            trace.strategy_name, trace.strategy_version, trace.execution_id
        );
        let _ = writeln!(out, "- **Decisions**: {}", trace.summary.total_decisions);
        let _ = writeln!(out, "- **Errors**: {}", trace.summary.total_errors);
        let _ = writeln!(out, "- **Warnings**: {}", trace.summary.total_warnings);
        let _ = writeln!(out, "- **Duration**: {}ms", trace.duration_ms());
    }

    out
}

fn push_string_list(out: &mut String, context: &Map<String, Value>, key: &str, heading: &str) {
    let Some(Value::Array(items)) = context.get(key) else {
        return;
    };
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n**{heading}:**\n");
    for item in items {
        match item {
            Value::String(text) => {
                let _ = writeln!(out, "- {text}");
            }
            other => {
                let _ = writeln!(out, "- {other}");
            }
        }
    }
}
