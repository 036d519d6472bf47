//! Testing utilities for the Quill workspace
//!
//! Shared strategies, fixtures, and helpers.

#![allow(missing_docs)]

use anyhow::bail;
use quill_handoff::{HandoffInstructions, HandoffPriority, HandoffRequest};
use quill_strategy::{Strategy, ValidationError, ValidationResult, ValidationWarning};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Input shared by the canned strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineInput {
    pub title: String,
    pub sections: Vec<String>,
}

/// Output of [`OutlineStrategy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineDocument {
    pub title: String,
    pub body: String,
    pub section_count: usize,
}

/// Well-behaved strategy: validates the title, renders a markdown outline
#[derive(Debug, Clone, Default)]
pub struct OutlineStrategy;

#[async_trait::async_trait]
impl Strategy for OutlineStrategy {
    type Input = OutlineInput;
    type Output = OutlineDocument;

    fn name(&self) -> &str {
        "outline"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn validate(&self, input: &Self::Input) -> ValidationResult {
        let mut result = ValidationResult::success();
        if input.title.trim().is_empty() {
            result.add_error(
                ValidationError::new("EMPTY_TITLE", "title must not be empty").with_field("title"),
            );
        }
        if input.title.len() > 200 {
            result.add_error(
                ValidationError::new("TITLE_TOO_LONG", "title exceeds 200 characters")
                    .with_field("title"),
            );
        }
        if input.sections.is_empty() {
            result.add_warning(
                ValidationWarning::new("NO_SECTIONS", "no sections supplied; rendering title only")
                    .with_field("sections"),
            );
        }
        result
    }

    async fn execute(&self, input: &Self::Input) -> anyhow::Result<Self::Output> {
        let mut body = format!("# {}\n", input.title);
        for section in &input.sections {
            body.push_str(&format!("\n## {section}\n"));
        }
        Ok(OutlineDocument {
            title: input.title.clone(),
            body,
            section_count: input.sections.len(),
        })
    }
}

/// Strategy whose `validate` always reports two errors
#[derive(Debug, Clone, Default)]
pub struct DoubleFaultStrategy;

#[async_trait::async_trait]
impl Strategy for DoubleFaultStrategy {
    type Input = OutlineInput;
    type Output = OutlineDocument;

    fn name(&self) -> &str {
        "double-fault"
    }

    fn validate(&self, _input: &Self::Input) -> ValidationResult {
        ValidationResult::failure(vec![
            ValidationError::new("EMPTY_TITLE", "title must not be empty").with_field("title"),
            ValidationError::new("NO_SECTIONS", "at least one section is required")
                .with_field("sections"),
        ])
    }

    async fn execute(&self, _input: &Self::Input) -> anyhow::Result<Self::Output> {
        bail!("execute must not run on invalid input")
    }
}

/// Strategy whose `execute` always fails
#[derive(Debug, Clone, Default)]
pub struct FailingStrategy;

#[async_trait::async_trait]
impl Strategy for FailingStrategy {
    type Input = OutlineInput;
    type Output = OutlineDocument;

    fn name(&self) -> &str {
        "failing"
    }

    fn validate(&self, _input: &Self::Input) -> ValidationResult {
        ValidationResult::success()
    }

    async fn execute(&self, _input: &Self::Input) -> anyhow::Result<Self::Output> {
        Err(anyhow::anyhow!("template engine unavailable").context("rendering outline failed"))
    }
}

/// Strategy whose `execute` sleeps for the configured delay
#[derive(Debug, Clone)]
pub struct SlowStrategy {
    pub delay: Duration,
}

impl SlowStrategy {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl Strategy for SlowStrategy {
    type Input = OutlineInput;
    type Output = OutlineDocument;

    fn name(&self) -> &str {
        "slow"
    }

    fn validate(&self, _input: &Self::Input) -> ValidationResult {
        ValidationResult::success()
    }

    async fn execute(&self, input: &Self::Input) -> anyhow::Result<Self::Output> {
        tokio::time::sleep(self.delay).await;
        Ok(OutlineDocument {
            title: input.title.clone(),
            body: format!("# {}\n", input.title),
            section_count: input.sections.len(),
        })
    }
}

pub fn sample_outline_input() -> OutlineInput {
    OutlineInput {
        title: "Payment Service Architecture".to_string(),
        sections: vec!["Context".to_string(), "Decision".to_string()],
    }
}

pub fn untitled_outline_input() -> OutlineInput {
    OutlineInput {
        title: String::new(),
        sections: Vec::new(),
    }
}

pub fn sample_handoff_request() -> HandoffRequest {
    HandoffRequest::new(
        "architecture-agent",
        "review-agent",
        HandoffInstructions::new("Review the generated architecture spec.")
            .with_constraint("Flag unresolved decisions."),
    )
    .with_priority(HandoffPriority::Normal)
    .with_context("artifacts", json!(["architecture-spec.md"]))
}

/// Install a subscriber for integration tests; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
