use quill_strategy::{codes, ExecutorConfig, Strategy, StrategyExecutor, ValidationError, ValidationResult};
use quill_test_utils::{
    init_tracing, sample_outline_input, untitled_outline_input, DoubleFaultStrategy,
    FailingStrategy, OutlineDocument, OutlineInput, OutlineStrategy, SlowStrategy,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn success_carries_output_trace_and_duration() {
    init_tracing();
    let executor = StrategyExecutor::new(OutlineStrategy);
    let result = executor.run(&sample_outline_input()).await;

    assert!(result.is_success());
    let data = result.data().expect("success data");
    assert_eq!(data.section_count, 2);
    assert!(data.body.contains("## Context"));

    let trace = result.trace();
    assert_eq!(trace.strategy_name, "outline");
    assert!(trace.completed_at.is_some());
    assert!(trace.metrics.contains_key("total_duration_ms"));

    let categories: Vec<&str> = trace
        .decisions
        .iter()
        .map(|decision| decision.category.as_str())
        .collect();
    assert_eq!(categories, vec!["start", "success"]);
}

#[tokio::test]
async fn start_entry_records_input_keys_not_values() {
    let executor = StrategyExecutor::new(OutlineStrategy);
    let result = executor.run(&sample_outline_input()).await;

    let start = &result.trace().decisions[0];
    let keys = start.context.get("inputKeys").expect("input key list");
    assert_eq!(keys, &serde_json::json!(["sections", "title"]));

    let rendered = serde_json::to_string(&start.context).expect("serializable");
    assert!(!rendered.contains("Payment Service Architecture"));
}

#[tokio::test]
async fn invalid_input_fails_without_calling_execute() {
    struct ProbeStrategy {
        executed: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Strategy for ProbeStrategy {
        type Input = OutlineInput;
        type Output = OutlineDocument;

        fn name(&self) -> &str {
            "probe"
        }

        fn validate(&self, _input: &Self::Input) -> ValidationResult {
            ValidationResult::failure(vec![ValidationError::new(
                "EMPTY_TITLE",
                "title must not be empty",
            )])
        }

        async fn execute(&self, _input: &Self::Input) -> anyhow::Result<Self::Output> {
            self.executed.store(true, Ordering::SeqCst);
            anyhow::bail!("must not run")
        }
    }

    let executed = Arc::new(AtomicBool::new(false));
    let executor = StrategyExecutor::new(ProbeStrategy {
        executed: Arc::clone(&executed),
    });
    let result = executor.run(&sample_outline_input()).await;

    assert!(result.is_failure());
    assert_eq!(result.errors()[0].code, "EMPTY_TITLE");
    assert!(!executed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn warnings_are_recorded_but_do_not_block() {
    let mut input = sample_outline_input();
    input.sections.clear();

    let executor = StrategyExecutor::new(OutlineStrategy);
    let result = executor.run(&input).await;

    assert!(result.is_success());
    let trace = result.trace();
    assert_eq!(trace.summary.total_warnings, 1);
    assert_eq!(trace.warnings[0].message, "no sections supplied; rendering title only");
}

#[tokio::test]
async fn fail_fast_truncates_to_first_error() {
    let executor = StrategyExecutor::with_config(
        DoubleFaultStrategy,
        ExecutorConfig::new().with_fail_fast(true),
    );
    let result = executor.run(&untitled_outline_input()).await;

    assert!(result.is_failure());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].code, "EMPTY_TITLE");
    assert_eq!(result.trace().summary.total_errors, 1);
}

#[tokio::test]
async fn default_config_collects_all_errors() {
    let executor = StrategyExecutor::new(DoubleFaultStrategy);
    let result = executor.run(&untitled_outline_input()).await;

    assert!(result.is_failure());
    assert_eq!(result.errors().len(), 2);
    assert_eq!(result.trace().summary.total_errors, 2);
}

#[tokio::test]
async fn slow_execute_yields_timeout_failure() {
    let executor = StrategyExecutor::with_config(
        SlowStrategy::new(Duration::from_secs(30)),
        ExecutorConfig::new().with_timeout(Duration::from_millis(50)),
    );
    let result = executor.run(&sample_outline_input()).await;

    assert!(result.is_failure());
    assert_eq!(result.errors()[0].code, codes::EXECUTION_TIMEOUT);

    let trace = result.trace();
    assert_eq!(trace.errors.len(), 1);
    assert_eq!(trace.errors[0].category, "timeout");
    assert!(trace.completed_at.is_some());
}

#[tokio::test]
async fn execute_errors_become_structured_failures() {
    let executor = StrategyExecutor::new(FailingStrategy);
    let result = executor.run(&sample_outline_input()).await;

    assert!(result.is_failure());
    assert_eq!(result.errors()[0].code, codes::EXECUTION_ERROR);
    assert_eq!(result.errors()[0].message, "rendering outline failed");

    let trace = result.trace();
    assert_eq!(trace.errors[0].category, "execute");
    let stack = trace.errors[0].stack.as_deref().expect("cause chain");
    assert!(stack.contains("template engine unavailable"));
}

#[tokio::test]
async fn disabled_trace_still_yields_a_snapshot() {
    let executor = StrategyExecutor::with_config(
        OutlineStrategy,
        ExecutorConfig::new().with_trace_enabled(false),
    );
    let result = executor.run(&sample_outline_input()).await;

    assert!(result.is_success());
    let trace = result.trace();
    assert!(trace.decisions.is_empty());
    assert!(trace.completed_at.is_some());
}

#[tokio::test]
async fn each_run_gets_a_fresh_trace() {
    let executor = StrategyExecutor::new(OutlineStrategy);
    let first = executor.run(&sample_outline_input()).await;
    let second = executor.run(&sample_outline_input()).await;

    assert_ne!(first.trace().execution_id, second.trace().execution_id);
    assert_eq!(first.trace().decisions.len(), second.trace().decisions.len());
}
