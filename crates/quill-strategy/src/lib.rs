//! Quill Strategy Executor
//!
//! One guaranteed-traced, guaranteed-timed-out lifecycle for many
//! document-generation behaviors.
//!
//! # Core Concepts
//!
//! - [`Strategy`]: the smallest capability contract: a synchronous
//!   `validate` plus an async `execute`
//! - [`StrategyExecutor`]: template-method lifecycle wrapping a strategy
//!   with tracing, fail-fast control, and a timeout race
//! - [`StrategyResult`]: tagged success/failure outcome; both variants
//!   carry a trace snapshot and duration
//! - [`ValidationResult`]: validity flag plus ordered errors and warnings
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_strategy::{ExecutorConfig, StrategyExecutor};
//!
//! let executor = StrategyExecutor::with_config(
//!     OutlineStrategy,
//!     ExecutorConfig::new().with_fail_fast(true),
//! );
//! let result = executor.run(&input).await;
//! assert!(result.is_success());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod config;
mod executor;
mod phase;
mod strategy;
mod validation;

// Re-exports
pub use config::{ExecutorConfig, DEFAULT_TIMEOUT};
pub use executor::{StrategyExecutor, StrategyResult};
pub use phase::ExecutionPhase;
pub use strategy::Strategy;
pub use validation::{codes, ValidationError, ValidationResult, ValidationWarning};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
