//! Validation types
//!
//! A strategy's `validate` returns a [`ValidationResult`]: a validity flag
//! plus ordered errors (blocking) and warnings (non-blocking). Errors and
//! warnings share one shape: code, message, optional field, free context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error codes attached to executor-produced failures
pub mod codes {
    /// `execute` returned an error
    pub const EXECUTION_ERROR: &str = "EXECUTION_ERROR";
    /// `execute` exceeded the configured timeout
    pub const EXECUTION_TIMEOUT: &str = "EXECUTION_TIMEOUT";
}

/// A blocking validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Offending input field, when one can be named
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
    /// Free-form context
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub context: Map<String, Value>,
}

impl ValidationError {
    /// Create an error with a code and message
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            context: Map::new(),
        }
    }

    /// Name the offending input field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a context entry
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// A non-blocking validation warning; same shape as an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Input field the warning concerns, when one can be named
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
    /// Free-form context
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub context: Map<String, Value>,
}

impl ValidationWarning {
    /// Create a warning with a code and message
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            context: Map::new(),
        }
    }

    /// Name the input field the warning concerns
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a context entry
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// Outcome of a strategy's `validate`
///
/// Invariant: `valid` is true iff `errors` is empty. Warnings never block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// A passing result with no errors or warnings
    #[inline]
    #[must_use]
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A result carrying the given errors
    #[must_use]
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Whether validation passed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Recorded errors, in insertion order
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Recorded warnings, in insertion order
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Add a blocking error, clearing validity
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a non-blocking warning
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Decompose into `(errors, warnings)`
    #[must_use]
    pub fn into_parts(self) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
        (self.errors, self.warnings)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_is_valid_and_empty() {
        let result = ValidationResult::success();
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn add_error_clears_validity() {
        let mut result = ValidationResult::success();
        result.add_error(ValidationError::new("EMPTY_TITLE", "title must not be empty"));
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn warnings_do_not_block() {
        let mut result = ValidationResult::success();
        result.add_warning(ValidationWarning::new("NO_SECTIONS", "no sections supplied"));
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn merge_combines_both_lists() {
        let mut left = ValidationResult::success();
        left.add_warning(ValidationWarning::new("NO_SECTIONS", "no sections supplied"));

        let mut right = ValidationResult::success();
        right.add_error(ValidationError::new("EMPTY_TITLE", "title must not be empty"));

        left.merge(right);
        assert!(!left.is_valid());
        assert_eq!(left.errors().len(), 1);
        assert_eq!(left.warnings().len(), 1);
    }

    #[test]
    fn builder_attaches_field_and_context() {
        let error = ValidationError::new("EMPTY_TITLE", "title must not be empty")
            .with_field("title")
            .with_context("supplied", json!(""));

        assert_eq!(error.field.as_deref(), Some("title"));
        assert_eq!(error.context.get("supplied"), Some(&json!("")));
    }
}
