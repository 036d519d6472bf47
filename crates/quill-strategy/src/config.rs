//! Executor configuration

use std::time::Duration;

/// Default execution timeout: 30 seconds
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Configuration for one [`StrategyExecutor`](crate::StrategyExecutor)
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Whether trace entries are recorded (default on)
    pub trace_enabled: bool,
    /// Surface only the first validation error instead of the full set
    /// (default off: collect everything)
    pub fail_fast: bool,
    /// Upper bound on `execute` wall-clock time
    pub timeout: Duration,
    /// Raise lifecycle logs from debug to info level
    pub verbose: bool,
}

impl ExecutorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With tracing enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_trace_enabled(mut self, enabled: bool) -> Self {
        self.trace_enabled = enabled;
        self
    }

    /// With fail-fast validation
    #[inline]
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// With an execution timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// With verbose lifecycle logging
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            trace_enabled: true,
            fail_fast: false,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}
