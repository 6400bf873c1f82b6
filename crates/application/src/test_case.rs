//! A single execution of one test method with one data set.
//!
//! A [`TestCase`] is created per (method × data set) pair, executed once,
//! then handed to the runner for classification.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alt_domain::{TestFailure, TestIdentity, TestState, TestStatus, format_elapsed};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

use crate::args::TestArgs;

/// What a test method returns. Any error marks the test failed.
pub type TestResult = anyhow::Result<()>;

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A test method bound to its suite instance.
pub type TestMethod = Arc<dyn Fn(TestArgs) -> BoxFuture<'static, TestResult> + Send + Sync>;

/// Wraps an async closure as a [`TestMethod`].
pub fn test_method<F, Fut>(f: F) -> TestMethod
where
    F: Fn(TestArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TestResult> + Send + 'static,
{
    Arc::new(move |args| -> BoxFuture<'static, TestResult> { Box::pin(f(args)) })
}

/// Misuse of a [`TestCase`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// `execute` was called on a test that already ran or was skipped.
    #[error("test already executed: {0}")]
    AlreadyExecuted(String),
}

/// One (method × data set) execution and its outcome.
pub struct TestCase {
    identity: TestIdentity,
    state: TestState,
    elapsed: Duration,
    skip: bool,
    method: TestMethod,
    args: TestArgs,
}

impl TestCase {
    /// Creates a test that has not run yet.
    #[must_use]
    pub fn new(identity: TestIdentity, method: TestMethod, args: TestArgs) -> Self {
        Self {
            identity,
            state: TestState::NotExecuted,
            elapsed: Duration::ZERO,
            skip: false,
            method,
            args,
        }
    }

    /// Marks the test to be recorded without running.
    #[must_use]
    pub const fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    /// Runs the wrapped method once.
    ///
    /// Errors and panics raised by the method are captured in the test's
    /// state, logged, and never propagated.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::AlreadyExecuted`] if the test already ran or
    /// was skipped.
    pub async fn execute(&mut self) -> Result<(), ExecuteError> {
        if self.state.is_terminal() {
            return Err(ExecuteError::AlreadyExecuted(self.identity.to_string()));
        }

        let logger = self.args.logger().clone();

        if self.skip {
            self.state = TestState::Skipped;
            logger.in_scope(|| debug!("Skipping test: {self}"));
            return Ok(());
        }

        logger.in_scope(|| debug!("Starting test: {self}"));
        let start = Instant::now();

        let future = (self.method)(self.args.clone());
        let outcome = tokio::spawn(logger.instrument(future)).await;

        self.elapsed = start.elapsed();
        self.state = match outcome {
            Ok(Ok(())) => TestState::Passed,
            Ok(Err(err)) => {
                TestState::Failed(TestFailure::with_detail(err.to_string(), format!("{err:?}")))
            }
            Err(join_error) => TestState::Failed(join_failure(&self.identity, join_error)),
        };

        if let Some(failure) = self.state.failure() {
            logger.in_scope(|| error!("{}: {}", self.identity, failure.detail));
        }
        logger.in_scope(|| debug!("Finished test: {self}"));
        Ok(())
    }

    /// Who this test is.
    #[must_use]
    pub const fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &TestState {
        &self.state
    }

    /// Wall-clock time spent in the method. Zero unless executed.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Arguments the method runs with.
    #[must_use]
    pub const fn args(&self) -> &TestArgs {
        &self.args
    }

    /// True once the method has run, whatever the result.
    #[must_use]
    pub const fn executed(&self) -> bool {
        matches!(self.state, TestState::Passed | TestState::Failed(_))
    }

    /// True if the test was recorded without running.
    #[must_use]
    pub const fn skipped(&self) -> bool {
        matches!(self.state, TestState::Skipped)
    }

    /// True if the method ran and returned normally.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.state, TestState::Passed)
    }

    /// The captured failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&TestFailure> {
        self.state.failure()
    }

    /// Report bucket: skipped, then passed, everything else failed.
    #[must_use]
    pub const fn status(&self) -> TestStatus {
        if self.skipped() {
            TestStatus::Skipped
        } else if self.passed() {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.executed() {
            let result = if self.passed() { "Passed" } else { "Failed" };
            write!(
                f,
                "{} - ({}) Result: {result}",
                self.identity,
                format_elapsed(self.elapsed)
            )
        } else {
            write!(f, "{} - Not Executed", self.identity)
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

fn join_failure(identity: &TestIdentity, join_error: JoinError) -> TestFailure {
    match join_error.try_into_panic() {
        Ok(payload) => {
            let (message, payload_type) = if let Some(s) = payload.downcast_ref::<&str>() {
                ((*s).to_string(), "&str")
            } else if let Some(s) = payload.downcast_ref::<String>() {
                (s.clone(), "String")
            } else {
                ("non-string panic payload".to_string(), "unknown")
            };
            TestFailure::with_detail(
                format!("test panicked: {message}"),
                format!("{identity} panicked ({payload_type} payload): {message}"),
            )
        }
        Err(join_error) => TestFailure::new(format!(
            "{identity}: test task did not complete: {join_error}"
        )),
    }
}
