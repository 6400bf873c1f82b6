//! Suites shipped with the binary.

use std::sync::Arc;

use alt_application::ports::{HttpInvoker, request};
use alt_application::{SuiteRegistry, TestArgs, TestResult};
use anyhow::ensure;

/// Module name the built-in suites are registered under.
pub const BASIC_TESTS_MODULE: &str = "basic_tests.test_code";

/// Sends the request a data set describes and checks its status code.
pub struct SampleSimpleTest {
    invoker: Arc<dyn HttpInvoker>,
}

impl SampleSimpleTest {
    /// Creates the suite around an invoker.
    #[must_use]
    pub fn new(invoker: Arc<dyn HttpInvoker>) -> Self {
        Self { invoker }
    }

    /// Passes when the response status equals `expected_response_code`.
    ///
    /// # Errors
    ///
    /// Fails on a missing expectation, an invalid request, a transport
    /// error, or a status mismatch.
    pub async fn simple_test(&self, args: TestArgs) -> TestResult {
        let expected: u16 = args.require("expected_response_code")?;
        let response = request(self.invoker.as_ref(), &args).await?;
        ensure!(
            response.status_code() == expected,
            "expected response code {expected}, got {}",
            response.status
        );
        Ok(())
    }
}

/// Adds the built-in suites to `registry`.
pub fn register_builtin(registry: &mut SuiteRegistry, invoker: Arc<dyn HttpInvoker>) {
    registry
        .register(BASIC_TESTS_MODULE, "SampleSimpleTest", move || {
            SampleSimpleTest::new(Arc::clone(&invoker))
        })
        .test("simple_test", |suite, args| async move {
            suite.simple_test(args).await
        });
}

/// A registry holding only the built-in suites.
#[must_use]
pub fn builtin_registry(invoker: Arc<dyn HttpInvoker>) -> SuiteRegistry {
    let mut registry = SuiteRegistry::new();
    register_builtin(&mut registry, invoker);
    registry
}
