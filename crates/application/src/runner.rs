//! Sequential test runner and its pass / fail / skip summary.

use std::fmt;
use std::time::{Duration, Instant};

use alt_domain::{RunConfig, TestStatus, format_elapsed};
use tracing::{debug, error};

use crate::decorator::invoke_test;
use crate::error::{ApplicationError, ApplicationResult};
use crate::logger::Logger;
use crate::registry::SuiteRegistry;
use crate::test_case::TestCase;

/// Separator between report sections.
pub const LINE_DELIMITER: &str =
    "======================================================================";

/// Runs every suite, method and data set of a configuration in order.
#[derive(Debug)]
pub struct Runner {
    registry: SuiteRegistry,
    logger: Logger,
}

impl Runner {
    /// Creates a runner logging to the current dispatcher.
    #[must_use]
    pub fn new(registry: SuiteRegistry) -> Self {
        Self {
            registry,
            logger: Logger::default(),
        }
    }

    /// Sets the logger handed to every test.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The suites this runner can resolve.
    #[must_use]
    pub const fn registry(&self) -> &SuiteRegistry {
        &self.registry
    }

    /// Checks the whole configuration before anything runs.
    ///
    /// # Errors
    ///
    /// Returns the first unknown suite, unknown test, or data set that uses
    /// a reserved key.
    pub fn validate(&self, config: &RunConfig) -> ApplicationResult<()> {
        for suite in &config.test_suites {
            let entry = self
                .registry
                .resolve(&suite.module_name, &suite.class_name)
                .ok_or_else(|| ApplicationError::UnknownSuite {
                    module: suite.module_name.clone(),
                    class: suite.class_name.clone(),
                })?;

            for test in &suite.tests {
                if !entry.has_test(&test.name) {
                    return Err(ApplicationError::UnknownTest {
                        suite: suite.class_name.clone(),
                        test: test.name.clone(),
                    });
                }

                for (param_set, data_set) in (1..).zip(&test.data_points) {
                    let keys = data_set.reserved_keys();
                    if !keys.is_empty() {
                        return Err(ApplicationError::ReservedKeys {
                            suite: suite.class_name.clone(),
                            test: test.name.clone(),
                            param_set,
                            keys: keys.into_iter().map(str::to_string).collect(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Validates then runs the configuration.
    ///
    /// Test failures are recorded in the summary; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns a structural error (see [`Runner::validate`] and
    /// [`crate::decorator::DecorateError`]). No summary is produced then.
    pub async fn run(&self, config: &RunConfig) -> ApplicationResult<RunSummary> {
        let logger = &self.logger;
        logger.in_scope(|| debug!("Starting Runner..."));

        self.validate(config)
            .inspect_err(|e| logger.in_scope(|| error!("Invalid test configuration: {e}")))?;

        let start = Instant::now();
        let mut summary = RunSummary::default();
        let mut test_number: u32 = 1;

        for suite in &config.test_suites {
            let instance = self
                .registry
                .resolve(&suite.module_name, &suite.class_name)
                .ok_or_else(|| ApplicationError::UnknownSuite {
                    module: suite.module_name.clone(),
                    class: suite.class_name.clone(),
                })?
                .instantiate();

            for test in &suite.tests {
                let method =
                    instance
                        .method(&test.name)
                        .ok_or_else(|| ApplicationError::UnknownTest {
                            suite: suite.class_name.clone(),
                            test: test.name.clone(),
                        })?;

                for (param_set_number, data_set) in (1u32..).zip(&test.data_points) {
                    logger.in_scope(|| debug!("{LINE_DELIMITER}"));

                    let mut kwargs = data_set.clone();
                    kwargs.insert("test_number", test_number);
                    kwargs.insert("param_set_number", param_set_number);

                    let test_case = invoke_test(
                        instance.name(),
                        &test.name,
                        method.clone(),
                        kwargs,
                        Some(logger.clone()),
                    )
                    .await
                    .inspect_err(|e| logger.in_scope(|| error!("Test failed: {e}")))?;

                    summary.record(test_case);
                }
                test_number += 1;
            }
        }

        summary.elapsed = start.elapsed();
        logger.in_scope(|| {
            for line in summary.report_lines() {
                debug!("{line}");
            }
        });
        Ok(summary)
    }
}

/// Completed tests grouped by outcome, in execution order.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Tests that ran and returned normally.
    pub passed: Vec<TestCase>,
    /// Tests that ran and raised.
    pub failed: Vec<TestCase>,
    /// Tests recorded without running.
    pub skipped: Vec<TestCase>,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Files a completed test under its outcome.
    pub fn record(&mut self, test: TestCase) {
        match test.status() {
            TestStatus::Skipped => self.skipped.push(test),
            TestStatus::Passed => self.passed.push(test),
            TestStatus::Failed => self.failed.push(test),
        }
    }

    /// Number of recorded tests.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    /// True when nothing failed or was skipped.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// True when at least one test failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// The end-of-run report, one entry per line.
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        let total = self.total();
        let mut lines = vec![LINE_DELIMITER.to_string(), LINE_DELIMITER.to_string()];

        for (label, tests) in [
            (TestStatus::Passed, &self.passed),
            (TestStatus::Failed, &self.failed),
            (TestStatus::Skipped, &self.skipped),
        ] {
            lines.push(format!("{}/{total} {label}:", tests.len()));
            lines.extend(tests.iter().map(ToString::to_string));
            lines.push(LINE_DELIMITER.to_string());
        }

        lines.push(format!("Elapsed time: {}", format_elapsed(self.elapsed)));
        lines
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
