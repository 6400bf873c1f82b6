//! Command line interface.

use std::path::PathBuf;

use alt_application::{ApplicationError, Logger, RunSummary, Runner, SuiteRegistry};
use alt_infrastructure::{ConfigError, ConfigFactory};
use clap::Parser;
use thiserror::Error;

/// Exit status when a structural error aborts the run.
pub const EXIT_ERROR: u8 = 1;

/// Exit status when tests failed and `--fail-on-test-failure` is set.
pub const EXIT_TEST_FAILURE: u8 = 2;

/// Run declarative HTTP API tests described in a YAML file.
#[derive(Debug, Clone, Parser)]
#[command(name = "alt", version, about)]
pub struct Cli {
    /// Configuration name or path; `.yaml` / `.yml` may be omitted.
    #[arg(required_unless_present = "list")]
    pub config: Option<String>,

    /// Directory configuration names are resolved against.
    #[arg(long, env = "ALT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(long, short)]
    pub quiet: bool,

    /// List registered suites and their tests, then exit.
    #[arg(long)]
    pub list: bool,

    /// Exit with status 2 when any test failed.
    #[arg(long)]
    pub fail_on_test_failure: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub const fn default_filter(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            "info,alt=debug,alt_application=debug,alt_infrastructure=debug"
        }
    }

    /// Loader for the configured directory, or for paths as given.
    #[must_use]
    pub fn config_factory(&self) -> ConfigFactory {
        match &self.config_dir {
            Some(dir) => ConfigFactory::new(dir),
            None => ConfigFactory::absolute(),
        }
    }

    /// Process exit status for a completed run.
    #[must_use]
    pub fn exit_status(&self, summary: &RunSummary) -> u8 {
        if self.fail_on_test_failure && summary.has_failures() {
            EXIT_TEST_FAILURE
        } else {
            0
        }
    }
}

/// Errors that stop the binary before a summary exists.
#[derive(Debug, Error)]
pub enum CliError {
    /// No configuration was named.
    #[error("no test configuration given")]
    MissingConfig,

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The run aborted.
    #[error(transparent)]
    Run(#[from] ApplicationError),
}

/// What the binary did.
#[derive(Debug)]
pub enum Outcome {
    /// Printed the registered suites.
    Listed(Vec<String>),
    /// Ran the configuration to completion.
    Completed(RunSummary),
}

/// One line per registered suite: `module.Class: test, test`.
#[must_use]
pub fn list_suites(registry: &SuiteRegistry) -> Vec<String> {
    registry
        .suites()
        .map(|entry| {
            format!(
                "{}.{}: {}",
                entry.module_name(),
                entry.class_name(),
                entry.test_names().join(", ")
            )
        })
        .collect()
}

/// Lists suites or loads and runs the named configuration.
///
/// # Errors
///
/// Returns an error when no configuration is named, it cannot be loaded,
/// or the run aborts.
pub async fn execute(
    cli: &Cli,
    registry: SuiteRegistry,
    logger: Logger,
) -> Result<Outcome, CliError> {
    if cli.list {
        return Ok(Outcome::Listed(list_suites(&registry)));
    }

    let name = cli.config.as_deref().ok_or(CliError::MissingConfig)?;
    let config = cli.config_factory().get(name).await?;

    let summary = Runner::new(registry)
        .with_logger(logger)
        .run(&config)
        .await?;
    Ok(Outcome::Completed(summary))
}
