//! End-to-end runs of the built-in suite against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::sync::Arc;

use alt::cli::{EXIT_TEST_FAILURE, Outcome};
use alt::{Cli, CliError, builtin_registry, execute};
use alt_application::{ApplicationError, Logger, RunSummary};
use alt_infrastructure::{ConfigError, ReqwestInvoker};
use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn status_server() -> MockServer {
    let server = MockServer::start().await;
    for code in [200, 404] {
        Mock::given(method("GET"))
            .and(path(format!("/status/{code}")))
            .respond_with(ResponseTemplate::new(code))
            .mount(&server)
            .await;
    }
    server
}

fn write_config(dir: &TempDir, server: &MockServer, extra: &str) {
    let config = format!(
        "
test_suites:
  - module_name: basic_tests.test_code
    class_name: SampleSimpleTest
    tests:
      - name: simple_test
        data_points:
          - method: GET
            baseurl: {uri}/
            endpoint: status/{{code}}
            code: 200
            expected_response_code: 200
          - method: GET
            url: {uri}/status/404
            expected_response_code: 200
            nickname: wrong expectation
{extra}",
        uri = server.uri()
    );
    fs::write(dir.path().join("tests.yaml"), config).unwrap();
}

async fn run(args: &[&str]) -> Result<(Cli, Outcome), CliError> {
    let cli = Cli::try_parse_from(args).unwrap();
    let registry = builtin_registry(Arc::new(ReqwestInvoker::new().unwrap()));
    let outcome = execute(&cli, registry, Logger::none()).await?;
    Ok((cli, outcome))
}

fn completed(outcome: Outcome) -> RunSummary {
    match outcome {
        Outcome::Completed(summary) => summary,
        Outcome::Listed(_) => panic!("expected a run"),
    }
}

#[tokio::test]
async fn test_run_counts_pass_and_fail() {
    let server = status_server().await;
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");
    let config_dir = dir.path().to_str().unwrap();

    let (cli, outcome) = run(&["alt", "--config-dir", config_dir, "tests"])
        .await
        .unwrap();
    let summary = completed(outcome);

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.passed.len(), 1);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.skipped.is_empty());
    assert!(
        summary.passed[0]
            .to_string()
            .starts_with("#1.1 SampleSimpleTest.simple_test - (")
    );
    assert!(
        summary.failed[0]
            .to_string()
            .starts_with("#1.2 SampleSimpleTest.simple_test (wrong expectation) - (")
    );
    assert!(
        summary.failed[0]
            .failure()
            .unwrap()
            .message
            .contains("expected response code 200, got 404")
    );
    assert_eq!(cli.exit_status(&summary), 0);

    let report = summary.to_string();
    assert!(report.contains("1/2 Passed:"));
    assert!(report.contains("1/2 Failed:"));
    assert!(report.contains("0/2 Skipped:"));
}

#[tokio::test]
async fn test_fail_on_test_failure_exit_status() {
    let server = status_server().await;
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");
    let config_path = dir.path().join("tests");

    let (cli, outcome) = run(&[
        "alt",
        "--fail-on-test-failure",
        config_path.to_str().unwrap(),
    ])
    .await
    .unwrap();
    assert_eq!(cli.exit_status(&completed(outcome)), EXIT_TEST_FAILURE);
}

#[tokio::test]
async fn test_reserved_key_aborts_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        &server,
        "          - method: GET
            url: http://localhost/
            expected_response_code: 200
            logger: custom
",
    );
    let config_dir = dir.path().to_str().unwrap();

    let result = run(&["alt", "--config-dir", config_dir, "tests"]).await;
    match result {
        Err(CliError::Run(ApplicationError::ReservedKeys {
            param_set, keys, ..
        })) => {
            assert_eq!(param_set, 3);
            assert_eq!(keys, ["logger"]);
        }
        other => panic!("expected reserved key error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_unknown_suite_is_structural() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tests.yml"),
        "test_suites:\n  - module_name: nowhere\n    class_name: Missing\n    tests: []\n",
    )
    .unwrap();
    let config_dir = dir.path().to_str().unwrap();

    let result = run(&["alt", "--config-dir", config_dir, "tests"]).await;
    assert!(matches!(
        result,
        Err(CliError::Run(ApplicationError::UnknownSuite { .. }))
    ));
}

#[tokio::test]
async fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().to_str().unwrap();

    let result = run(&["alt", "--config-dir", config_dir, "absent"]).await;
    assert!(matches!(
        result,
        Err(CliError::Config(ConfigError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_list_builtin_suites() {
    let (_, outcome) = run(&["alt", "--list"]).await.unwrap();
    match outcome {
        Outcome::Listed(lines) => {
            assert_eq!(lines, ["basic_tests.test_code.SampleSimpleTest: simple_test"]);
        }
        Outcome::Completed(_) => panic!("listing never runs tests"),
    }
}
