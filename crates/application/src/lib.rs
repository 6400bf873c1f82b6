//! Alt Application - Test execution
//!
//! This crate runs configured API tests:
//!
//! - [`registry`] maps configuration names to suite types and methods
//! - [`decorator`] prepares one test call from a data set
//! - [`test_case`] executes it once and records the outcome
//! - [`runner`] walks a whole configuration and builds the summary
//!
//! HTTP calls go through the [`ports::HttpInvoker`] port; adapters live in
//! the infrastructure crate.

pub mod args;
pub mod decorator;
pub mod error;
pub mod logger;
pub mod ports;
pub mod registry;
pub mod runner;
pub mod template;
pub mod test_case;

pub use args::{ArgumentError, TestArgs, is_truthy};
pub use decorator::{DecorateError, invoke_test, prepare_test};
pub use error::{ApplicationError, ApplicationResult};
pub use logger::Logger;
pub use ports::{HttpInvoker, InvokeError, RequestBody, RequestOptions, request};
pub use registry::{SuiteBuilder, SuiteEntry, SuiteInstance, SuiteRegistry};
pub use runner::{LINE_DELIMITER, RunSummary, Runner};
pub use test_case::{BoxFuture, ExecuteError, TestCase, TestMethod, TestResult, test_method};
