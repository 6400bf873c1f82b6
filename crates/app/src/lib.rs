//! Alt - Command line runner for declarative HTTP API tests
//!
//! Wires the built-in suites, the reqwest invoker and the YAML
//! configuration loader behind the `alt` binary.

pub mod cli;
pub mod suites;

pub use cli::{Cli, CliError, Outcome, execute};
pub use suites::{SampleSimpleTest, builtin_registry, register_builtin};
