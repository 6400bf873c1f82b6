//! Test configuration loading.
//!
//! Configuration files are YAML documents of the shape
//! `{ test_suites: [{ module_name, class_name, tests: [{ name, data_points }] }] }`.

mod factory;

pub use factory::{ConfigError, ConfigFactory, parse_run_config};
