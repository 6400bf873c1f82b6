//! Alt Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest-backed [`HttpInvoker`] and the YAML
//! configuration loader used by the `alt` binary.
//!
//! [`HttpInvoker`]: alt_application::ports::HttpInvoker

pub mod adapters;
pub mod config;

pub use adapters::ReqwestInvoker;
pub use config::{ConfigError, ConfigFactory, parse_run_config};
