//! Alt Domain - Core types
//!
//! This crate defines the domain model for the Alt API test runner:
//! run configuration, test identities and outcomes, HTTP method and
//! response types, and the duration formatter used in reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod duration;
pub mod error;
pub mod request;
pub mod response;
pub mod suite;
pub mod testing;

pub use duration::{format_duration, format_elapsed};
pub use error::{DomainError, DomainResult};
pub use request::HttpMethod;
pub use response::{ApiResponse, StatusCode};
pub use suite::{DataSet, RESERVED_KEYS, RunConfig, SuiteDescriptor, TestDescriptor};
pub use testing::{SequenceNumber, TestFailure, TestIdentity, TestState, TestStatus};
