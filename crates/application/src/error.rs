//! Application error types

use thiserror::Error;

use crate::decorator::DecorateError;

/// Structural errors that abort a run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// No suite is registered under this module and class.
    #[error("unknown test suite '{module}.{class}'")]
    UnknownSuite {
        /// Module name from the configuration.
        module: String,
        /// Class name from the configuration.
        class: String,
    },

    /// The suite has no method with this name.
    #[error("test suite '{suite}' has no test '{test}'")]
    UnknownTest {
        /// Suite class name.
        suite: String,
        /// Requested method name.
        test: String,
    },

    /// A data set supplies keys the runner injects itself.
    #[error(
        "you cannot use the following arguments in tests: {} ({suite}.{test}, data set {param_set})",
        .keys.join(", ")
    )]
    ReservedKeys {
        /// Suite class name.
        suite: String,
        /// Method name.
        test: String,
        /// 1-based position of the data set.
        param_set: u32,
        /// The reserved keys found.
        keys: Vec<String>,
    },

    /// Preparing or executing a test failed structurally.
    #[error("test invocation failed: {0}")]
    Decorate(#[from] DecorateError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
