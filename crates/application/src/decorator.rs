//! Invocation wrapper around a single test method call.
//!
//! Fills url templates from the data set, reads the bookkeeping keys, then
//! builds and executes the [`TestCase`].

use alt_domain::{DataSet, SequenceNumber, TestIdentity};
use serde_json::Value;
use thiserror::Error;

use crate::args::{TestArgs, is_truthy};
use crate::logger::Logger;
use crate::template::{TemplateError, render_value, substitute};
use crate::test_case::{ExecuteError, TestCase, TestMethod};

/// Url-like keys filled from the data set, in substitution order.
pub const TEMPLATED_FIELDS: [&str; 3] = ["url", "endpoint", "baseurl"];

/// Structural errors raised before or around a test execution.
#[derive(Debug, Error)]
pub enum DecorateError {
    /// A templated field could not be filled.
    #[error("cannot fill '{field}': {source}")]
    Template {
        /// The templated key.
        field: String,
        /// Why substitution failed.
        #[source]
        source: TemplateError,
    },

    /// A templated field holds something other than a string.
    #[error("'{0}' must be a string to be used as a template")]
    NotAString(String),

    /// The test case was misused.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Builds a test case from a method and its keyword arguments without
/// running it.
///
/// `logger` defaults to the current dispatcher.
///
/// # Errors
///
/// Returns [`DecorateError`] if a templated field is not a string,
/// references a missing key, or is malformed.
pub fn prepare_test(
    suite: &str,
    method_name: &str,
    method: TestMethod,
    mut kwargs: DataSet,
    logger: Option<Logger>,
) -> Result<TestCase, DecorateError> {
    let logger = logger.unwrap_or_default();

    for field in TEMPLATED_FIELDS {
        fill_template(&mut kwargs, field)?;
    }

    let test_number = SequenceNumber::from_value(kwargs.get("test_number"));
    let param_set_number = SequenceNumber::from_value(kwargs.get("param_set_number"));
    let skip = kwargs.get("skip_test").is_some_and(is_truthy);
    let nickname = kwargs
        .get("nickname")
        .filter(|v| !v.is_null())
        .map(render_value);

    let identity = TestIdentity::new(suite, method_name)
        .with_numbers(test_number, param_set_number)
        .with_nickname(nickname);

    Ok(TestCase::new(identity, method, TestArgs::new(kwargs, logger)).with_skip(skip))
}

/// Builds and executes a test case, returning it for classification.
///
/// Failures inside the method are captured in the returned test's state.
///
/// # Errors
///
/// Returns [`DecorateError`] for template problems; see [`prepare_test`].
pub async fn invoke_test(
    suite: &str,
    method_name: &str,
    method: TestMethod,
    kwargs: DataSet,
    logger: Option<Logger>,
) -> Result<TestCase, DecorateError> {
    let mut test = prepare_test(suite, method_name, method, kwargs, logger)?;
    test.execute().await?;
    Ok(test)
}

fn fill_template(kwargs: &mut DataSet, field: &str) -> Result<(), DecorateError> {
    let filled = match kwargs.get(field) {
        None => return Ok(()),
        Some(Value::String(template)) => {
            substitute(template, kwargs.as_map()).map_err(|source| DecorateError::Template {
                field: field.to_string(),
                source,
            })?
        }
        Some(_) => return Err(DecorateError::NotAString(field.to_string())),
    };
    kwargs.insert(field, filled);
    Ok(())
}
