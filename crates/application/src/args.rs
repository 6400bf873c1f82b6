//! Arguments a test method receives for one execution.

use alt_domain::{DataSet, SequenceNumber};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::logger::Logger;

/// A required argument was missing or had the wrong shape.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// The key is not in the data set.
    #[error("missing argument '{0}'")]
    Missing(String),

    /// The value could not be converted to the requested type.
    #[error("invalid argument '{key}': {source}")]
    Invalid {
        /// The offending key.
        key: String,
        /// Conversion error.
        #[source]
        source: serde_json::Error,
    },
}

/// The data set after template substitution, plus the run's logger.
#[derive(Debug, Clone)]
pub struct TestArgs {
    values: DataSet,
    logger: Logger,
}

impl TestArgs {
    /// Creates test arguments.
    #[must_use]
    pub const fn new(values: DataSet, logger: Logger) -> Self {
        Self { values, logger }
    }

    /// All argument values.
    #[must_use]
    pub const fn values(&self) -> &DataSet {
        &self.values
    }

    /// The logger the test runs under.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Gets a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Gets a string value. Non-strings yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get_str(key)
    }

    /// Reads a flag. Missing keys are false.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(is_truthy)
    }

    /// Reads an unsigned integer, accepting numeric strings.
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.values.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Deserializes an optional value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Invalid`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ArgumentError> {
        self.values
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|source| ArgumentError::Invalid {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Deserializes a required value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] if absent, or
    /// [`ArgumentError::Invalid`] if the value does not fit `T`.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, ArgumentError> {
        self.get_as(key)?
            .ok_or_else(|| ArgumentError::Missing(key.to_string()))
    }

    /// Number shared by every data set of the running method.
    #[must_use]
    pub fn test_number(&self) -> SequenceNumber {
        SequenceNumber::from_value(self.values.get("test_number"))
    }

    /// Position of this data set within its method.
    #[must_use]
    pub fn param_set_number(&self) -> SequenceNumber {
        SequenceNumber::from_value(self.values.get("param_set_number"))
    }
}

/// Flag semantics for configuration values: booleans as-is, nonzero
/// numbers, and the strings `true`, `yes`, `on`, `1` (any case).
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn args() -> TestArgs {
        let values = DataSet::new()
            .with("expected_response_code", 200)
            .with("code_as_text", "404")
            .with("skip_test", "yes")
            .with("silent", false)
            .with("headers", json!({"Accept": "application/json"}))
            .with("test_number", 3)
            .with("param_set_number", 1);
        TestArgs::new(values, Logger::none())
    }

    #[test]
    fn test_typed_accessors() {
        let args = args();
        assert_eq!(args.get_u64("expected_response_code"), Some(200));
        assert_eq!(args.get_u64("code_as_text"), Some(404));
        assert_eq!(args.get_u64("missing"), None);
        assert!(args.get_bool("skip_test"));
        assert!(!args.get_bool("silent"));
        assert!(!args.get_bool("missing"));
        assert_eq!(args.test_number(), SequenceNumber::Known(3));
        assert_eq!(args.param_set_number(), SequenceNumber::Known(1));
    }

    #[test]
    fn test_require() {
        let args = args();
        let code: u16 = args.require("expected_response_code").unwrap();
        assert_eq!(code, 200);

        let headers: HashMap<String, String> = args.require("headers").unwrap();
        assert_eq!(headers["Accept"], "application/json");

        assert!(matches!(
            args.require::<u16>("nope"),
            Err(ArgumentError::Missing(key)) if key == "nope"
        ));
        assert!(matches!(
            args.require::<u16>("headers"),
            Err(ArgumentError::Invalid { .. })
        ));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("On")));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
    }
}
