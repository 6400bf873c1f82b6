//! Test identity and outcome types.
//!
//! These describe a single (test method × data set) execution without any
//! knowledge of how the method is run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a test in the run. Unknown when the caller did not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SequenceNumber {
    /// Assigned by the runner, 1-based.
    Known(u32),
    /// Not supplied; displays as `?`.
    #[default]
    Unknown,
}

impl SequenceNumber {
    /// Returns the number, if known.
    #[must_use]
    pub const fn get(self) -> Option<u32> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    /// Reads a sequence number from a JSON value.
    ///
    /// Accepts non-negative integers and numeric strings; anything else
    /// (including a missing value) is [`SequenceNumber::Unknown`].
    #[must_use]
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map_or(Self::Unknown, Self::Known),
            Some(serde_json::Value::String(s)) => {
                s.trim().parse::<u32>().map_or(Self::Unknown, Self::Known)
            }
            _ => Self::Unknown,
        }
    }
}

impl From<u32> for SequenceNumber {
    fn from(n: u32) -> Self {
        Self::Known(n)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("?"),
        }
    }
}

/// Who a test is: suite, method, position, and optional nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestIdentity {
    /// Suite (registered type) name.
    pub suite: String,
    /// Test method name.
    pub method: String,
    /// Shared by every data set of one method.
    pub test_number: SequenceNumber,
    /// Position of the data set within its method.
    pub param_set_number: SequenceNumber,
    /// Optional human-readable label.
    pub nickname: Option<String>,
}

impl TestIdentity {
    /// Creates an identity with unknown sequence numbers.
    #[must_use]
    pub fn new(suite: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            method: method.into(),
            test_number: SequenceNumber::Unknown,
            param_set_number: SequenceNumber::Unknown,
            nickname: None,
        }
    }

    /// Sets both sequence numbers.
    #[must_use]
    pub const fn with_numbers(
        mut self,
        test_number: SequenceNumber,
        param_set_number: SequenceNumber,
    ) -> Self {
        self.test_number = test_number;
        self.param_set_number = param_set_number;
        self
    }

    /// Sets the nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname;
        self
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}.{} {}.{}",
            self.test_number, self.param_set_number, self.suite, self.method
        )?;
        if let Some(nickname) = &self.nickname {
            write!(f, " ({nickname})")?;
        }
        Ok(())
    }
}

/// A captured test failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFailure {
    /// One-line description.
    pub message: String,
    /// Full diagnostic detail (error chain, backtrace, panic payload).
    pub detail: String,
}

impl TestFailure {
    /// Creates a failure whose detail is the message itself.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: message.clone(),
            message,
        }
    }

    /// Creates a failure with separate detail.
    #[must_use]
    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Execution state of a single test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TestState {
    /// Not run yet.
    #[default]
    NotExecuted,
    /// Recorded without running the method.
    Skipped,
    /// The method returned normally.
    Passed,
    /// The method returned an error or panicked.
    Failed(TestFailure),
}

impl TestState {
    /// Returns true once the state can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotExecuted)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&TestFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Report bucket a finished test falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    /// Ran and passed.
    Passed,
    /// Ran and failed.
    Failed,
    /// Not run.
    Skipped,
}

impl TestStatus {
    /// Returns the label used in the run report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sequence_number_display() {
        assert_eq!(SequenceNumber::Known(3).to_string(), "3");
        assert_eq!(SequenceNumber::Unknown.to_string(), "?");
    }

    #[test]
    fn test_sequence_number_from_value() {
        assert_eq!(
            SequenceNumber::from_value(Some(&json!(2))),
            SequenceNumber::Known(2)
        );
        assert_eq!(
            SequenceNumber::from_value(Some(&json!("5"))),
            SequenceNumber::Known(5)
        );
        assert_eq!(
            SequenceNumber::from_value(Some(&json!(" 12 "))),
            SequenceNumber::Known(12)
        );
        assert_eq!(
            SequenceNumber::from_value(Some(&json!("x"))),
            SequenceNumber::Unknown
        );
        assert_eq!(
            SequenceNumber::from_value(Some(&json!(-1))),
            SequenceNumber::Unknown
        );
        assert_eq!(SequenceNumber::from_value(None), SequenceNumber::Unknown);
    }

    #[test]
    fn test_identity_display() {
        let identity = TestIdentity::new("SampleSimpleTest", "simple_test")
            .with_numbers(SequenceNumber::Known(1), SequenceNumber::Known(2));
        assert_eq!(identity.to_string(), "#1.2 SampleSimpleTest.simple_test");

        let identity = identity.with_nickname(Some("health".to_string()));
        assert_eq!(
            identity.to_string(),
            "#1.2 SampleSimpleTest.simple_test (health)"
        );

        let unnumbered = TestIdentity::new("Suite", "method");
        assert_eq!(unnumbered.to_string(), "#?.? Suite.method");
    }

    #[test]
    fn test_state_helpers() {
        assert!(!TestState::NotExecuted.is_terminal());
        assert!(TestState::Skipped.is_terminal());
        let failed = TestState::Failed(TestFailure::new("boom"));
        assert!(failed.is_terminal());
        assert_eq!(failed.failure().unwrap().message, "boom");
        assert_eq!(TestState::Passed.failure(), None);
    }
}
