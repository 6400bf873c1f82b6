//! Run configuration: suites, their test methods, and the data sets that
//! parameterize each method.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys the runner injects into every data set. Configuration may not
/// supply them.
pub const RESERVED_KEYS: [&str; 3] = ["logger", "test_number", "param_set_number"];

/// Top-level shape of a test configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Suites in execution order.
    pub test_suites: Vec<SuiteDescriptor>,
}

impl RunConfig {
    /// Creates a configuration from a list of suites.
    #[must_use]
    pub const fn new(test_suites: Vec<SuiteDescriptor>) -> Self {
        Self { test_suites }
    }

    /// Total number of data sets across every suite and method.
    #[must_use]
    pub fn data_set_count(&self) -> usize {
        self.test_suites
            .iter()
            .flat_map(|suite| &suite.tests)
            .map(|test| test.data_points.len())
            .sum()
    }
}

/// A suite: the registered type to instantiate plus its test methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteDescriptor {
    /// Module the suite type was registered under.
    pub module_name: String,
    /// Registered suite type name. Also the suite name in reports.
    pub class_name: String,
    /// Test methods in execution order.
    pub tests: Vec<TestDescriptor>,
}

impl SuiteDescriptor {
    /// Creates a suite descriptor with no tests.
    #[must_use]
    pub fn new(module_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            class_name: class_name.into(),
            tests: Vec::new(),
        }
    }

    /// Appends a test method.
    #[must_use]
    pub fn with_test(mut self, test: TestDescriptor) -> Self {
        self.tests.push(test);
        self
    }
}

/// One test method and the data sets it runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDescriptor {
    /// Name the method was registered under.
    pub name: String,
    /// One execution per entry, in order.
    pub data_points: Vec<DataSet>,
}

impl TestDescriptor {
    /// Creates a test descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, data_points: Vec<DataSet>) -> Self {
        Self {
            name: name.into(),
            data_points,
        }
    }
}

/// Named arguments for a single execution of a test method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSet(Map<String, Value>);

impl DataSet {
    /// Creates an empty data set.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Gets a string value by key. Non-strings yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Reserved keys present in this data set, in [`RESERVED_KEYS`] order.
    #[must_use]
    pub fn reserved_keys(&self) -> Vec<&'static str> {
        RESERVED_KEYS
            .into_iter()
            .filter(|key| self.0.contains_key(*key))
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the data set, returning the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for DataSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DataSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
