//! Suite registry
//!
//! Maps the `module_name` / `class_name` pairs found in a configuration to
//! suite constructors and their named test methods.
//!
//! ```
//! use alt_application::registry::SuiteRegistry;
//!
//! struct Health;
//!
//! let mut registry = SuiteRegistry::new();
//! registry
//!     .register("smoke", "Health", || Health)
//!     .test("ping", |_suite, _args| async { Ok(()) });
//!
//! let entry = registry.resolve("smoke", "Health").unwrap();
//! assert!(entry.has_test("ping"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::args::TestArgs;
use crate::test_case::{BoxFuture, TestMethod, TestResult};

type Handler<S> = Arc<dyn Fn(Arc<S>, TestArgs) -> BoxFuture<'static, TestResult> + Send + Sync>;
type Constructor<S> = Arc<dyn Fn() -> S + Send + Sync>;
type Instantiate = Arc<dyn Fn() -> SuiteInstance + Send + Sync>;

/// Registered suites keyed by module and class name.
#[derive(Default)]
pub struct SuiteRegistry {
    suites: BTreeMap<(String, String), SuiteEntry>,
}

impl SuiteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite type and returns a builder for its test methods.
    ///
    /// Registering the same module and class again replaces the earlier
    /// entry.
    pub fn register<S, F>(
        &mut self,
        module_name: impl Into<String>,
        class_name: impl Into<String>,
        constructor: F,
    ) -> SuiteBuilder<'_, S>
    where
        S: Send + Sync + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        let mut builder = SuiteBuilder {
            registry: self,
            module_name: module_name.into(),
            class_name: class_name.into(),
            constructor: Arc::new(constructor),
            handlers: Vec::new(),
        };
        builder.commit();
        builder
    }

    /// Looks up a suite.
    #[must_use]
    pub fn resolve(&self, module_name: &str, class_name: &str) -> Option<&SuiteEntry> {
        self.suites
            .get(&(module_name.to_string(), class_name.to_string()))
    }

    /// All registered suites, ordered by module then class.
    pub fn suites(&self) -> impl Iterator<Item = &SuiteEntry> {
        self.suites.values()
    }

    /// Number of registered suites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

impl fmt::Debug for SuiteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.suites.values()).finish()
    }
}

/// Adds test methods to a freshly registered suite.
pub struct SuiteBuilder<'a, S> {
    registry: &'a mut SuiteRegistry,
    module_name: String,
    class_name: String,
    constructor: Constructor<S>,
    handlers: Vec<(String, Handler<S>)>,
}

impl<S: Send + Sync + 'static> SuiteBuilder<'_, S> {
    /// Adds a named test method. A second method with the same name
    /// replaces the first.
    #[allow(clippy::return_self_not_must_use)]
    pub fn test<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<S>, TestArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        let name = name.into();
        let handler: Handler<S> = Arc::new(move |suite, args| -> BoxFuture<'static, TestResult> {
            Box::pin(handler(suite, args))
        });

        match self.handlers.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = handler,
            None => self.handlers.push((name, handler)),
        }
        self.commit();
        self
    }

    fn commit(&mut self) {
        let constructor = Arc::clone(&self.constructor);
        let handlers = self.handlers.clone();
        let class_name = self.class_name.clone();

        let instantiate: Instantiate = Arc::new(move || {
            let suite = Arc::new(constructor());
            let methods = handlers
                .iter()
                .map(|(name, handler)| {
                    let suite = Arc::clone(&suite);
                    let handler = Arc::clone(handler);
                    let method: TestMethod =
                        Arc::new(move |args| handler(Arc::clone(&suite), args));
                    (name.clone(), method)
                })
                .collect();
            SuiteInstance {
                class_name: class_name.clone(),
                methods,
            }
        });

        let entry = SuiteEntry {
            module_name: self.module_name.clone(),
            class_name: self.class_name.clone(),
            test_names: self.handlers.iter().map(|(name, _)| name.clone()).collect(),
            instantiate,
        };
        self.registry
            .suites
            .insert((entry.module_name.clone(), entry.class_name.clone()), entry);
    }
}

/// A registered suite: its names, methods, and how to build it.
pub struct SuiteEntry {
    module_name: String,
    class_name: String,
    test_names: Vec<String>,
    instantiate: Instantiate,
}

impl SuiteEntry {
    /// Module the suite was registered under.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Suite class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Test method names in registration order.
    #[must_use]
    pub fn test_names(&self) -> &[String] {
        &self.test_names
    }

    /// True if the suite has a method with this name.
    #[must_use]
    pub fn has_test(&self, name: &str) -> bool {
        self.test_names.iter().any(|test| test == name)
    }

    /// Constructs a new suite instance.
    #[must_use]
    pub fn instantiate(&self) -> SuiteInstance {
        (self.instantiate)()
    }
}

impl fmt::Debug for SuiteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteEntry")
            .field("module_name", &self.module_name)
            .field("class_name", &self.class_name)
            .field("test_names", &self.test_names)
            .finish_non_exhaustive()
    }
}

/// One constructed suite with its methods bound to it.
pub struct SuiteInstance {
    class_name: String,
    methods: BTreeMap<String, TestMethod>,
}

impl SuiteInstance {
    /// Suite class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.class_name
    }

    /// The bound method with this name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<TestMethod> {
        self.methods.get(name).cloned()
    }
}

impl fmt::Debug for SuiteInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteInstance")
            .field("class_name", &self.class_name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}
