//! Logger handle threaded through the runner and every test case.
//!
//! Wraps a [`tracing::Dispatch`] so a run can log somewhere other than the
//! process-wide default without touching global state.

use std::future::Future;

use tracing::Dispatch;
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::subscriber::NoSubscriber;

/// Where a run and its tests send their `tracing` events.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Creates a logger from any subscriber or dispatch.
    pub fn new(dispatch: impl Into<Dispatch>) -> Self {
        Self {
            dispatch: dispatch.into(),
        }
    }

    /// A logger that discards everything.
    #[must_use]
    pub fn none() -> Self {
        Self::new(NoSubscriber::default())
    }

    /// The dispatcher active on this thread, normally the global one.
    #[must_use]
    pub fn current() -> Self {
        tracing::dispatcher::get_default(|dispatch| Self::new(dispatch.clone()))
    }

    /// Returns the underlying dispatch.
    #[must_use]
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `f` with this logger as the default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Attaches this logger to a future for every poll.
    pub fn instrument<F: Future>(&self, future: F) -> WithDispatch<F> {
        future.with_subscriber(self.dispatch.clone())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::current()
    }
}


#[cfg(test)]
mod tests {
    use super::capture::capturing_logger;
    use super::*;

    #[test]
    fn test_in_scope_routes_events() {
        let (logger, logs) = capturing_logger();
        logger.in_scope(|| tracing::debug!("hello from scope"));
        assert!(logs.contents().contains("hello from scope"));
    }

    #[tokio::test]
    async fn test_instrument_routes_future_events() {
        let (logger, logs) = capturing_logger();
        logger
            .instrument(async {
                tracing::error!("inside future");
            })
            .await;
        assert!(logs.contents().contains("inside future"));
    }

    #[test]
    fn test_none_discards() {
        let logger = Logger::none();
        logger.in_scope(|| tracing::error!("dropped"));
        assert!(logger.dispatch().is::<NoSubscriber>());
    }
}
