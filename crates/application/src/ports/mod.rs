//! Ports to the outside world
//!
//! The runner only ever talks to the network through [`HttpInvoker`];
//! the reqwest adapter lives in the infrastructure crate.

mod http_invoker;

pub use http_invoker::{HttpInvoker, InvokeError, RequestBody, RequestOptions, request};
