//! Adapters for the application ports.

mod reqwest_invoker;

pub use reqwest_invoker::ReqwestInvoker;
