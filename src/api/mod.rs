//! HTTP surface for the curation and answering pipelines.
//!
//! The routing layer stays thin: policy lives in the core components, and
//! handlers only translate between requests, core calls, and status codes.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::start_http_server;
