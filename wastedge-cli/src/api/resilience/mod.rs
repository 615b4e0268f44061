//! Caller-side resilience
//!
//! Retry policies layered above the API client. The client itself performs
//! exactly one request per call.

pub mod config;
pub mod retry;

pub use config::RetryConfig;
pub use retry::{RetryPolicy, RetryableError};
