//! Wastedge API module
//!
//! Client for the Wastedge ERP REST API: typed filters and their query-string
//! encoding, metadata discovery with a per-client cache, JSON execution with
//! exact decimals, and cursor-based paging.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod models;
pub mod query;
pub mod report;
pub mod resilience;

pub use client::{ApiClient, parse_json};
pub use error::{ApiError, Result};
pub use metadata::{EntityDataType, EntityMember, EntitySchema, MemberKind, Schema};
pub use models::Credentials;
pub use query::{
    Filter, FilterType, OutputFormat, Pager, QueryParameters, ResultSet, Value,
    build_query_parameters,
};
pub use report::{ReportField, ReportRequest, ReportTransform, ReportValue};
pub use reqwest::Method;
pub use resilience::{RetryConfig, RetryPolicy, RetryableError};
