//! Command handlers

pub mod query;
pub mod raw;
pub mod report;
pub mod schema;
