//! Wastedge ERP API client and command-line tooling

pub mod api;
pub mod cli;
pub mod config;
