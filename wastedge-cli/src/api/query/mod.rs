//! Entity queries: values, filters, query-string building, and paging

pub mod builder;
pub mod filters;
pub mod pager;
pub mod result;
pub mod value;

pub use builder::{OutputFormat, QueryParameters, build_query_parameters};
pub use filters::{Filter, FilterType};
pub use pager::Pager;
pub use result::ResultSet;
pub use value::{
    Value, decimal_from_json, parse_date, parse_date_time, parse_date_time_offset, serialize,
};
