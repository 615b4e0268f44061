//! Wire-level constants for the Wastedge API

/// Path appended to the base URL for every API call
pub const API_ENDPOINT: &str = "scripts/cgiip.exe/WService=wsDEV/api.p";

/// Parameter carrying the escaped resource path
pub const URI_PARAM: &str = "$uri";

/// Parameter requesting metadata instead of rows
pub const META_PARAM: &str = "$meta";

pub const OUTPUT_PARAM: &str = "$output";
pub const OFFSET_PARAM: &str = "$offset";
pub const COUNT_PARAM: &str = "$count";
pub const START_PARAM: &str = "$start";

/// Suffix of the pivot report endpoint under an entity path
pub const REPORT_PATH: &str = "$report";

/// Wire date patterns (chrono format strings)
pub mod formats {
    pub const DATE: &str = "%Y-%m-%d";
    pub const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.3f";
    pub const DATE_TIME_TZ: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
}
