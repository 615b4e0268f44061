//! Pivot report requests
//!
//! A report is posted to `<entity>/$report` with the query filters, the row
//! and column dimensions, and the aggregated values. Dimensions are member
//! paths that may walk through foreign members (`customer.region`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde_json::{Map, Value as Json, json};

use super::constants::formats;
use super::error::{ApiError, Result};
use super::metadata::EntityMember;
use super::query::value::format_offset;
use super::query::{Filter, Value};

/// Aggregate applied to a report value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTransform {
    #[default]
    Sum,
    Count,
    Average,
    Max,
    Min,
    Product,
    CountNumbers,
    StdDev,
    StdDevp,
    Var,
    Varp,
}

impl ReportTransform {
    pub const ALL: [ReportTransform; 11] = [
        ReportTransform::Sum,
        ReportTransform::Count,
        ReportTransform::Average,
        ReportTransform::Max,
        ReportTransform::Min,
        ReportTransform::Product,
        ReportTransform::CountNumbers,
        ReportTransform::StdDev,
        ReportTransform::StdDevp,
        ReportTransform::Var,
        ReportTransform::Varp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReportTransform::Sum => "sum",
            ReportTransform::Count => "count",
            ReportTransform::Average => "average",
            ReportTransform::Max => "max",
            ReportTransform::Min => "min",
            ReportTransform::Product => "product",
            ReportTransform::CountNumbers => "count-numbers",
            ReportTransform::StdDev => "stddev",
            ReportTransform::StdDevp => "stddevp",
            ReportTransform::Var => "var",
            ReportTransform::Varp => "varp",
        }
    }
}

impl fmt::Display for ReportTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportTransform {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        ReportTransform::ALL
            .iter()
            .copied()
            .find(|t| t.code() == s)
            .ok_or_else(|| ApiError::invalid_argument(format!("unknown report transform '{}'", s)))
    }
}

/// Dotted member path used as a report dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    path: Vec<String>,
}

impl ReportField {
    pub fn new(path: Vec<String>) -> Result<Self> {
        if path.is_empty() || path.iter().any(|segment| segment.is_empty()) {
            return Err(ApiError::invalid_argument("report field path must not be empty"));
        }
        Ok(Self { path })
    }

    /// Path through the given members, outermost first
    pub fn from_members(members: &[&EntityMember]) -> Result<Self> {
        Self::new(members.iter().map(|m| m.name.clone()).collect())
    }

    pub fn name(&self) -> String {
        self.path.join(".")
    }
}

impl FromStr for ReportField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.split('.').map(str::to_string).collect())
    }
}

/// An aggregated report value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportValue {
    pub field: ReportField,
    pub transform: ReportTransform,
}

#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub filters: Vec<Filter>,
    pub rows: Vec<ReportField>,
    pub columns: Vec<ReportField>,
    pub values: Vec<ReportValue>,
}

impl ReportRequest {
    /// Request body for the `$report` endpoint
    pub fn to_json(&self) -> Result<Json> {
        if self.rows.is_empty() || self.columns.is_empty() {
            return Err(ApiError::invalid_argument(
                "a report needs at least one row and one column",
            ));
        }

        let fields = self
            .filters
            .iter()
            .map(|filter| -> Result<Json> {
                let mut obj = Map::new();
                obj.insert("name".to_string(), json!(filter.field().name));
                obj.insert("op".to_string(), json!(filter.filter_type().code()));
                if let Some(value) = filter.value().filter(|v| !v.is_null()) {
                    obj.insert("value".to_string(), report_value(value)?);
                }
                Ok(Json::Object(obj))
            })
            .collect::<Result<Vec<_>>>()?;

        let names = |fields: &[ReportField]| fields.iter().map(ReportField::name).collect::<Vec<_>>();

        let values: Vec<Json> = self
            .values
            .iter()
            .map(|v| json!({"name": v.field.name(), "transform": v.transform.code()}))
            .collect();

        Ok(json!({
            "query": {"fields": fields},
            "rows": names(&self.rows),
            "columns": names(&self.columns),
            "values": values,
        }))
    }
}

/// Filter operands in a report body are JSON values; dates use the
/// date-time patterns regardless of member type
fn report_value(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::String(s) => json!(s),
        Value::Date(date) => json!(date.and_time(NaiveTime::MIN).format(formats::DATE_TIME).to_string()),
        Value::DateTime(date_time) => json!(date_time.format(formats::DATE_TIME).to_string()),
        Value::DateTimeOffset(date_time) => {
            json!(format_offset(date_time).ok_or_else(|| unsupported(value, "datetime-tz"))?)
        }
        Value::Int32(n) => json!(n),
        Value::Int64(n) => json!(n),
        Value::Float32(n) if n.is_finite() => json!(n),
        Value::Float64(n) if n.is_finite() => json!(n),
        Value::Float32(_) | Value::Float64(_) => return Err(unsupported(value, "float")),
        Value::Decimal(n) => Json::from_str(&n.to_plain_string())
            .map_err(|e| ApiError::invalid_argument(format!("decimal {} is not a JSON number: {}", n, e)))?,
        Value::Bool(b) => json!(b),
        Value::List(items) => Json::Array(items.iter().map(report_value).collect::<Result<_>>()?),
    })
}

fn unsupported(value: &Value, data_type: &str) -> ApiError {
    ApiError::UnsupportedValueType {
        value: value.kind_name().to_string(),
        data_type: data_type.to_string(),
    }
}
