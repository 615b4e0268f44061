//! Typed filter values and their wire representation
//!
//! Values are rendered according to the *declared* data type of the member
//! they are compared against, not according to their own variant. Dates come
//! back from the service as plain strings and are decoded explicitly with
//! [`parse_date`], [`parse_date_time`] and [`parse_date_time_offset`].

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::constants::formats;
use crate::api::error::{ApiError, Result};
use crate::api::metadata::EntityDataType;

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static DATE_TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}$").unwrap());
static DATE_TIME_TZ_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{2}:\d{2}$").unwrap()
});

/// A typed value used as a filter operand
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    /// Calendar date without time
    Date(NaiveDate),
    /// Local date and time without offset
    DateTime(NaiveDateTime),
    /// Date and time with a fixed UTC offset
    DateTimeOffset(DateTime<FixedOffset>),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Arbitrary-precision decimal (money and other exact amounts)
    Decimal(BigDecimal),
    /// Booleans are filtered with `is.true`/`is.false`, never serialized
    Bool(bool),
    /// Operand list for `in`/`not.in`
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short variant name, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::DateTimeOffset(_) => "datetime-offset",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Decimal(_) => "decimal",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTimeOffset(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Render a value as wire text for a member of the given data type
pub fn serialize(value: &Value, data_type: &EntityDataType) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Date(date) => format_naive(date.and_time(NaiveTime::MIN), value, data_type),
        Value::DateTime(date_time) => format_naive(*date_time, value, data_type),
        Value::DateTimeOffset(date_time) => match data_type {
            EntityDataType::Date => Ok(date_time.format(formats::DATE).to_string()),
            EntityDataType::DateTime => Ok(date_time.format(formats::DATE_TIME).to_string()),
            EntityDataType::DateTimeTz => format_offset(date_time)
                .ok_or_else(|| unsupported(value, data_type)),
            _ => Err(unsupported(value, data_type)),
        },
        Value::Int32(n) => Ok(n.to_string()),
        Value::Int64(n) => Ok(n.to_string()),
        Value::Float32(n) if n.is_finite() => Ok(n.to_string()),
        Value::Float64(n) if n.is_finite() => Ok(n.to_string()),
        Value::Float32(_) | Value::Float64(_) => Err(unsupported(value, data_type)),
        Value::Decimal(n) => Ok(n.to_plain_string()),
        Value::Bool(_) | Value::List(_) => Err(unsupported(value, data_type)),
    }
}

fn format_naive(date_time: NaiveDateTime, value: &Value, data_type: &EntityDataType) -> Result<String> {
    match data_type {
        EntityDataType::Date => Ok(date_time.format(formats::DATE).to_string()),
        EntityDataType::DateTime => Ok(date_time.format(formats::DATE_TIME).to_string()),
        // No offset to print, and the codec never invents one
        EntityDataType::DateTimeTz => Err(unsupported(value, data_type)),
        _ => Err(unsupported(value, data_type)),
    }
}

/// `YYYY-MM-DDTHH:MM:SS.fff+HH:MM`, or `None` when the offset has a seconds
/// part the pattern cannot carry
pub(crate) fn format_offset(date_time: &DateTime<FixedOffset>) -> Option<String> {
    if date_time.offset().local_minus_utc() % 60 != 0 {
        return None;
    }
    Some(date_time.format(formats::DATE_TIME_TZ).to_string())
}

fn unsupported(value: &Value, data_type: &EntityDataType) -> ApiError {
    ApiError::UnsupportedValueType {
        value: value.kind_name().to_string(),
        data_type: data_type.to_string(),
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if !DATE_SHAPE.is_match(input) {
        return Err(malformed(input, "YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(input, formats::DATE).map_err(|_| malformed(input, "YYYY-MM-DD"))
}

/// Parse a `YYYY-MM-DDTHH:MM:SS.fff` local date-time
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    const EXPECTED: &str = "YYYY-MM-DDTHH:MM:SS.fff";
    if !DATE_TIME_SHAPE.is_match(input) {
        return Err(malformed(input, EXPECTED));
    }
    NaiveDateTime::parse_from_str(input, formats::DATE_TIME).map_err(|_| malformed(input, EXPECTED))
}

/// Parse a `YYYY-MM-DDTHH:MM:SS.fff+HH:MM` date-time with offset
pub fn parse_date_time_offset(input: &str) -> Result<DateTime<FixedOffset>> {
    const EXPECTED: &str = "YYYY-MM-DDTHH:MM:SS.fff+HH:MM";
    if !DATE_TIME_TZ_SHAPE.is_match(input) {
        return Err(malformed(input, EXPECTED));
    }
    DateTime::parse_from_str(input, formats::DATE_TIME_TZ).map_err(|_| malformed(input, EXPECTED))
}

fn malformed(input: &str, expected: &'static str) -> ApiError {
    ApiError::MalformedDate {
        input: input.to_string(),
        expected,
    }
}

/// Exact decimal of a decoded JSON number.
///
/// Response numbers keep their original text, so `19.99` comes back as
/// exactly `19.99`. Strings holding a number are accepted too.
pub fn decimal_from_json(value: &serde_json::Value) -> Option<BigDecimal> {
    match value {
        serde_json::Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => BigDecimal::from_str(s).ok(),
        _ => None,
    }
}
