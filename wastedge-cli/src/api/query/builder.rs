//! Query-string construction
//!
//! Produces the full parameter string for a query and the "base" string the
//! pager keeps: filters and output format, without `$offset`/`$count`.

use std::fmt;

use super::filters::Filter;
use super::value::{serialize, Value};
use crate::api::constants::{COUNT_PARAM, OFFSET_PARAM, OUTPUT_PARAM};
use crate::api::error::{ApiError, Result};
use crate::api::metadata::EntityDataType;

/// Wire-level field naming of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Verbose,
    Compact,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Verbose => "verbose",
            OutputFormat::Compact => "compact",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// Everything, including the pagination window
    pub parameters: String,
    /// Filters and output format only
    pub base_parameters: String,
}

/// Build the parameter strings for a query
pub fn build_query_parameters(
    filters: &[Filter],
    offset: Option<u32>,
    count: Option<u32>,
    output_format: OutputFormat,
) -> Result<QueryParameters> {
    let mut sb = String::new();

    for filter in filters {
        push_separator(&mut sb);
        append_filter(&mut sb, filter)?;
    }

    push_separator(&mut sb);
    sb.push_str(OUTPUT_PARAM);
    sb.push('=');
    sb.push_str(output_format.as_str());

    let base_parameters = sb.clone();

    if let Some(offset) = offset {
        push_separator(&mut sb);
        sb.push_str(&format!("{}={}", OFFSET_PARAM, offset));
    }
    if let Some(count) = count {
        push_separator(&mut sb);
        sb.push_str(&format!("{}={}", COUNT_PARAM, count));
    }

    Ok(QueryParameters {
        parameters: sb,
        base_parameters,
    })
}

fn push_separator(sb: &mut String) {
    if !sb.is_empty() {
        sb.push('&');
    }
}

fn append_filter(sb: &mut String, filter: &Filter) -> Result<()> {
    let field = filter.field();
    let filter_type = filter.filter_type();

    sb.push_str(&urlencoding::encode(&field.name));
    sb.push('=');
    sb.push_str(filter_type.code());

    if !filter_type.takes_value() {
        return Ok(());
    }

    let value = filter.value().ok_or_else(|| {
        ApiError::invalid_argument(format!("operator '{}' requires a value", filter_type))
    })?;

    sb.push('.');
    if filter_type.takes_list() {
        append_list(sb, value, &field.data_type)
    } else {
        append_value(sb, value, &field.data_type)
    }
}

fn append_value(sb: &mut String, value: &Value, data_type: &EntityDataType) -> Result<()> {
    sb.push_str(&urlencoding::encode(&serialize(value, data_type)?));
    Ok(())
}

/// Comma-joined list; each element is serialized and escaped on its own
fn append_list(sb: &mut String, value: &Value, data_type: &EntityDataType) -> Result<()> {
    let Value::List(items) = value else {
        return Err(ApiError::invalid_argument(format!(
            "list operator requires a list value, got {}",
            value.kind_name()
        )));
    };

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            sb.push(',');
        }
        append_value(sb, item, data_type)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metadata::EntityMember;
    use crate::api::query::FilterType;
    use chrono::NaiveDate;

    fn field(name: &str, data_type: EntityDataType) -> EntityMember {
        EntityMember::field(name, data_type)
    }

    #[test]
    fn test_empty_filters() {
        let params = build_query_parameters(&[], None, None, OutputFormat::Verbose).unwrap();
        assert_eq!(params.parameters, "$output=verbose");
        assert_eq!(params.base_parameters, "$output=verbose");

        let params = build_query_parameters(&[], Some(10), Some(20), OutputFormat::Verbose).unwrap();
        assert_eq!(params.parameters, "$output=verbose&$offset=10&$count=20");
        assert_eq!(params.base_parameters, "$output=verbose");
    }

    #[test]
    fn test_compact_output() {
        let params = build_query_parameters(&[], None, Some(5), OutputFormat::Compact).unwrap();
        assert_eq!(params.parameters, "$output=compact&$count=5");
    }

    #[test]
    fn test_equal_and_is_null_terms() {
        let status = field("status", EntityDataType::String);
        let filters = vec![
            Filter::compare(status.clone(), FilterType::Equal, "open").unwrap(),
            Filter::check(status, FilterType::IsNull).unwrap(),
        ];

        let params = build_query_parameters(&filters, None, None, OutputFormat::Verbose).unwrap();
        assert_eq!(params.parameters, "status=eq.open&status=is.null&$output=verbose");
    }

    #[test]
    fn test_field_names_and_values_are_escaped() {
        let filters = vec![Filter::compare(
            field("ship to", EntityDataType::String),
            FilterType::Like,
            "a&b=c%",
        )
        .unwrap()];

        let params = build_query_parameters(&filters, None, None, OutputFormat::Verbose).unwrap();
        assert_eq!(params.parameters, "ship%20to=like.a%26b%3Dc%25&$output=verbose");
    }

    #[test]
    fn test_in_list_escapes_each_element() {
        let filters = vec![
            Filter::compare(
                field("city", EntityDataType::String),
                FilterType::In,
                vec!["New York", "a,b"],
            )
            .unwrap(),
            Filter::compare(
                field("qty", EntityDataType::Integer),
                FilterType::NotIn,
                vec![1, 2, 3],
            )
            .unwrap(),
        ];

        let params = build_query_parameters(&filters, None, None, OutputFormat::Compact).unwrap();
        assert_eq!(
            params.parameters,
            "city=in.New%20York,a%2Cb&qty=not.in.1,2,3&$output=compact"
        );
    }

    #[test]
    fn test_dates_use_declared_type() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let filters = vec![
            Filter::compare(field("due", EntityDataType::Date), FilterType::GreaterEqual, day).unwrap(),
            Filter::compare(field("created", EntityDataType::DateTime), FilterType::LessThan, day).unwrap(),
        ];

        let params = build_query_parameters(&filters, None, None, OutputFormat::Verbose).unwrap();
        assert_eq!(
            params.parameters,
            "due=gte.2024-01-31&created=lt.2024-01-31T00%3A00%3A00.000&$output=verbose"
        );
    }

    #[test]
    fn test_base_parameters_exclude_window() {
        let filters = vec![Filter::check(field("active", EntityDataType::Boolean), FilterType::IsTrue).unwrap()];

        let params = build_query_parameters(&filters, Some(100), Some(50), OutputFormat::Verbose).unwrap();
        assert_eq!(params.parameters, "active=is.true&$output=verbose&$offset=100&$count=50");
        assert_eq!(params.base_parameters, "active=is.true&$output=verbose");
        assert!(!params.base_parameters.contains("$offset"));
        assert!(!params.base_parameters.contains("$count"));
    }

    #[test]
    fn test_unsupported_value_fails_the_build() {
        let filters = vec![Filter::compare(
            field("created", EntityDataType::DateTimeTz),
            FilterType::Equal,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap()];

        let err = build_query_parameters(&filters, None, None, OutputFormat::Verbose).unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedValueType { .. }));
    }
}
