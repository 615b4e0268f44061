//! Filter terms for entity queries

use std::fmt;
use std::str::FromStr;

use super::value::Value;
use crate::api::error::{ApiError, Result};
use crate::api::metadata::EntityMember;

/// Filter operators understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    IsNull,
    NotIsNull,
    IsTrue,
    NotIsTrue,
    IsFalse,
    NotIsFalse,
    In,
    NotIn,
    Like,
    NotLike,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
}

impl FilterType {
    pub const ALL: [FilterType; 16] = [
        FilterType::IsNull,
        FilterType::NotIsNull,
        FilterType::IsTrue,
        FilterType::NotIsTrue,
        FilterType::IsFalse,
        FilterType::NotIsFalse,
        FilterType::In,
        FilterType::NotIn,
        FilterType::Like,
        FilterType::NotLike,
        FilterType::Equal,
        FilterType::NotEqual,
        FilterType::GreaterThan,
        FilterType::GreaterEqual,
        FilterType::LessThan,
        FilterType::LessEqual,
    ];

    /// Operator token in the service's filter grammar. Part of the wire contract.
    pub fn code(&self) -> &'static str {
        match self {
            FilterType::IsNull => "is.null",
            FilterType::NotIsNull => "not.is.null",
            FilterType::IsTrue => "is.true",
            FilterType::NotIsTrue => "not.is.true",
            FilterType::IsFalse => "is.false",
            FilterType::NotIsFalse => "not.is.false",
            FilterType::In => "in",
            FilterType::NotIn => "not.in",
            FilterType::Like => "like",
            FilterType::NotLike => "not.like",
            FilterType::Equal => "eq",
            FilterType::NotEqual => "ne",
            FilterType::GreaterThan => "gt",
            FilterType::GreaterEqual => "gte",
            FilterType::LessThan => "lt",
            FilterType::LessEqual => "lte",
        }
    }

    /// Whether the operator carries an operand
    pub fn takes_value(&self) -> bool {
        match self {
            FilterType::IsNull
            | FilterType::NotIsNull
            | FilterType::IsTrue
            | FilterType::NotIsTrue
            | FilterType::IsFalse
            | FilterType::NotIsFalse => false,
            FilterType::In
            | FilterType::NotIn
            | FilterType::Like
            | FilterType::NotLike
            | FilterType::Equal
            | FilterType::NotEqual
            | FilterType::GreaterThan
            | FilterType::GreaterEqual
            | FilterType::LessThan
            | FilterType::LessEqual => true,
        }
    }

    /// Whether the operand is a list
    pub fn takes_list(&self) -> bool {
        matches!(self, FilterType::In | FilterType::NotIn)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FilterType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        FilterType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == s)
            .ok_or_else(|| ApiError::invalid_argument(format!("unknown filter operator '{}'", s)))
    }
}

/// One field/operator/value constraint
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: EntityMember,
    filter_type: FilterType,
    value: Option<Value>,
}

impl Filter {
    /// Create a filter, checking the operand against the operator.
    ///
    /// Value-less checks (`is.null`, `is.true`, ...) must not have a value,
    /// every other operator needs one, and `in`/`not.in` need a list.
    pub fn new(field: EntityMember, filter_type: FilterType, value: Option<Value>) -> Result<Self> {
        match (&value, filter_type.takes_value()) {
            (Some(_), false) => {
                return Err(ApiError::invalid_argument(format!(
                    "operator '{}' on '{}' does not take a value",
                    filter_type, field.name
                )));
            }
            (None, true) => {
                return Err(ApiError::invalid_argument(format!(
                    "operator '{}' on '{}' requires a value",
                    filter_type, field.name
                )));
            }
            _ => {}
        }

        if filter_type.takes_list() && !matches!(value, Some(Value::List(_))) {
            return Err(ApiError::invalid_argument(format!(
                "operator '{}' on '{}' requires a list value",
                filter_type, field.name
            )));
        }

        Ok(Self {
            field,
            filter_type,
            value,
        })
    }

    /// Filter without an operand (`is.null`, `is.true`, ...)
    pub fn check(field: EntityMember, filter_type: FilterType) -> Result<Self> {
        Self::new(field, filter_type, None)
    }

    /// Filter with an operand
    pub fn compare(field: EntityMember, filter_type: FilterType, value: impl Into<Value>) -> Result<Self> {
        Self::new(field, filter_type, Some(value.into()))
    }

    pub fn field(&self) -> &EntityMember {
        &self.field
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}
