// crates/service-catalog-core/src/runtime/filter.rs
// ============================================================================
// Module: Service Catalog Filter Evaluation
// Description: Attribute path + operator + literal matching for entries.
// Purpose: Select catalog entries without a query language.
// Dependencies: bigdecimal, serde_json, time
// ============================================================================

//! ## Overview
//! A filter is `(path, operator, literal)`. The path walks the entry's
//! attribute document one `/`-separated segment at a time (decimal segments
//! index arrays). The paths `id`, `created` and `updated` resolve to the
//! entry id and its RFC 3339 stamps, as they appear on the wire. The
//! literal always arrives as a string and is interpreted against the type of
//! the resolved value:
//! - numbers compare as decimals;
//! - booleans and null compare by their JSON spelling;
//! - strings compare by bytes, or chronologically for RFC 3339 ordering.
//!
//! Missing paths and unsupported value types never match. Evaluation is
//! pure and never fails once the query has parsed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::Attributes;
use crate::core::CREATED_KEY;
use crate::core::Entry;
use crate::core::ID_KEY;
use crate::core::Timestamp;
use crate::core::UPDATED_KEY;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Filter parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The operator name is not recognised.
    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),
    /// The attribute path is empty or has empty segments.
    #[error("invalid attribute path: {0}")]
    InvalidPath(String),
}

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Supported filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Value equals the literal.
    Equals,
    /// Value is comparable with and differs from the literal.
    NotEquals,
    /// String value starts with the literal.
    Prefix,
    /// String value ends with the literal.
    Suffix,
    /// String value contains the literal, or array holds an equal element.
    Contains,
    /// Value orders after the literal.
    GreaterThan,
    /// Value orders after or equal to the literal.
    GreaterThanOrEqual,
    /// Value orders before the literal.
    LessThan,
    /// Value orders before or equal to the literal.
    LessThanOrEqual,
}

impl FilterOperator {
    /// All operators in documentation order.
    pub const ALL: [Self; 9] = [
        Self::Equals,
        Self::NotEquals,
        Self::Prefix,
        Self::Suffix,
        Self::Contains,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
    ];

    /// Returns the operator's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Contains => "contains",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.as_str() == value)
            .ok_or_else(|| FilterError::UnknownOperator(value.to_string()))
    }
}

// ============================================================================
// SECTION: Paths
// ============================================================================

/// Slash-separated path into an entry's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    /// Non-empty path segments.
    segments: Vec<String>,
}

impl AttributePath {
    /// Parses a path such as `meta/apiVersion` or `endpoints/0/url`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPath`] for empty paths or segments.
    pub fn parse(path: &str) -> Result<Self, FilterError> {
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(FilterError::InvalidPath(path.to_string()));
        }
        Ok(Self {
            segments: path.split('/').map(str::to_string).collect(),
        })
    }

    /// Resolves the path against an entry.
    #[must_use]
    pub fn resolve<'a>(&self, entry: &'a Entry) -> Option<Cow<'a, Value>> {
        match self.segments.as_slice() {
            [only] if only == ID_KEY => {
                Some(Cow::Owned(Value::String(entry.id.as_str().to_string())))
            }
            [only] if only == CREATED_KEY => timestamp_value(entry.created_at),
            [only] if only == UPDATED_KEY => timestamp_value(entry.updated_at),
            segments => resolve_attributes(&entry.attributes, segments).map(Cow::Borrowed),
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Renders an entry stamp the way it appears on the wire.
fn timestamp_value<'a>(timestamp: Timestamp) -> Option<Cow<'a, Value>> {
    timestamp.to_rfc3339().ok().map(|text| Cow::Owned(Value::String(text)))
}

/// Walks `segments` through an attribute document.
fn resolve_attributes<'a>(attributes: &'a Attributes, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = attributes.get(first)?;
    for segment in rest {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Parses a decimal array index segment.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.bytes().all(|byte| byte.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// A parsed filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    /// Attribute path to resolve.
    pub path: AttributePath,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Literal operand.
    pub value: String,
}

impl FilterQuery {
    /// Parses a filter from its textual parts.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for unknown operators or malformed paths.
    pub fn parse(path: &str, operator: &str, value: &str) -> Result<Self, FilterError> {
        Ok(Self {
            path: AttributePath::parse(path)?,
            operator: operator.parse()?,
            value: value.to_string(),
        })
    }

    /// Returns true when `entry` satisfies the filter.
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        self.path
            .resolve(entry)
            .is_some_and(|target| evaluate_operator(self.operator, &target, &self.value))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Applies `operator` to a resolved value and a literal.
#[must_use]
pub fn evaluate_operator(operator: FilterOperator, target: &Value, literal: &str) -> bool {
    match operator {
        FilterOperator::Equals => compare_equality(target, literal) == Some(true),
        FilterOperator::NotEquals => compare_equality(target, literal) == Some(false),
        FilterOperator::Prefix => target.as_str().is_some_and(|text| text.starts_with(literal)),
        FilterOperator::Suffix => target.as_str().is_some_and(|text| text.ends_with(literal)),
        FilterOperator::Contains => compare_contains(target, literal),
        FilterOperator::GreaterThan => compare_ordering(target, literal).is_some_and(Ordering::is_gt),
        FilterOperator::GreaterThanOrEqual => {
            compare_ordering(target, literal).is_some_and(Ordering::is_ge)
        }
        FilterOperator::LessThan => compare_ordering(target, literal).is_some_and(Ordering::is_lt),
        FilterOperator::LessThanOrEqual => {
            compare_ordering(target, literal).is_some_and(Ordering::is_le)
        }
    }
}

/// Equality against a literal; `None` when the types are not comparable.
fn compare_equality(target: &Value, literal: &str) -> Option<bool> {
    match target {
        Value::String(text) => Some(text == literal),
        Value::Number(number) => {
            let left = decimal_from_number(number)?;
            let right = BigDecimal::from_str(literal).ok()?;
            Some(left == right)
        }
        Value::Bool(flag) => match literal {
            "true" => Some(*flag),
            "false" => Some(!*flag),
            _ => None,
        },
        Value::Null => Some(literal == "null"),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Substring match for strings, element match for arrays.
fn compare_contains(target: &Value, literal: &str) -> bool {
    match target {
        Value::String(text) => text.contains(literal),
        Value::Array(items) => items.iter().any(|item| compare_equality(item, literal) == Some(true)),
        _ => false,
    }
}

/// Orders a value against a literal; `None` when no ordering applies.
fn compare_ordering(target: &Value, literal: &str) -> Option<Ordering> {
    match target {
        Value::Number(number) => {
            let left = decimal_from_number(number)?;
            let right = BigDecimal::from_str(literal).ok()?;
            Some(left.cmp(&right))
        }
        Value::String(text) => temporal_cmp(text, literal),
        _ => None,
    }
}

/// Parses a JSON number into `BigDecimal` via its rendered form.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}

/// Compares RFC 3339 date-times, falling back to date-only values.
fn temporal_cmp(left: &str, right: &str) -> Option<Ordering> {
    if let (Ok(left), Ok(right)) =
        (OffsetDateTime::parse(left, &Rfc3339), OffsetDateTime::parse(right, &Rfc3339))
    {
        return Some(left.cmp(&right));
    }
    let left = parse_date(left)?;
    let right = parse_date(right)?;
    Some(left.cmp(&right))
}

/// Parses a `YYYY-MM-DD` date.
fn parse_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = time::Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
